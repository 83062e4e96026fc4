//  Copyright 2022. The Tari Project
//
//  Redistribution and use in source and binary forms, with or without modification, are permitted provided that the
//  following conditions are met:
//
//  1. Redistributions of source code must retain the above copyright notice, this list of conditions and the following
//  disclaimer.
//
//  2. Redistributions in binary form must reproduce the above copyright notice, this list of conditions and the
//  following disclaimer in the documentation and/or other materials provided with the distribution.
//
//  3. Neither the name of the copyright holder nor the names of its contributors may be used to endorse or promote
//  products derived from this software without specific prior written permission.
//
//  THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES,
//  INCLUDING, BUT NOT LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
//  DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
//  SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
//  SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY,
//  WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE
//  USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
//
// Portions of this file were originally copyrighted (c) 2018 The Grin Developers, issued under the Apache License,
// Version 2.0, available at http://www.apache.org/licenses/LICENSE-2.0.

use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};
use tari_transaction_hashing::domains::TransactionHashDomain;
use tari_utilities::hex::Hex;

use crate::{
    consensus::DomainSeparatedConsensusHasher,
    crypto::CommitmentSignatureAdapter,
    transactions::{
        tari_amount::MicroMinotari,
        transaction_components::{KernelFeatures, TransactionError},
    },
    types::{Commitment, HashOutput, PublicKey, Signature},
};

/// The transaction kernel tracks the excess for a given transaction. The kernel also tracks other transaction
/// metadata, such as the lock height for the transaction (i.e. the earliest this transaction can be mined) and the
/// transaction fee, in cleartext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionKernel {
    /// Options for a kernel's structure or use
    pub features: KernelFeatures,
    /// Fee originally included in the transaction this proof is for.
    pub fee: MicroMinotari,
    /// This kernel is not valid earlier than lock_height blocks
    pub lock_height: u64,
    /// Remainder of the sum of all transaction commitments (minus an offset). If the transaction is well-formed,
    /// amounts plus fee will sum to zero, and the excess is hence a valid public key.
    pub excess: Commitment,
    /// Signature over the kernel challenge, made with the private key of `excess`
    pub excess_sig: Signature,
}

impl TransactionKernel {
    pub fn new(
        features: KernelFeatures,
        fee: MicroMinotari,
        lock_height: u64,
        excess: Commitment,
        excess_sig: Signature,
    ) -> TransactionKernel {
        TransactionKernel {
            features,
            fee,
            lock_height,
            excess,
            excess_sig,
        }
    }

    pub fn is_coinbase(&self) -> bool {
        self.features.is_coinbase()
    }

    pub fn verify_signature(&self, adapter: &dyn CommitmentSignatureAdapter) -> Result<(), TransactionError> {
        let excess = self.excess.as_public_key();
        let challenge = TransactionKernel::build_kernel_signature_challenge(
            self.excess_sig.get_public_nonce(),
            &self.excess,
            self.fee,
            self.lock_height,
            &self.features,
        );
        if adapter.verify_signature(&self.excess_sig, excess, &challenge) {
            Ok(())
        } else {
            Err(TransactionError::InvalidSignatureError(
                "Verifying kernel signature".to_string(),
            ))
        }
    }

    /// Helper function to create the kernel excess signature challenge.
    /// The challenge is defined as the hash of the following data:
    ///  Public nonce
    ///  Excess
    ///  Fee (little-endian, 8 bytes)
    ///  Lock height
    ///  Features of the kernel
    ///  Burn commitment, always absent
    pub fn build_kernel_signature_challenge(
        public_nonce: &PublicKey,
        excess: &Commitment,
        fee: MicroMinotari,
        lock_height: u64,
        features: &KernelFeatures,
    ) -> HashOutput {
        DomainSeparatedConsensusHasher::<TransactionHashDomain>::new("kernel_signature")
            .chain(public_nonce)
            .chain(excess)
            .chain_raw(fee.as_u64().to_le_bytes())
            .chain(&lock_height)
            .chain(features)
            .chain(&Option::<Commitment>::None)
            .finalize()
    }
}

impl Display for TransactionKernel {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(
            fmt,
            "Fee: {}\nLock height: {}\nFeatures: {:?}\nExcess: {}\nExcess signature nonce: {}\n",
            self.fee,
            self.lock_height,
            self.features,
            self.excess.to_hex(),
            self.excess_sig.get_public_nonce().to_hex(),
        )
    }
}

impl PartialOrd for TransactionKernel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TransactionKernel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.excess.cmp(&other.excess)
    }
}

#[cfg(test)]
mod test {
    use tari_transaction_hashing::DomainHasher;
    use tari_utilities::ByteArray;

    use super::*;
    use crate::{config::TransactionEngineConfig, crypto::RistrettoAdapter};

    fn adapter() -> RistrettoAdapter {
        RistrettoAdapter::new(&TransactionEngineConfig::default()).unwrap()
    }

    #[test]
    fn the_challenge_has_a_fixed_byte_layout() {
        let adapter = adapter();
        let nonce = adapter.public_key_from_secret(&adapter.random_secret_key());
        let excess = adapter.commit(&adapter.random_secret_key(), 0);
        let challenge = TransactionKernel::build_kernel_signature_challenge(
            &nonce,
            &excess,
            MicroMinotari(300),
            300,
            &KernelFeatures::empty(),
        );

        let expected = DomainHasher::<TransactionHashDomain>::new("kernel_signature")
            .chain(nonce.as_bytes())
            .chain(excess.as_bytes())
            .chain(300u64.to_le_bytes())
            .chain([0xac, 0x02])
            .chain([0x00])
            .chain([0x00])
            .finalize();
        assert_eq!(challenge, expected);
    }

    #[test]
    fn the_challenge_matches_a_known_digest() {
        // 2·G and 3·G
        let nonce = PublicKey::from_canonical_bytes(
            &hex::decode("6a493210f7499cd17fecb510ae0cea23a110e8d5b901f8acadd3095c73a3b919").unwrap(),
        )
        .unwrap();
        let excess = Commitment::from_public_key(
            &PublicKey::from_canonical_bytes(
                &hex::decode("94741f5d5d52755ece4f23f044ee27d5d1ea1e2bd196b462166b16152a9d0259").unwrap(),
            )
            .unwrap(),
        );
        let challenge = TransactionKernel::build_kernel_signature_challenge(
            &nonce,
            &excess,
            MicroMinotari(25),
            300,
            &KernelFeatures::COINBASE_KERNEL,
        );
        assert_eq!(
            hex::encode(challenge),
            "4efe637aa74f79a75cf3285bd1cf300704800c83f8349ec8caf7f3cb5e3f179a"
        );
    }

    #[test]
    fn every_field_is_committed_to() {
        let adapter = adapter();
        let nonce = adapter.public_key_from_secret(&adapter.random_secret_key());
        let excess = adapter.commit(&adapter.random_secret_key(), 0);
        let challenge = |fee: u64, lock_height: u64, features: KernelFeatures| {
            TransactionKernel::build_kernel_signature_challenge(
                &nonce,
                &excess,
                MicroMinotari(fee),
                lock_height,
                &features,
            )
        };
        let base = challenge(1, 0, KernelFeatures::empty());
        assert_ne!(base, challenge(2, 0, KernelFeatures::empty()));
        assert_ne!(base, challenge(1, 1, KernelFeatures::empty()));
        assert_ne!(base, challenge(1, 0, KernelFeatures::create_coinbase()));
    }

    #[test]
    fn it_verifies_the_excess_signature() {
        let adapter = adapter();
        let k = adapter.random_secret_key();
        let r = adapter.random_secret_key();
        let excess = adapter.commit(&k, 0);
        let challenge = TransactionKernel::build_kernel_signature_challenge(
            &adapter.public_key_from_secret(&r),
            &excess,
            MicroMinotari(10),
            5,
            &KernelFeatures::empty(),
        );
        let sig = adapter.sign_challenge_with_nonce(&k, &r, &challenge).unwrap();
        let mut kernel = TransactionKernel::new(KernelFeatures::empty(), MicroMinotari(10), 5, excess, sig);
        assert!(kernel.verify_signature(&adapter).is_ok());

        kernel.fee = MicroMinotari(11);
        assert!(matches!(
            kernel.verify_signature(&adapter),
            Err(TransactionError::InvalidSignatureError(_))
        ));
    }
}
