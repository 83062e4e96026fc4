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

pub use covenant::Covenant;
pub use encrypted_value::{EncryptedValue, EncryptionError};
pub use error::TransactionError;
pub use kernel_builder::KernelBuilder;
pub use kernel_features::KernelFeatures;
pub use output_features::OutputFeatures;
pub use output_features_version::OutputFeaturesVersion;
pub use output_type::OutputType;
use tari_transaction_hashing::domains::TransactionHashDomain;
pub use transaction::Transaction;
pub use transaction_input::TransactionInput;
pub use transaction_kernel::TransactionKernel;
pub use transaction_output::TransactionOutput;

mod covenant;
mod encrypted_value;
mod error;
mod kernel_builder;
mod kernel_features;
mod output_features;
mod output_features_version;
mod output_type;
mod transaction;
mod transaction_input;
mod transaction_kernel;
mod transaction_output;

//----------------------------------------     Crate functions   ----------------------------------------------------//

use crate::{
    consensus::DomainSeparatedConsensusHasher,
    script::TariScript,
    transactions::tari_amount::MicroMinotari,
    types::{Commitment, HashOutput, PublicKey},
};

/// Implement the canonical hashing function for TransactionOutput for use in ordering as well as for the output hash
/// calculation for TransactionInput.
///
/// We can exclude the range proof from this hash. The rationale for this is:
/// a) It is a significant performance boost, since the RP is the biggest part of an output
/// b) Range proofs are committed to elsewhere and so we'd be hashing them twice (and as mentioned, this is slow)
/// c) TransactionInputs will now have the same hash as UTXOs, which makes locating STXOs easier when doing reorgs
pub fn hash_output(
    features: &OutputFeatures,
    commitment: &Commitment,
    script: &TariScript,
    covenant: &Covenant,
    encrypted_value: &EncryptedValue,
    sender_offset_public_key: &PublicKey,
    minimum_value_promise: MicroMinotari,
) -> HashOutput {
    DomainSeparatedConsensusHasher::<TransactionHashDomain>::new("transaction_output")
        .chain(features)
        .chain(commitment)
        .chain(script)
        .chain(covenant)
        .chain(encrypted_value)
        .chain(sender_offset_public_key)
        .chain_raw(minimum_value_promise.as_u64().to_le_bytes())
        .finalize()
}

/// The hash a node computes for an output, for callers that need to confirm it independently
pub fn get_transaction_output_hash(output: &TransactionOutput) -> HashOutput {
    output.hash()
}

#[cfg(test)]
mod test {
    use tari_transaction_hashing::DomainHasher;
    use tari_utilities::ByteArray;

    use super::*;

    #[test]
    fn hash_output_chains_fields_in_order() {
        let features = OutputFeatures::create_coinbase(100, vec![]).unwrap();
        let commitment = Commitment::default();
        let key = PublicKey::default();
        let encrypted_value = EncryptedValue::default();
        let hash = hash_output(
            &features,
            &commitment,
            &TariScript::default(),
            &Covenant::default(),
            &encrypted_value,
            &key,
            MicroMinotari(0),
        );
        let expected = DomainHasher::<TransactionHashDomain>::new("transaction_output")
            .chain([0, 100, 1, 0, 0, 0, 0, 0, 0, 0])
            .chain(commitment.as_bytes())
            .chain([1, 0x73])
            .chain([0])
            .chain(encrypted_value.as_bytes())
            .chain(key.as_bytes())
            .chain(0u64.to_le_bytes())
            .finalize();
        assert_eq!(hash, expected);
    }
}
