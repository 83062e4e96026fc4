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

use log::*;
use serde::{Deserialize, Serialize};
use tari_transaction_hashing::domains::TransactionHashDomain;
use tari_utilities::hex::Hex;

use crate::{
    consensus::DomainSeparatedConsensusHasher,
    crypto::CommitmentSignatureAdapter,
    script::TariScript,
    transactions::{
        tari_amount::MicroMinotari,
        transaction_components,
        transaction_components::{
            Covenant,
            EncryptedValue,
            OutputFeatures,
            OutputType,
            TransactionError,
            TransactionInput,
        },
    },
    types::{BlindingFactor, ComSignature, Commitment, HashOutput, PrivateKey, PublicKey, RangeProof},
};

pub const LOG_TARGET: &str = "c::tx::transaction_output";

/// Output for a transaction, defining the new ownership of coins that are being transferred. The commitment is a
/// blinded value for the output while the range proof guarantees the commitment includes a positive value without
/// overflow and the ownership of the private key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    /// Options for an output's structure or use
    pub features: OutputFeatures,
    /// The homomorphic commitment representing the output amount
    pub commitment: Commitment,
    /// A proof that the commitment is in the right range
    pub proof: RangeProof,
    /// The script that will be executed when spending this output
    pub script: TariScript,
    /// Tari script offset pubkey, K_O
    pub sender_offset_public_key: PublicKey,
    /// UTXO signature with the script offset private key, k_O
    pub metadata_signature: ComSignature,
    /// The covenant that will be executed when spending this output
    #[serde(default)]
    pub covenant: Covenant,
    /// Encrypted value.
    pub encrypted_value: EncryptedValue,
    /// The minimum value of the commitment that is proven by the range proof
    #[serde(default)]
    pub minimum_value_promise: MicroMinotari,
}

/// An output for a transaction, includes a range proof and Tari script metadata
impl TransactionOutput {
    pub fn new(
        features: OutputFeatures,
        commitment: Commitment,
        proof: RangeProof,
        script: TariScript,
        sender_offset_public_key: PublicKey,
        metadata_signature: ComSignature,
        covenant: Covenant,
        encrypted_value: EncryptedValue,
        minimum_value_promise: MicroMinotari,
    ) -> TransactionOutput {
        TransactionOutput {
            features,
            commitment,
            proof,
            script,
            sender_offset_public_key,
            metadata_signature,
            covenant,
            encrypted_value,
            minimum_value_promise,
        }
    }

    /// Accessor method for the commitment contained in an output
    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    /// Accessor method for the range proof contained in an output
    pub fn proof(&self) -> &RangeProof {
        &self.proof
    }

    /// Accessor method for the TariScript contained in an output
    pub fn script(&self) -> &TariScript {
        &self.script
    }

    pub fn hash(&self) -> HashOutput {
        transaction_components::hash_output(
            &self.features,
            &self.commitment,
            &self.script,
            &self.covenant,
            &self.encrypted_value,
            &self.sender_offset_public_key,
            self.minimum_value_promise,
        )
    }

    /// Verify that range proof is valid
    pub fn verify_range_proof(&self, adapter: &dyn CommitmentSignatureAdapter) -> Result<(), TransactionError> {
        if adapter.verify_range_proof(&self.proof, &self.commitment) {
            Ok(())
        } else {
            Err(TransactionError::InvalidRangeProof {
                commitment: self.commitment.to_hex(),
            })
        }
    }

    /// Verify that the metadata signature is valid. The signature is made over `C + K_O`, so it proves knowledge of
    /// both the commitment opening and the sender offset private key.
    pub fn verify_metadata_signature(&self, adapter: &dyn CommitmentSignatureAdapter) -> Result<(), TransactionError> {
        // Features are hashed at their consensus width, which deserialization does not check
        self.features.validate()?;
        let challenge = TransactionOutput::build_metadata_signature_challenge(
            self.metadata_signature.public_nonce(),
            &self.script,
            &self.features,
            &self.sender_offset_public_key,
            &self.commitment,
            &self.covenant,
            &self.encrypted_value,
            self.minimum_value_promise,
        );
        let signed_commitment = adapter.commitment_add_public_key(&self.commitment, &self.sender_offset_public_key);
        if !adapter.verify_commitment_signature(&self.metadata_signature, &signed_commitment, &challenge) {
            return Err(TransactionError::InvalidSignatureError(
                "Metadata signature not valid!".to_string(),
            ));
        }
        Ok(())
    }

    /// This will check if the input and the output is the same commitment by looking at the commitment and features.
    /// This will ignore the output range proof
    #[inline]
    pub fn is_equal_to(&self, output: &TransactionInput) -> bool {
        self.hash() == output.output_hash()
    }

    /// Returns true if the output is a coinbase, otherwise false
    pub fn is_coinbase(&self) -> bool {
        matches!(self.features.output_type, OutputType::Coinbase)
    }

    /// Convenience function that calculates the challenge for the metadata commitment signature
    pub fn build_metadata_signature_challenge(
        public_nonce: &Commitment,
        script: &TariScript,
        features: &OutputFeatures,
        sender_offset_public_key: &PublicKey,
        commitment: &Commitment,
        covenant: &Covenant,
        encrypted_value: &EncryptedValue,
        minimum_value_promise: MicroMinotari,
    ) -> HashOutput {
        DomainSeparatedConsensusHasher::<TransactionHashDomain>::new("metadata_signature")
            .chain(public_nonce)
            .chain(script)
            .chain(features)
            .chain(sender_offset_public_key)
            .chain(commitment)
            .chain(covenant)
            .chain(encrypted_value)
            .chain_raw(minimum_value_promise.as_u64().to_le_bytes())
            .finalize()
    }

    /// Signs the output metadata with the commitment opening `(value, spending_key)` and the sender offset private
    /// key, using fresh nonces from the adapter.
    pub fn create_metadata_signature(
        adapter: &dyn CommitmentSignatureAdapter,
        value: MicroMinotari,
        spending_key: &BlindingFactor,
        script: &TariScript,
        output_features: &OutputFeatures,
        sender_offset_private_key: &PrivateKey,
        covenant: &Covenant,
        encrypted_value: &EncryptedValue,
        minimum_value_promise: MicroMinotari,
    ) -> Result<ComSignature, TransactionError> {
        let nonce_a = adapter.random_secret_key();
        let nonce_x = adapter.random_secret_key();
        let public_nonce = adapter.commit_private_keys(&nonce_a, &nonce_x);
        let commitment = adapter.commit(spending_key, value.as_u64());
        let sender_offset_public_key = adapter.public_key_from_secret(sender_offset_private_key);
        let e = TransactionOutput::build_metadata_signature_challenge(
            &public_nonce,
            script,
            output_features,
            &sender_offset_public_key,
            &commitment,
            covenant,
            encrypted_value,
            minimum_value_promise,
        );
        let value_key = adapter.secret_key_from_value(value.as_u64());
        let signing_key = adapter.add_secret_keys(spending_key, sender_offset_private_key);
        let signature = adapter.sign_commitment_challenge_with_nonce(&value_key, &signing_key, &nonce_a, &nonce_x, &e)?;
        trace!(
            target: LOG_TARGET,
            "Signed metadata for output {}",
            commitment.to_hex()
        );
        Ok(signature)
    }
}

impl Display for TransactionOutput {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(
            fmt,
            "{} [{:?}], Script: ({}), Offset Pubkey: ({}), Metadata Signature: ({}, {}, {}), Proof: {} bytes",
            self.commitment.to_hex(),
            self.features,
            self.script,
            self.sender_offset_public_key.to_hex(),
            self.metadata_signature.u().to_hex(),
            self.metadata_signature.v().to_hex(),
            self.metadata_signature.public_nonce().to_hex(),
            self.proof.as_bytes().len()
        )
    }
}

impl PartialOrd for TransactionOutput {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TransactionOutput {
    fn cmp(&self, other: &Self) -> Ordering {
        self.commitment.cmp(&other.commitment)
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

    fn create_output(adapter: &RistrettoAdapter, value: MicroMinotari) -> TransactionOutput {
        let spending_key = adapter.random_secret_key();
        let sender_offset_private_key = adapter.random_secret_key();
        let commitment = adapter.commit(&spending_key, value.as_u64());
        let features = OutputFeatures::default();
        let script = TariScript::default();
        let covenant = Covenant::default();
        let encrypted_value = EncryptedValue::encrypt_value(&spending_key, &commitment, value).unwrap();
        let metadata_signature = TransactionOutput::create_metadata_signature(
            adapter,
            value,
            &spending_key,
            &script,
            &features,
            &sender_offset_private_key,
            &covenant,
            &encrypted_value,
            MicroMinotari::zero(),
        )
        .unwrap();
        TransactionOutput::new(
            features,
            commitment,
            adapter.create_range_proof(&spending_key, value.as_u64()).unwrap(),
            script,
            adapter.public_key_from_secret(&sender_offset_private_key),
            metadata_signature,
            covenant,
            encrypted_value,
            MicroMinotari::zero(),
        )
    }

    #[test]
    fn it_verifies_a_valid_output() {
        let adapter = adapter();
        let output = create_output(&adapter, MicroMinotari(1234));
        output.verify_metadata_signature(&adapter).unwrap();
        output.verify_range_proof(&adapter).unwrap();
    }

    #[test]
    fn tampered_metadata_invalidates_the_signature() {
        let adapter = adapter();
        let mut output = create_output(&adapter, MicroMinotari(1234));
        output.covenant = Covenant::from_bytes(&[1]);
        assert!(matches!(
            output.verify_metadata_signature(&adapter),
            Err(TransactionError::InvalidSignatureError(_))
        ));

        let mut output = create_output(&adapter, MicroMinotari(1234));
        output.sender_offset_public_key = adapter.public_key_from_secret(&adapter.random_secret_key());
        assert!(output.verify_metadata_signature(&adapter).is_err());
    }

    #[test]
    fn a_proof_for_another_commitment_is_rejected() {
        let adapter = adapter();
        let mut output = create_output(&adapter, MicroMinotari(10));
        output.proof = create_output(&adapter, MicroMinotari(10)).proof;
        assert!(matches!(
            output.verify_range_proof(&adapter),
            Err(TransactionError::InvalidRangeProof { .. })
        ));
    }

    #[test]
    fn the_metadata_challenge_has_a_fixed_byte_layout() {
        let adapter = adapter();
        let output = create_output(&adapter, MicroMinotari(5));
        let nonce = output.metadata_signature.public_nonce();
        let challenge = TransactionOutput::build_metadata_signature_challenge(
            nonce,
            &output.script,
            &output.features,
            &output.sender_offset_public_key,
            &output.commitment,
            &output.covenant,
            &output.encrypted_value,
            MicroMinotari(7),
        );
        let expected = DomainHasher::<TransactionHashDomain>::new("metadata_signature")
            .chain(nonce.as_bytes())
            .chain([0x01, 0x73])
            .chain([0u8; 10])
            .chain(output.sender_offset_public_key.as_bytes())
            .chain(output.commitment.as_bytes())
            .chain([0x00])
            .chain(output.encrypted_value.as_bytes())
            .chain(7u64.to_le_bytes())
            .finalize();
        assert_eq!(challenge, expected);
    }

    #[test]
    fn the_metadata_challenge_matches_a_known_digest() {
        let point = |hex: &str| PublicKey::from_canonical_bytes(&hex::decode(hex).unwrap()).unwrap();
        // G, 2·G and 3·G
        let sender_offset_public_key = point("e2f2ae0a6abc4e71a884a961c500515f58e30b6aa582dd8db6a65945e08d2d76");
        let nonce = Commitment::from_public_key(&point(
            "6a493210f7499cd17fecb510ae0cea23a110e8d5b901f8acadd3095c73a3b919",
        ));
        let commitment = Commitment::from_public_key(&point(
            "94741f5d5d52755ece4f23f044ee27d5d1ea1e2bd196b462166b16152a9d0259",
        ));
        let challenge = TransactionOutput::build_metadata_signature_challenge(
            &nonce,
            &TariScript::default(),
            &OutputFeatures::create_coinbase(100, vec![]).unwrap(),
            &sender_offset_public_key,
            &commitment,
            &Covenant::default(),
            &EncryptedValue::default(),
            MicroMinotari(5),
        );
        assert_eq!(
            hex::encode(challenge),
            "29686a39d20b7bd3f30aa35dc2c66ae235ecd336bd6697ef70562edd929d861f"
        );
    }

    #[test]
    fn outputs_order_by_commitment() {
        let adapter = adapter();
        let a = create_output(&adapter, MicroMinotari(1));
        let b = create_output(&adapter, MicroMinotari(2));
        let mut outputs = vec![a.clone(), b.clone()];
        outputs.sort();
        assert!(outputs[0].commitment <= outputs[1].commitment);
    }
}
