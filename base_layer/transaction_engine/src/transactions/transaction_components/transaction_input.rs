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
    script::{ExecutionStack, TariScript},
    transactions::{
        tari_amount::MicroMinotari,
        transaction_components,
        transaction_components::{Covenant, EncryptedValue, OutputFeatures, TransactionError, TransactionOutput},
    },
    types::{BlindingFactor, ComSignature, Commitment, HashOutput, PrivateKey, PublicKey},
};

/// A transaction input.
///
/// Primarily a reference to an output being spent by the transaction. It carries the spent output's data so that the
/// output hash can be recomputed, plus the spender's script input data and script signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInput {
    /// The features of the output being spent. We will check maturity for all outputs.
    pub features: OutputFeatures,
    /// The commitment referencing the output being spent.
    pub commitment: Commitment,
    /// The serialised script
    pub script: TariScript,
    /// The script input data, if any
    pub input_data: ExecutionStack,
    /// A signature with k_s, signing the script, input data, and mined height
    pub script_signature: ComSignature,
    /// The offset public key, K_O
    pub sender_offset_public_key: PublicKey,
    /// The covenant of the spent output
    #[serde(default)]
    pub covenant: Covenant,
    /// The encrypted value of the spent output
    pub encrypted_value: EncryptedValue,
    /// The minimum value promise of the spent output
    #[serde(default)]
    pub minimum_value_promise: MicroMinotari,
}

impl TransactionInput {
    pub fn new(
        features: OutputFeatures,
        commitment: Commitment,
        script: TariScript,
        input_data: ExecutionStack,
        script_signature: ComSignature,
        sender_offset_public_key: PublicKey,
        covenant: Covenant,
        encrypted_value: EncryptedValue,
        minimum_value_promise: MicroMinotari,
    ) -> TransactionInput {
        TransactionInput {
            features,
            commitment,
            script,
            input_data,
            script_signature,
            sender_offset_public_key,
            covenant,
            encrypted_value,
            minimum_value_promise,
        }
    }

    /// Convenience function that calculates the challenge for the script commitment signature
    pub fn build_script_challenge(
        public_nonce: &Commitment,
        script: &TariScript,
        input_data: &ExecutionStack,
        script_public_key: &PublicKey,
        commitment: &Commitment,
    ) -> HashOutput {
        DomainSeparatedConsensusHasher::<TransactionHashDomain>::new("script_challenge")
            .chain(public_nonce)
            .chain(script)
            .chain(input_data)
            .chain(script_public_key)
            .chain(commitment)
            .finalize()
    }

    /// Signs the script challenge with the commitment opening `(value, spending_key)` and the script private key, so
    /// that the signature verifies against `C + K_S`.
    pub fn create_script_signature(
        adapter: &dyn CommitmentSignatureAdapter,
        value: MicroMinotari,
        spending_key: &BlindingFactor,
        script_private_key: &PrivateKey,
        script: &TariScript,
        input_data: &ExecutionStack,
        commitment: &Commitment,
    ) -> Result<ComSignature, TransactionError> {
        let nonce_a = adapter.random_secret_key();
        let nonce_x = adapter.random_secret_key();
        let public_nonce = adapter.commit_private_keys(&nonce_a, &nonce_x);
        let script_public_key = adapter.public_key_from_secret(script_private_key);
        let challenge =
            TransactionInput::build_script_challenge(&public_nonce, script, input_data, &script_public_key, commitment);
        let value_key = adapter.secret_key_from_value(value.as_u64());
        let signing_key = adapter.add_secret_keys(spending_key, script_private_key);
        Ok(adapter.sign_commitment_challenge_with_nonce(&value_key, &signing_key, &nonce_a, &nonce_x, &challenge)?)
    }

    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    pub fn features(&self) -> &OutputFeatures {
        &self.features
    }

    pub fn script(&self) -> &TariScript {
        &self.script
    }

    /// Checks if the given unblinded output instance corresponds to this input
    pub fn opened_by(
        &self,
        adapter: &dyn CommitmentSignatureAdapter,
        value: MicroMinotari,
        spending_key: &BlindingFactor,
    ) -> bool {
        adapter.commit(spending_key, value.as_u64()) == self.commitment
    }

    /// This will check if the input and the output is the same transactional output by looking at the commitment and
    /// features and script. This will ignore all other output and input fields
    pub fn is_equal_to(&self, output: &TransactionOutput) -> bool {
        self.output_hash() == output.hash()
    }

    /// This will run the script contained in the TransactionInput, returning either a script error or the resulting
    /// public key.
    pub fn run_script(&self) -> Result<PublicKey, TransactionError> {
        Ok(self.script.execute_to_public_key(&self.input_data)?)
    }

    pub fn validate_script_signature(
        &self,
        public_script_key: &PublicKey,
        adapter: &dyn CommitmentSignatureAdapter,
    ) -> Result<(), TransactionError> {
        self.features.validate()?;
        let challenge = TransactionInput::build_script_challenge(
            self.script_signature.public_nonce(),
            &self.script,
            &self.input_data,
            public_script_key,
            &self.commitment,
        );
        let signed_commitment = adapter.commitment_add_public_key(&self.commitment, public_script_key);
        if adapter.verify_commitment_signature(&self.script_signature, &signed_commitment, &challenge) {
            Ok(())
        } else {
            Err(TransactionError::InvalidSignatureError(
                "Verifying script signature".to_string(),
            ))
        }
    }

    /// This will run the script and verify the script signature. If its valid, it will return the resulting public key
    /// from the script.
    pub fn run_and_verify_script(
        &self,
        adapter: &dyn CommitmentSignatureAdapter,
    ) -> Result<PublicKey, TransactionError> {
        let key = self.run_script()?;
        self.validate_script_signature(&key, adapter)?;
        Ok(key)
    }

    /// Returns the hash of the output data contained in this input.
    /// This hash matches the hash of a transaction output that this input spends.
    pub fn output_hash(&self) -> HashOutput {
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
}

impl Display for TransactionInput {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(
            fmt,
            "{} [{:?}], Script: ({}), Offset_Pubkey: ({}), Input Hash: {}",
            self.commitment.to_hex(),
            self.features,
            self.script,
            self.sender_offset_public_key.to_hex(),
            hex::encode(self.output_hash()),
        )
    }
}

impl PartialEq<Self> for TransactionInput {
    fn eq(&self, other: &Self) -> bool {
        self.output_hash() == other.output_hash() &&
            self.script_signature == other.script_signature &&
            self.input_data == other.input_data
    }
}

impl Eq for TransactionInput {}

impl PartialOrd for TransactionInput {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TransactionInput {
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

    fn create_input(
        adapter: &RistrettoAdapter,
        value: MicroMinotari,
    ) -> (TransactionInput, BlindingFactor, PrivateKey) {
        let spending_key = adapter.random_secret_key();
        let script_private_key = adapter.random_secret_key();
        let commitment = adapter.commit(&spending_key, value.as_u64());
        let script = script!(Nop);
        let input_data = inputs!(adapter.public_key_from_secret(&script_private_key));
        let script_signature = TransactionInput::create_script_signature(
            adapter,
            value,
            &spending_key,
            &script_private_key,
            &script,
            &input_data,
            &commitment,
        )
        .unwrap();
        let input = TransactionInput::new(
            OutputFeatures::default(),
            commitment.clone(),
            script,
            input_data,
            script_signature,
            adapter.public_key_from_secret(&adapter.random_secret_key()),
            Covenant::default(),
            EncryptedValue::encrypt_value(&spending_key, &commitment, value).unwrap(),
            MicroMinotari::zero(),
        );
        (input, spending_key, script_private_key)
    }

    #[test]
    fn it_runs_and_verifies_the_script() {
        let adapter = adapter();
        let (input, _, script_private_key) = create_input(&adapter, MicroMinotari(500));
        let key = input.run_and_verify_script(&adapter).unwrap();
        assert_eq!(key, adapter.public_key_from_secret(&script_private_key));
    }

    #[test]
    fn a_signature_with_the_wrong_script_key_fails() {
        let adapter = adapter();
        let (input, _, _) = create_input(&adapter, MicroMinotari(500));
        let other = adapter.public_key_from_secret(&adapter.random_secret_key());
        assert!(matches!(
            input.validate_script_signature(&other, &adapter),
            Err(TransactionError::InvalidSignatureError(_))
        ));
    }

    #[test]
    fn changed_input_data_fails_the_script() {
        let adapter = adapter();
        let (mut input, _, _) = create_input(&adapter, MicroMinotari(500));
        input.input_data = ExecutionStack::default();
        assert!(matches!(input.run_script(), Err(TransactionError::ScriptError(_))));
    }

    #[test]
    fn the_script_challenge_has_a_fixed_byte_layout() {
        let adapter = adapter();
        let (input, _, script_private_key) = create_input(&adapter, MicroMinotari(1));
        let script_public_key = adapter.public_key_from_secret(&script_private_key);
        let nonce = input.script_signature.public_nonce();
        let challenge = TransactionInput::build_script_challenge(
            nonce,
            &input.script,
            &input.input_data,
            &script_public_key,
            &input.commitment,
        );
        let expected = DomainHasher::<TransactionHashDomain>::new("script_challenge")
            .chain(nonce.as_bytes())
            .chain([0x01, 0x73])
            .chain([33u8, 0x04])
            .chain(script_public_key.as_bytes())
            .chain(script_public_key.as_bytes())
            .chain(input.commitment.as_bytes())
            .finalize();
        assert_eq!(challenge, expected);
    }

    #[test]
    fn the_output_hash_ignores_the_script_signature() {
        let adapter = adapter();
        let (input, spending_key, script_private_key) = create_input(&adapter, MicroMinotari(1));
        let mut other = input.clone();
        other.script_signature = TransactionInput::create_script_signature(
            &adapter,
            MicroMinotari(1),
            &spending_key,
            &script_private_key,
            &input.script,
            &input.input_data,
            &input.commitment,
        )
        .unwrap();
        assert_ne!(input.script_signature, other.script_signature);
        assert_eq!(input.output_hash(), other.output_hash());
        assert!(input.opened_by(&adapter, MicroMinotari(1), &spending_key));
        assert!(!input.opened_by(&adapter, MicroMinotari(2), &spending_key));
    }
}
