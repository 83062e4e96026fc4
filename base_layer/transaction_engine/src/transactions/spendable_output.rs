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

use crate::{
    crypto::CommitmentSignatureAdapter,
    script::{ExecutionStack, TariScript},
    transactions::{
        tari_amount::MicroMinotari,
        transaction_components::{
            Covenant,
            EncryptedValue,
            OutputFeatures,
            TransactionError,
            TransactionInput,
            TransactionOutput,
        },
    },
    types::{BlindingFactor, PrivateKey},
};

/// An output together with the secrets needed to spend it: the commitment opening, the script key and the sender
/// offset key.
#[derive(Debug, Clone)]
pub struct SpendableOutput {
    pub output: TransactionOutput,
    pub value: MicroMinotari,
    pub spending_key: BlindingFactor,
    pub script_private_key: PrivateKey,
    pub sender_offset_private_key: PrivateKey,
    pub input_data: ExecutionStack,
}

impl SpendableOutput {
    /// Commits to `value` under `spending_key` and assembles a fully signed output: range proof, encrypted value and
    /// metadata signature. The input data pushes the script public key, so the default `Nop` script leaves exactly
    /// that key on the stack.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        adapter: &dyn CommitmentSignatureAdapter,
        value: MicroMinotari,
        features: OutputFeatures,
        script: TariScript,
        covenant: Covenant,
        spending_key: BlindingFactor,
        script_private_key: PrivateKey,
        sender_offset_private_key: PrivateKey,
    ) -> Result<Self, TransactionError> {
        features.validate()?;
        let commitment = adapter.commit(&spending_key, value.as_u64());
        let proof = adapter.create_range_proof(&spending_key, value.as_u64())?;
        let encrypted_value = EncryptedValue::encrypt_value(&spending_key, &commitment, value)?;
        let minimum_value_promise = MicroMinotari::zero();
        let metadata_signature = TransactionOutput::create_metadata_signature(
            adapter,
            value,
            &spending_key,
            &script,
            &features,
            &sender_offset_private_key,
            &covenant,
            &encrypted_value,
            minimum_value_promise,
        )?;
        let output = TransactionOutput::new(
            features,
            commitment,
            proof,
            script,
            adapter.public_key_from_secret(&sender_offset_private_key),
            metadata_signature,
            covenant,
            encrypted_value,
            minimum_value_promise,
        );
        let input_data = inputs!(adapter.public_key_from_secret(&script_private_key));

        Ok(Self {
            output,
            value,
            spending_key,
            script_private_key,
            sender_offset_private_key,
            input_data,
        })
    }

    pub fn script(&self) -> &TariScript {
        &self.output.script
    }

    pub fn features(&self) -> &OutputFeatures {
        &self.output.features
    }

    /// Builds the input that spends this output, signing the script challenge with the spending and script keys.
    pub fn to_transaction_input(
        &self,
        adapter: &dyn CommitmentSignatureAdapter,
    ) -> Result<TransactionInput, TransactionError> {
        let output = &self.output;
        let script_signature = TransactionInput::create_script_signature(
            adapter,
            self.value,
            &self.spending_key,
            &self.script_private_key,
            &output.script,
            &self.input_data,
            &output.commitment,
        )?;
        Ok(TransactionInput::new(
            output.features.clone(),
            output.commitment.clone(),
            output.script.clone(),
            self.input_data.clone(),
            script_signature,
            output.sender_offset_public_key.clone(),
            output.covenant.clone(),
            output.encrypted_value.clone(),
            output.minimum_value_promise,
        ))
    }

    /// Recovers the value from the output's encrypted value. Only the holder of the spending key can do this.
    pub fn decrypt_value(&self) -> Result<MicroMinotari, TransactionError> {
        Ok(EncryptedValue::decrypt_value(
            &self.spending_key,
            &self.output.commitment,
            &self.output.encrypted_value,
        )?)
    }
}
