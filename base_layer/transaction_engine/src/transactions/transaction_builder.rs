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

use std::sync::Arc;

use log::*;
use tari_utilities::hex::Hex;

use crate::{
    config::{KernelOffsetPolicy, TransactionEngineConfig},
    crypto::CommitmentSignatureAdapter,
    script::TariScript,
    transactions::{
        spendable_output::SpendableOutput,
        tari_amount::MicroMinotari,
        transaction_components::{
            Covenant,
            KernelBuilder,
            KernelFeatures,
            OutputFeatures,
            Transaction,
            TransactionError,
            TransactionInput,
            TransactionKernel,
            TransactionOutput,
        },
    },
    types::{BlindingFactor, PrivateKey},
};

pub const LOG_TARGET: &str = "c::tx::transaction_builder";

pub const MAX_TRANSACTION_INPUTS: usize = 12_500;
pub const MAX_TRANSACTION_OUTPUTS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuilderState {
    Empty,
    Accumulating,
}

/// Assembles a single-kernel transaction from outputs it creates and inputs that spend previously created outputs.
///
/// The builder keeps running sums of the blinding factors and script offsets as inputs and outputs are added, so
/// `build` only has to split off the kernel offset and sign. All scalar arithmetic goes through the adapter and is
/// reduced modulo the group order.
pub struct TransactionBuilder {
    adapter: Arc<dyn CommitmentSignatureAdapter>,
    config: TransactionEngineConfig,
    state: BuilderState,
    fee: MicroMinotari,
    lock_height: u64,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
    // sum(k_out) - sum(k_in)
    excess_blinding_factor: BlindingFactor,
    // sum(k_script of inputs) - sum(k_sender_offset of outputs)
    script_offset: PrivateKey,
    total_input_value: MicroMinotari,
    total_output_value: MicroMinotari,
}

impl TransactionBuilder {
    pub fn new(adapter: Arc<dyn CommitmentSignatureAdapter>, config: TransactionEngineConfig) -> Self {
        Self {
            adapter,
            config,
            state: BuilderState::Empty,
            fee: MicroMinotari::zero(),
            lock_height: 0,
            inputs: Vec::new(),
            outputs: Vec::new(),
            excess_blinding_factor: PrivateKey::default(),
            script_offset: PrivateKey::default(),
            total_input_value: MicroMinotari::zero(),
            total_output_value: MicroMinotari::zero(),
        }
    }

    /// Set the absolute fee for the transaction. It is committed to by the kernel signature.
    pub fn with_fee(&mut self, fee: MicroMinotari) -> &mut Self {
        self.fee = fee;
        self
    }

    /// Sets the minimum block height that this transaction will be mined.
    pub fn with_lock_height(&mut self, lock_height: u64) -> &mut Self {
        self.lock_height = lock_height;
        self
    }

    /// Creates a new output for `amount` with fresh spending, script and sender offset keys, and adds it to the
    /// transaction. The returned `SpendableOutput` holds the secrets needed to spend it later.
    pub fn add_output(
        &mut self,
        amount: MicroMinotari,
        features: OutputFeatures,
    ) -> Result<SpendableOutput, TransactionError> {
        if self.outputs.len() >= MAX_TRANSACTION_OUTPUTS {
            return Err(TransactionError::ValidationError(
                "Too many outputs in transaction".to_string(),
            ));
        }
        // The validator leaves coinbase outputs out of the script offset
        if features.is_coinbase() {
            return Err(TransactionError::ValidationError(
                "Coinbase outputs must be built with the CoinbaseBuilder".to_string(),
            ));
        }
        if features.version != self.config.protocol_version {
            return Err(TransactionError::ValidationError(format!(
                "Output features version {:?} does not match the configured protocol version {:?}",
                features.version, self.config.protocol_version
            )));
        }
        let adapter = self.adapter.as_ref();
        let spendable = SpendableOutput::build(
            adapter,
            amount,
            features,
            TariScript::default(),
            Covenant::default(),
            adapter.random_secret_key(),
            adapter.random_secret_key(),
            adapter.random_secret_key(),
        )?;

        self.total_output_value = self
            .total_output_value
            .checked_add(amount)
            .ok_or_else(|| TransactionError::ValidationError("Total output value overflows u64".to_string()))?;
        self.excess_blinding_factor = adapter.add_secret_keys(&self.excess_blinding_factor, &spendable.spending_key);
        self.script_offset = adapter.subtract_secret_keys(&self.script_offset, &spendable.sender_offset_private_key);
        self.outputs.push(spendable.output.clone());
        self.state = BuilderState::Accumulating;
        debug!(
            target: LOG_TARGET,
            "Added output {} ({})",
            spendable.output.commitment.to_hex(),
            amount
        );
        Ok(spendable)
    }

    /// Spends a previously created output. The script signature is made with the output's spending and script keys.
    pub fn add_input(&mut self, spendable: &SpendableOutput) -> Result<&mut Self, TransactionError> {
        if self.inputs.len() >= MAX_TRANSACTION_INPUTS {
            return Err(TransactionError::ValidationError(
                "Too many inputs in transaction".to_string(),
            ));
        }
        let adapter = self.adapter.as_ref();
        let input = spendable.to_transaction_input(adapter)?;

        self.total_input_value = self
            .total_input_value
            .checked_add(spendable.value)
            .ok_or_else(|| TransactionError::ValidationError("Total input value overflows u64".to_string()))?;
        self.excess_blinding_factor =
            adapter.subtract_secret_keys(&self.excess_blinding_factor, &spendable.spending_key);
        self.script_offset = adapter.add_secret_keys(&self.script_offset, &spendable.script_private_key);
        debug!(target: LOG_TARGET, "Added input {}", input.commitment.to_hex());
        self.inputs.push(input);
        self.state = BuilderState::Accumulating;
        Ok(self)
    }

    /// Splits the kernel offset out of the accumulated excess, signs the kernel and returns the sorted transaction.
    pub fn build(self) -> Result<Transaction, TransactionError> {
        if self.state == BuilderState::Empty {
            return Err(TransactionError::EmptyTransaction);
        }
        let adapter = self.adapter.as_ref();
        let expected_outputs = self.total_input_value.checked_sub(self.fee);
        if expected_outputs != Some(self.total_output_value) {
            warn!(
                target: LOG_TARGET,
                "Transaction does not balance: inputs {}, outputs {}, fee {}",
                self.total_input_value,
                self.total_output_value,
                self.fee
            );
        }

        let offset = match self.config.kernel_offset {
            KernelOffsetPolicy::Zero => PrivateKey::default(),
            KernelOffsetPolicy::Random => adapter.random_secret_key(),
        };
        let excess_key = adapter.subtract_secret_keys(&self.excess_blinding_factor, &offset);
        let excess = adapter.commit(&excess_key, 0);
        let nonce = adapter.random_secret_key();
        let features = KernelFeatures::empty();
        let challenge = TransactionKernel::build_kernel_signature_challenge(
            &adapter.public_key_from_secret(&nonce),
            &excess,
            self.fee,
            self.lock_height,
            &features,
        );
        let signature = adapter.sign_challenge_with_nonce(&excess_key, &nonce, &challenge)?;
        let kernel = KernelBuilder::new()
            .with_features(features)
            .with_fee(self.fee)
            .with_lock_height(self.lock_height)
            .with_excess(&excess)
            .with_signature(&signature)
            .build()?;

        debug!(
            target: LOG_TARGET,
            "Built transaction with {} input(s), {} output(s), fee {} and excess {}",
            self.inputs.len(),
            self.outputs.len(),
            self.fee,
            excess.to_hex()
        );
        let mut transaction = Transaction::new(self.inputs, self.outputs, vec![kernel], offset, self.script_offset);
        transaction.body.sort();
        Ok(transaction)
    }
}
