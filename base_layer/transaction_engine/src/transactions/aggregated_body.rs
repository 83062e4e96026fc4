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

use std::fmt::{Display, Error, Formatter};

use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    crypto::CommitmentSignatureAdapter,
    transactions::{
        tari_amount::MicroMinotari,
        transaction_components::{
            Transaction,
            TransactionError,
            TransactionInput,
            TransactionKernel,
            TransactionOutput,
        },
    },
    types::{BlindingFactor, Commitment, PrivateKey},
};

pub const LOG_TARGET: &str = "c::tx::aggregated_body";

/// The components of the block or transaction. The same struct can be used for either, since in Mimblewimble,
/// blocks consist of inputs, outputs and kernels, rather than transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateBody {
    /// This flag indicates if the inputs, outputs and kernels have been sorted internally, that is, the sort() method
    /// has been called. This may be false even if all components are sorted.
    #[serde(skip)]
    sorted: bool,
    /// List of inputs spent by the transaction.
    inputs: Vec<TransactionInput>,
    /// List of outputs the transaction produces.
    outputs: Vec<TransactionOutput>,
    /// Kernels contain the excesses and their signatures for transaction
    kernels: Vec<TransactionKernel>,
}

struct KernelSum {
    fees: MicroMinotari,
    sum: Commitment,
}

impl AggregateBody {
    /// Create an empty aggregate body
    pub fn empty() -> AggregateBody {
        // UNCHECKED: empty vecs are sorted
        AggregateBody::new_sorted_unchecked(vec![], vec![], vec![])
    }

    /// Create a new aggregate body from provided inputs, outputs and kernels
    pub fn new(
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
        kernels: Vec<TransactionKernel>,
    ) -> AggregateBody {
        AggregateBody {
            sorted: false,
            inputs,
            outputs,
            kernels,
        }
    }

    /// Create a new aggregate body from provided inputs, outputs and kernels.
    /// It is up to the caller to ensure that the inputs, outputs and kernels are sorted
    pub(crate) fn new_sorted_unchecked(
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
        kernels: Vec<TransactionKernel>,
    ) -> AggregateBody {
        AggregateBody {
            sorted: true,
            inputs,
            outputs,
            kernels,
        }
    }

    /// Provide read-only access to the input list
    pub fn inputs(&self) -> &Vec<TransactionInput> {
        &self.inputs
    }

    /// Provide read-only access to the output list
    pub fn outputs(&self) -> &Vec<TransactionOutput> {
        &self.outputs
    }

    /// Provide read-only access to the kernel list
    pub fn kernels(&self) -> &Vec<TransactionKernel> {
        &self.kernels
    }

    /// Add an input to the existing aggregate body
    pub fn add_input(&mut self, input: TransactionInput) {
        self.inputs.push(input);
        self.sorted = false;
    }

    /// Add an output to the existing aggregate body
    pub fn add_output(&mut self, output: TransactionOutput) {
        self.outputs.push(output);
        self.sorted = false;
    }

    /// Add a kernel to the existing aggregate body
    pub fn add_kernel(&mut self, kernel: TransactionKernel) {
        self.kernels.push(kernel);
        self.sorted = false;
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Sort the component lists of the aggregate body
    pub fn sort(&mut self) {
        if self.sorted {
            return;
        }
        self.inputs.sort();
        self.outputs.sort();
        self.kernels.sort();
        self.sorted = true;
    }

    pub fn contains_duplicated_inputs(&self) -> bool {
        self.inputs
            .iter()
            .enumerate()
            .any(|(i, input)| self.inputs[i + 1..].iter().any(|other| other.commitment == input.commitment))
    }

    pub fn contains_duplicated_outputs(&self) -> bool {
        self.outputs
            .iter()
            .enumerate()
            .any(|(i, output)| self.outputs[i + 1..].iter().any(|other| other.commitment == output.commitment))
    }

    /// Verify the signatures in all kernels contained in this aggregate body.
    pub fn verify_kernel_signatures(&self, adapter: &dyn CommitmentSignatureAdapter) -> Result<(), TransactionError> {
        trace!(target: LOG_TARGET, "Checking kernel signatures",);
        for kernel in &self.kernels {
            kernel.verify_signature(adapter).map_err(|e| {
                warn!(target: LOG_TARGET, "Kernel ({}) signature failed {:?}.", kernel, e);
                e
            })?;
        }
        Ok(())
    }

    pub fn verify_metadata_signatures(&self, adapter: &dyn CommitmentSignatureAdapter) -> Result<(), TransactionError> {
        for output in &self.outputs {
            output.verify_metadata_signature(adapter)?;
        }
        Ok(())
    }

    pub fn get_total_fee(&self) -> Result<MicroMinotari, TransactionError> {
        let mut fee = MicroMinotari::from(0);
        for kernel in &self.kernels {
            fee = fee.checked_add(kernel.fee).ok_or_else(|| {
                TransactionError::ValidationError("Aggregated body has greater fee than u64::MAX".to_string())
            })?;
        }
        Ok(fee)
    }

    /// Validate this body by checking the following:
    /// 1. There are no duplicated inputs or outputs
    /// 1. The kernel signatures sign the canonical challenge with the private excess
    /// 1. The metadata signatures and range proofs of the outputs are valid
    /// 1. The sum of inputs, outputs and fees equal the (public excess value + offset + reward)
    /// 1. Every input script runs, its signature verifies and the script offset balances
    ///
    /// This function does NOT check that inputs come from the UTXO set. The reward is zero for an ordinary
    /// transaction.
    pub fn validate_internal_consistency(
        &self,
        offset: &BlindingFactor,
        script_offset: &BlindingFactor,
        reward: MicroMinotari,
        adapter: &dyn CommitmentSignatureAdapter,
    ) -> Result<(), TransactionError> {
        // Received features may not fit their consensus encoding, and every check below hashes them
        self.validate_features()?;
        if self.contains_duplicated_inputs() || self.contains_duplicated_outputs() {
            return Err(TransactionError::ValidationError(
                "Body contains duplicated inputs or outputs".to_string(),
            ));
        }
        self.verify_kernel_signatures(adapter)?;
        self.verify_metadata_signatures(adapter)?;
        self.validate_range_proofs(adapter)?;

        let total_offset = adapter.commit(offset, reward.as_u64());
        self.validate_kernel_sum(total_offset, adapter)?;
        self.validate_script_offset(script_offset, adapter)
    }

    fn validate_features(&self) -> Result<(), TransactionError> {
        for input in &self.inputs {
            input.features.validate()?;
        }
        for output in &self.outputs {
            output.features.validate()?;
        }
        Ok(())
    }

    pub fn dissolve(self) -> (Vec<TransactionInput>, Vec<TransactionOutput>, Vec<TransactionKernel>) {
        (self.inputs, self.outputs, self.kernels)
    }

    fn zero_commitment(adapter: &dyn CommitmentSignatureAdapter) -> Commitment {
        adapter.commit(&PrivateKey::default(), 0)
    }

    /// Calculate the sum of the inputs and outputs including fees
    fn sum_commitments(&self, fees: MicroMinotari, adapter: &dyn CommitmentSignatureAdapter) -> Commitment {
        let fee_commitment = adapter.commit(&PrivateKey::default(), fees.as_u64());
        let sum_inputs = self
            .inputs
            .iter()
            .fold(Self::zero_commitment(adapter), |acc, i| adapter.add_commitments(&acc, &i.commitment));
        let sum_outputs = self
            .outputs
            .iter()
            .fold(Self::zero_commitment(adapter), |acc, o| adapter.add_commitments(&acc, &o.commitment));
        adapter.add_commitments(&adapter.subtract_commitments(&sum_outputs, &sum_inputs), &fee_commitment)
    }

    /// Calculate the sum of the kernels, taking into account the provided offset, and their constituent fees
    fn sum_kernels(
        &self,
        offset: Commitment,
        adapter: &dyn CommitmentSignatureAdapter,
    ) -> Result<KernelSum, TransactionError> {
        let mut kernel_sum = KernelSum {
            fees: MicroMinotari(0),
            sum: offset,
        };
        for kernel in &self.kernels {
            kernel_sum.fees = kernel_sum.fees.checked_add(kernel.fee).ok_or_else(|| {
                TransactionError::ValidationError("Aggregated body has greater fee than u64::MAX".to_string())
            })?;
            kernel_sum.sum = adapter.add_commitments(&kernel_sum.sum, &kernel.excess);
        }
        Ok(kernel_sum)
    }

    /// Confirm that the (sum of the outputs) - (sum of inputs) + fees = Kernel excess + offset
    fn validate_kernel_sum(
        &self,
        offset: Commitment,
        adapter: &dyn CommitmentSignatureAdapter,
    ) -> Result<(), TransactionError> {
        let kernel_sum = self.sum_kernels(offset, adapter)?;
        let sum_io = self.sum_commitments(kernel_sum.fees, adapter);

        if kernel_sum.sum != sum_io {
            warn!(
                target: LOG_TARGET,
                "Sum of inputs and outputs did not equal sum of kernels with fees"
            );
            return Err(TransactionError::ValidationUnbalanced);
        }

        Ok(())
    }

    fn validate_range_proofs(&self, adapter: &dyn CommitmentSignatureAdapter) -> Result<(), TransactionError> {
        for output in &self.outputs {
            output.verify_range_proof(adapter)?;
        }
        Ok(())
    }

    /// Confirm that the script public keys of the inputs minus the sender offset public keys of the outputs equal
    /// `script_offset·G`. Coinbase outputs have no spender and do not take part in the script offset.
    fn validate_script_offset(
        &self,
        script_offset: &BlindingFactor,
        adapter: &dyn CommitmentSignatureAdapter,
    ) -> Result<(), TransactionError> {
        trace!(target: LOG_TARGET, "Checking script offset");
        let mut total = Self::zero_commitment(adapter);
        for input in &self.inputs {
            let script_key = input.run_and_verify_script(adapter)?;
            total = adapter.commitment_add_public_key(&total, &script_key);
        }
        let sender_offsets = self
            .outputs
            .iter()
            .filter(|o| !o.is_coinbase())
            .fold(Self::zero_commitment(adapter), |acc, o| {
                adapter.commitment_add_public_key(&acc, &o.sender_offset_public_key)
            });
        let expected = adapter.commit(script_offset, 0);
        if adapter.subtract_commitments(&total, &sender_offsets) != expected {
            return Err(TransactionError::ScriptOffset);
        }
        Ok(())
    }
}

/// This will strip away the offset of the transaction returning a pure aggregate body
impl From<Transaction> for AggregateBody {
    fn from(transaction: Transaction) -> Self {
        transaction.body
    }
}

impl Display for AggregateBody {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result<(), Error> {
        if !self.is_sorted() {
            writeln!(fmt, "WARNING: Body is not sorted.")?;
        }
        writeln!(fmt, "--- Transaction Kernels ---")?;
        for (i, kernel) in self.kernels.iter().enumerate() {
            writeln!(fmt, "Kernel {}:", i)?;
            writeln!(fmt, "{}", kernel)?;
        }
        writeln!(fmt, "--- Inputs ({}) ---", self.inputs.len())?;
        for input in &self.inputs {
            writeln!(fmt, "{}", input)?;
        }
        writeln!(fmt, "--- Outputs ({}) ---", self.outputs.len())?;
        for output in &self.outputs {
            writeln!(fmt, "{}", output)?;
        }
        Ok(())
    }
}
