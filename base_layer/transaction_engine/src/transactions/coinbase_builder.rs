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
use serde::{Deserialize, Serialize};
use tari_transaction_hashing::{domains::CoinbaseKeysDomain, DomainHasher};
use tari_utilities::{hex::Hex, ByteArray};
use thiserror::Error;

use crate::{
    config::TransactionEngineConfig,
    crypto::{private_key_from_hex, AdapterError, CommitmentSignatureAdapter},
    script::TariScript,
    transactions::{
        spendable_output::SpendableOutput,
        tari_amount::MicroMinotari,
        transaction_components::{
            Covenant,
            KernelBuilder,
            KernelFeatures,
            OutputFeatures,
            OutputType,
            Transaction,
            TransactionError,
            TransactionKernel,
            TransactionOutput,
        },
    },
    types::PrivateKey,
};

pub const LOG_TARGET: &str = "c::tx::coinbase_builder";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoinbaseBuildError {
    #[error("The lock height for this coinbase transaction wasn't provided")]
    MissingLockHeight,
    #[error("The value for the coinbase transaction is missing")]
    MissingFees,
    #[error("The spend key for this coinbase transaction wasn't provided")]
    MissingSpendKey,
    #[error("Invalid blinding key: {0}")]
    InvalidBlindingKey(AdapterError),
    #[error("Coinbase maturity {maturity} does not fit the single byte consensus encoding (max {max})")]
    MaturityOutOfRange { maturity: u64, max: u64 },
    #[error("Coinbase extra is {len} bytes but max is {max}")]
    ExtraTooLong { len: usize, max: usize },
    #[error("Block reward plus fees overflows u64")]
    ValueOverflow,
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),
    #[error("Unable to produce a sender offset key from spend key hash")]
    InvalidSenderOffsetKey,
    #[error("An error occurred building the final transaction: `{0}`")]
    BuildError(#[from] TransactionError),
}

/// The output and kernel of a coinbase, as they are placed in a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinbaseTransaction {
    pub outputs: Vec<TransactionOutput>,
    pub kernels: Vec<TransactionKernel>,
}

pub struct CoinbaseBuilder {
    adapter: Arc<dyn CommitmentSignatureAdapter>,
    config: TransactionEngineConfig,
    lock_height: Option<u64>,
    fees: Option<MicroMinotari>,
    spend_key: Option<PrivateKey>,
    script_key: Option<PrivateKey>,
    script: Option<TariScript>,
    private_nonce: Option<PrivateKey>,
    covenant: Covenant,
    extra: Option<Vec<u8>>,
}

impl CoinbaseBuilder {
    /// Start building a new Coinbase transaction. Build the transaction piecemeal with the builder methods.
    pub fn new(adapter: Arc<dyn CommitmentSignatureAdapter>, config: TransactionEngineConfig) -> Self {
        CoinbaseBuilder {
            adapter,
            config,
            lock_height: None,
            fees: None,
            spend_key: None,
            script_key: None,
            script: None,
            private_nonce: None,
            covenant: Covenant::default(),
            extra: None,
        }
    }

    /// Assign the lock height. The coinbase output cannot be spent before this height, so it becomes the output's
    /// maturity.
    pub fn with_lock_height(mut self, height: u64) -> Self {
        self.lock_height = Some(height);
        self
    }

    /// Indicates the sum total of all fees that the coinbase transaction earns, over and above the block reward
    pub fn with_fees(mut self, value: MicroMinotari) -> Self {
        self.fees = Some(value);
        self
    }

    /// Provides the private spend key for this transaction. This will usually be provided by a miner's wallet instance.
    pub fn with_spend_key(mut self, key: PrivateKey) -> Self {
        self.spend_key = Some(key);
        self
    }

    /// Provides the private script key for this transaction. Defaults to the spend key.
    pub fn with_script_key(mut self, key: PrivateKey) -> Self {
        self.script_key = Some(key);
        self
    }

    /// Provides the script for this transaction. Defaults to `Nop`.
    pub fn with_script(mut self, script: TariScript) -> Self {
        self.script = Some(script);
        self
    }

    /// Set the covenant for this transaction.
    pub fn with_covenant(mut self, covenant: Covenant) -> Self {
        self.covenant = covenant;
        self
    }

    /// The nonce to be used for the kernel signature. A fresh one is drawn from the adapter if none is given.
    pub fn with_nonce(mut self, nonce: PrivateKey) -> Self {
        self.private_nonce = Some(nonce);
        self
    }

    /// Provide some arbitrary additional information that will be stored in the coinbase output's metadata field.
    pub fn with_extra(mut self, extra: Vec<u8>) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Try and construct a Coinbase Transaction for the given block reward. Coinbase transactions have an offset and
    /// script offset of zero, a kernel with no fee and no lock height, and the `Coinbase` flags on the output and
    /// kernel. The output value is the reward plus the fees.
    ///
    /// After `build_with_reward` is called, the struct is destroyed and the private keys stored are dropped and the
    /// memory zeroed out.
    pub fn build_with_reward(
        self,
        block_reward: MicroMinotari,
    ) -> Result<(Transaction, SpendableOutput), CoinbaseBuildError> {
        let lock_height = self.lock_height.ok_or(CoinbaseBuildError::MissingLockHeight)?;
        let fees = self.fees.ok_or(CoinbaseBuildError::MissingFees)?;
        let total_reward = block_reward
            .checked_add(fees)
            .ok_or(CoinbaseBuildError::ValueOverflow)?;
        let spending_key = self.spend_key.ok_or(CoinbaseBuildError::MissingSpendKey)?;
        if lock_height > OutputFeatures::MAX_MATURITY {
            return Err(CoinbaseBuildError::MaturityOutOfRange {
                maturity: lock_height,
                max: OutputFeatures::MAX_MATURITY,
            });
        }
        let extra = self.extra.unwrap_or_default();
        if extra.len() > self.config.coinbase_extra_max_len {
            return Err(CoinbaseBuildError::ExtraTooLong {
                len: extra.len(),
                max: self.config.coinbase_extra_max_len,
            });
        }
        let adapter = self.adapter.as_ref();
        let script_private_key = self.script_key.unwrap_or_else(|| spending_key.clone());
        let script = self.script.unwrap_or_default();
        let sender_offset_private_key = derive_sender_offset_key(adapter, &spending_key)?;

        let output_features =
            OutputFeatures::new(self.config.protocol_version, OutputType::Coinbase, lock_height, extra)?;
        let spendable = SpendableOutput::build(
            adapter,
            total_reward,
            output_features,
            script,
            self.covenant,
            spending_key.clone(),
            script_private_key,
            sender_offset_private_key,
        )?;

        let excess = adapter.commit(&spending_key, 0);
        let kernel_features = KernelFeatures::create_coinbase();
        let nonce = self.private_nonce.unwrap_or_else(|| adapter.random_secret_key());
        let challenge = TransactionKernel::build_kernel_signature_challenge(
            &adapter.public_key_from_secret(&nonce),
            &excess,
            MicroMinotari::zero(),
            0,
            &kernel_features,
        );
        let sig = adapter
            .sign_challenge_with_nonce(&spending_key, &nonce, &challenge)
            .map_err(TransactionError::from)?;
        let kernel = KernelBuilder::new()
            .with_fee(MicroMinotari::zero())
            .with_features(kernel_features)
            .with_lock_height(0)
            .with_excess(&excess)
            .with_signature(&sig)
            .build()?;

        debug!(
            target: LOG_TARGET,
            "Built coinbase for {} maturing at {} with excess {}",
            total_reward,
            lock_height,
            excess.to_hex()
        );
        let mut tx = Transaction::new(
            vec![],
            vec![spendable.output.clone()],
            vec![kernel],
            PrivateKey::default(),
            PrivateKey::default(),
        );
        tx.body.sort();
        Ok((tx, spendable))
    }
}

/// The sender offset key of a coinbase is a function of the spend key, so the output hash depends only on the value,
/// spend key, maturity and extra data.
fn derive_sender_offset_key(
    adapter: &dyn CommitmentSignatureAdapter,
    spending_key: &PrivateKey,
) -> Result<PrivateKey, CoinbaseBuildError> {
    let spending_key_hash = DomainHasher::<CoinbaseKeysDomain>::new("sender_offset_private_key")
        .chain(spending_key.as_bytes())
        .finalize();
    adapter
        .secret_key_from_digest(&spending_key_hash)
        .map_err(|_| CoinbaseBuildError::InvalidSenderOffsetKey)
}

/// Builds the coinbase output and kernel paying `value + fee` to the hex encoded blinding key, spendable from
/// `lock_height`.
pub fn generate_coinbase(
    adapter: Arc<dyn CommitmentSignatureAdapter>,
    config: &TransactionEngineConfig,
    value: MicroMinotari,
    blinding_key_hex: &str,
    fee: MicroMinotari,
    lock_height: u64,
) -> Result<CoinbaseTransaction, CoinbaseBuildError> {
    config
        .validate()
        .map_err(|e| CoinbaseBuildError::InvalidConfig(e.to_string()))?;
    let spend_key =
        private_key_from_hex("blinding_key", blinding_key_hex).map_err(CoinbaseBuildError::InvalidBlindingKey)?;
    let (tx, _) = CoinbaseBuilder::new(adapter, config.clone())
        .with_lock_height(lock_height)
        .with_fees(fee)
        .with_spend_key(spend_key)
        .build_with_reward(value)?;
    let (_, outputs, kernels) = tx.body.dissolve();
    Ok(CoinbaseTransaction { outputs, kernels })
}
