// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use config::Config;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transactions::transaction_components::{OutputFeatures, OutputFeaturesVersion};

/// Bit lengths supported by the Bulletproofs+ range proof service
const VALID_RANGE_PROOF_BIT_LENGTHS: [usize; 4] = [8, 16, 32, 64];

/// Whether `build()` splits a random offset out of the kernel excess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelOffsetPolicy {
    /// The whole excess goes into the kernel; the transaction offset is zero
    Zero,
    /// A fresh random offset is subtracted from the excess and published in the transaction
    Random,
}

/// Transaction engine configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct TransactionEngineConfig {
    /// Output features version used for every output the engine builds. Selects the reserved slot encoding.
    pub protocol_version: OutputFeaturesVersion,
    /// Bit length of the range proofs. Output values must be below 2^range_proof_bit_length.
    pub range_proof_bit_length: usize,
    /// Kernel offset policy applied by the transaction builder
    pub kernel_offset: KernelOffsetPolicy,
    /// Maximum length of the `extra` metadata a coinbase output may carry
    pub coinbase_extra_max_len: usize,
}

impl Default for TransactionEngineConfig {
    fn default() -> Self {
        Self {
            protocol_version: OutputFeaturesVersion::get_current_version(),
            range_proof_bit_length: 64,
            kernel_offset: KernelOffsetPolicy::Random,
            coinbase_extra_max_len: 64,
        }
    }
}

impl TransactionEngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_RANGE_PROOF_BIT_LENGTHS.contains(&self.range_proof_bit_length) {
            return Err(ConfigError::InvalidValue {
                field: "range_proof_bit_length",
                message: format!(
                    "{} is not one of {:?}",
                    self.range_proof_bit_length, VALID_RANGE_PROOF_BIT_LENGTHS
                ),
            });
        }
        if self.coinbase_extra_max_len > OutputFeatures::MAX_METADATA_LENGTH {
            return Err(ConfigError::InvalidValue {
                field: "coinbase_extra_max_len",
                message: format!(
                    "{} exceeds the consensus limit of {}",
                    self.coinbase_extra_max_len,
                    OutputFeatures::MAX_METADATA_LENGTH
                ),
            });
        }
        Ok(())
    }
}

impl SubConfigPath for TransactionEngineConfig {
    fn main_key_prefix() -> &'static str {
        "transaction_engine"
    }
}

/// Locates a configuration struct within a larger configuration tree.
pub trait SubConfigPath {
    /// Main configuration section
    fn main_key_prefix() -> &'static str;
}

/// Loads a sub-configuration, falling back to its defaults when the section is absent.
pub trait DefaultConfigLoader: SubConfigPath + Default + for<'de> Deserialize<'de> {
    fn load_from(config: &Config) -> Result<Self, ConfigError> {
        match config.get::<Self>(Self::main_key_prefix()) {
            Ok(cfg) => Ok(cfg),
            Err(config::ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

impl<C> DefaultConfigLoader for C where C: SubConfigPath + Default + for<'de> Deserialize<'de> {}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration could not be read: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid value for `{field}`: {message}")]
    InvalidValue { field: &'static str, message: String },
}
