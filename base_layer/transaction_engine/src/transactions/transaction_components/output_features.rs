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
    fmt,
    fmt::{Display, Formatter},
    io,
    io::{Read, Write},
};

use serde::{Deserialize, Serialize};

use super::OutputFeaturesVersion;
use crate::{
    consensus::{ConsensusDecoding, ConsensusEncoding, ConsensusEncodingSized, MaxSizeBytes},
    transactions::transaction_components::{OutputType, TransactionError},
    types::PublicKey,
};

type UniqueIdBytes = MaxSizeBytes<{ OutputFeatures::MAX_UNIQUE_ID_SIZE }>;
type MetadataBytes = MaxSizeBytes<{ OutputFeatures::MAX_METADATA_LENGTH }>;

/// Options for UTXO's
#[derive(Debug, Clone, Hash, PartialEq, Deserialize, Serialize, Eq)]
pub struct OutputFeatures {
    pub version: OutputFeaturesVersion,
    /// Flags are the feature flags that differentiate between outputs, eg Coinbase all of which has different rules
    pub output_type: OutputType,
    /// The min lock height at which the UTXO can be spent. Encoded as a single byte, so it cannot exceed
    /// `MAX_MATURITY`.
    pub maturity: u64,
    pub parent_public_key: Option<PublicKey>,
    #[serde(default, with = "optional_hex")]
    pub unique_id: Option<Vec<u8>>,
    #[serde(with = "crate::serializers::hex")]
    pub metadata: Vec<u8>,
}

impl OutputFeatures {
    pub const MAX_MATURITY: u64 = u8::MAX as u64;
    /// Below 128, so the metadata length prefix is always a single byte
    pub const MAX_METADATA_LENGTH: usize = 64;
    pub const MAX_UNIQUE_ID_SIZE: usize = 256;

    pub fn new(
        version: OutputFeaturesVersion,
        output_type: OutputType,
        maturity: u64,
        metadata: Vec<u8>,
    ) -> Result<OutputFeatures, TransactionError> {
        let features = OutputFeatures {
            version,
            output_type,
            maturity,
            parent_public_key: None,
            unique_id: None,
            metadata,
        };

        features.validate()?;

        Ok(features)
    }

    pub fn create_coinbase(maturity_height: u64, extra: Vec<u8>) -> Result<OutputFeatures, TransactionError> {
        let features = OutputFeatures {
            output_type: OutputType::Coinbase,
            maturity: maturity_height,
            metadata: extra,
            ..Default::default()
        };

        features.validate()?;

        Ok(features)
    }

    #[inline]
    pub fn validate(&self) -> Result<(), TransactionError> {
        if self.maturity > Self::MAX_MATURITY {
            return Err(TransactionError::MaturityOutOfRange {
                maturity: self.maturity,
                max: Self::MAX_MATURITY,
            });
        }

        // Metadata is free-form for coinbases (mining pools can use it) and must be empty otherwise
        if self.output_type != OutputType::Coinbase && !self.metadata.is_empty() {
            return Err(TransactionError::NonCoinbaseHasMetadata);
        }

        if self.output_type == OutputType::Coinbase && self.metadata.len() > Self::MAX_METADATA_LENGTH {
            return Err(TransactionError::InvalidMetadataSize {
                len: self.metadata.len(),
                max: Self::MAX_METADATA_LENGTH,
            });
        }

        if let Some(unique_id) = &self.unique_id {
            if unique_id.len() > Self::MAX_UNIQUE_ID_SIZE {
                return Err(TransactionError::InvalidUniqueIdSize {
                    len: unique_id.len(),
                    max: Self::MAX_UNIQUE_ID_SIZE,
                });
            }
        }

        Ok(())
    }

    #[inline]
    pub fn is_coinbase(&self) -> bool {
        matches!(self.output_type, OutputType::Coinbase)
    }

    fn encode_maturity<W: Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        let maturity = u8::try_from(self.maturity).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "`maturity` {} does not fit in a single byte (max {})",
                    self.maturity,
                    Self::MAX_MATURITY
                ),
            )
        })?;
        maturity.consensus_encode(writer)
    }

    fn encode_metadata<W: Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        if self.metadata.len() > Self::MAX_METADATA_LENGTH {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "`metadata` is {} bytes, which exceeds the single byte length prefix limit of {}",
                    self.metadata.len(),
                    Self::MAX_METADATA_LENGTH
                ),
            ));
        }
        self.metadata.consensus_encode(writer)
    }
}

impl ConsensusEncoding for OutputFeatures {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        // Changing the order of these operations is consensus breaking
        match self.version {
            OutputFeaturesVersion::V0 => {
                self.version.consensus_encode(writer)?;
                self.encode_maturity(writer)?;
                self.output_type.consensus_encode(writer)?;
                self.parent_public_key.consensus_encode(writer)?;
                self.unique_id.consensus_encode(writer)?;
                self.version
                    .write_reserved_slots(self.version.leading_reserved_slots(), writer)?;
                self.encode_metadata(writer)?;
                self.version
                    .write_reserved_slots(self.version.trailing_reserved_slots(), writer)?;
            },
        }

        Ok(())
    }
}

impl ConsensusEncodingSized for OutputFeatures {}

impl ConsensusDecoding for OutputFeatures {
    fn consensus_decode<R: Read>(reader: &mut R) -> Result<Self, io::Error> {
        // Changing the order of these operations is consensus breaking
        let version = OutputFeaturesVersion::consensus_decode(reader)?;
        match version {
            OutputFeaturesVersion::V0 => {
                let maturity = u8::consensus_decode(reader)?;
                let output_type = OutputType::consensus_decode(reader)?;
                let parent_public_key = ConsensusDecoding::consensus_decode(reader)?;
                let unique_id = Option::<UniqueIdBytes>::consensus_decode(reader)?;
                version.read_reserved_slots(version.leading_reserved_slots(), reader)?;
                let metadata = MetadataBytes::consensus_decode(reader)?;
                version.read_reserved_slots(version.trailing_reserved_slots(), reader)?;
                Ok(Self {
                    version,
                    output_type,
                    maturity: u64::from(maturity),
                    parent_public_key,
                    unique_id: unique_id.map(Into::into),
                    metadata: metadata.into(),
                })
            },
        }
    }
}

impl Default for OutputFeatures {
    fn default() -> Self {
        OutputFeatures {
            version: OutputFeaturesVersion::get_current_version(),
            output_type: OutputType::default(),
            maturity: 0,
            parent_public_key: None,
            unique_id: None,
            metadata: vec![],
        }
    }
}

impl Display for OutputFeatures {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OutputFeatures: Flags = {:?}, Maturity = {}",
            self.output_type, self.maturity
        )
    }
}

mod optional_hex {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, ser: S) -> Result<S::Ok, S::Error> {
        value.as_ref().map(hex::encode).serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
