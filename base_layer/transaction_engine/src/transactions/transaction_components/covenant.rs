// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{io, io::Write};

use serde::{Deserialize, Serialize};

use crate::consensus::{ConsensusEncoding, ConsensusEncodingSized};

/// Spending conditions carried by an output. The engine never interprets covenants; the bytes are committed to by
/// the metadata signature and the output hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Covenant(#[serde(with = "crate::serializers::hex")] Vec<u8>);

impl Covenant {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ConsensusEncoding for Covenant {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        self.0.consensus_encode(writer)
    }
}

impl ConsensusEncodingSized for Covenant {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_is_length_encoded() {
        assert_eq!(Covenant::new().to_consensus_bytes(), vec![0]);
        assert_eq!(Covenant::from_bytes(&[1, 2]).to_consensus_bytes(), vec![2, 1, 2]);
    }
}
