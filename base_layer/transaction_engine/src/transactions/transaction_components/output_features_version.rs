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
    convert::TryFrom,
    io,
    io::{Read, Write},
};

use serde::{Deserialize, Serialize};

use crate::consensus::{ConsensusDecoding, ConsensusEncoding, ConsensusEncodingSized};

/// Output features version. The version selects the consensus layout, including the width of the reserved
/// extension slots.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Deserialize, Serialize, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum OutputFeaturesVersion {
    #[default]
    V0 = 0,
}

impl OutputFeaturesVersion {
    pub fn get_current_version() -> Self {
        Self::V0
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Reserved extension slots written after the unique id, before the metadata
    pub(crate) fn leading_reserved_slots(self) -> usize {
        match self {
            OutputFeaturesVersion::V0 => 3,
        }
    }

    /// Reserved extension slots written after the metadata
    pub(crate) fn trailing_reserved_slots(self) -> usize {
        match self {
            OutputFeaturesVersion::V0 => 1,
        }
    }

    /// Writes `count` reserved slots in this version's format. In V0 every slot is an absent optional, a single
    /// zero byte.
    pub(crate) fn write_reserved_slots<W: Write>(self, count: usize, writer: &mut W) -> Result<(), io::Error> {
        match self {
            OutputFeaturesVersion::V0 => {
                for _ in 0..count {
                    writer.write_all(&[0u8])?;
                }
            },
        }
        Ok(())
    }

    pub(crate) fn read_reserved_slots<R: Read>(self, count: usize, reader: &mut R) -> Result<(), io::Error> {
        match self {
            OutputFeaturesVersion::V0 => {
                for _ in 0..count {
                    let mut buf = [0u8; 1];
                    reader.read_exact(&mut buf)?;
                    if buf[0] != 0 {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidInput,
                            format!("Reserved slot must be empty in {:?}, got byte {}", self, buf[0]),
                        ));
                    }
                }
            },
        }
        Ok(())
    }
}

impl TryFrom<u8> for OutputFeaturesVersion {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OutputFeaturesVersion::V0),
            _ => Err("Unknown or unsupported OutputFeaturesVersion".into()),
        }
    }
}

impl ConsensusEncoding for OutputFeaturesVersion {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        writer.write_all(&[self.as_u8()])?;
        Ok(())
    }
}

impl ConsensusEncodingSized for OutputFeaturesVersion {
    fn consensus_encode_exact_size(&self) -> usize {
        1
    }
}

impl ConsensusDecoding for OutputFeaturesVersion {
    fn consensus_decode<R: Read>(reader: &mut R) -> Result<Self, io::Error> {
        let mut buf = [0u8; 1];
        reader.read_exact(&mut buf)?;
        let version = OutputFeaturesVersion::try_from(buf[0])
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, format!("Unknown version {}", buf[0])))?;
        Ok(version)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_try_from() {
        assert_eq!(OutputFeaturesVersion::try_from(0), Ok(OutputFeaturesVersion::V0));
        assert!(OutputFeaturesVersion::try_from(1).is_err());
    }

    #[test]
    fn v0_reserved_slots_are_zero_bytes() {
        let mut buf = Vec::new();
        OutputFeaturesVersion::V0.write_reserved_slots(3, &mut buf).unwrap();
        assert_eq!(buf, vec![0, 0, 0]);
        OutputFeaturesVersion::V0
            .read_reserved_slots(3, &mut buf.as_slice())
            .unwrap();
        assert!(OutputFeaturesVersion::V0
            .read_reserved_slots(1, &mut [1u8].as_slice())
            .is_err());
    }
}
