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

use std::{
    convert::TryFrom,
    io,
    io::{Read, Write},
    ops::Deref,
};

use integer_encoding::{VarInt, VarIntReader, VarIntWriter};
use serde::{Deserialize, Serialize};

use crate::consensus::{ConsensusDecoding, ConsensusEncoding, ConsensusEncodingSized};

/// Prefixes `bytes` with its length as a varint. Used for the script, covenant and input data fields, which are the
/// only variable length fields of the signature challenges.
pub fn to_length_encoded(bytes: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(bytes.len().required_space() + bytes.len());
    // unreachable panic: Vec's Write impl is infallible
    bytes.consensus_encode(&mut buf).expect("unreachable");
    buf
}

impl ConsensusEncoding for Vec<u8> {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        self.as_slice().consensus_encode(writer)
    }
}

impl ConsensusEncodingSized for Vec<u8> {
    fn consensus_encode_exact_size(&self) -> usize {
        let len = self.len();
        len.required_space() + len
    }
}

impl ConsensusEncoding for [u8] {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        writer.write_varint(self.len())?;
        writer.write_all(self)?;
        Ok(())
    }
}

impl ConsensusEncoding for &[u8] {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        (**self).consensus_encode(writer)
    }
}

/// A byte vector whose decoded length is bounded, preventing unbounded allocation when reading untrusted bytes.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize, Serialize)]
pub struct MaxSizeBytes<const MAX: usize> {
    inner: Vec<u8>,
}

impl<const MAX: usize> MaxSizeBytes<MAX> {
    pub fn from_bytes_checked<T: AsRef<[u8]>>(bytes: T) -> Option<Self> {
        let b = bytes.as_ref();
        if b.len() > MAX {
            None
        } else {
            Some(Self { inner: b.to_vec() })
        }
    }
}

impl<const MAX: usize> From<MaxSizeBytes<MAX>> for Vec<u8> {
    fn from(value: MaxSizeBytes<MAX>) -> Self {
        value.inner
    }
}

impl<const MAX: usize> TryFrom<Vec<u8>> for MaxSizeBytes<MAX> {
    type Error = Vec<u8>;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        if value.len() > MAX {
            return Err(value);
        }
        Ok(MaxSizeBytes { inner: value })
    }
}

impl<const MAX: usize> ConsensusEncoding for MaxSizeBytes<MAX> {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        self.inner.consensus_encode(writer)
    }
}

impl<const MAX: usize> ConsensusEncodingSized for MaxSizeBytes<MAX> {
    fn consensus_encode_exact_size(&self) -> usize {
        self.inner.consensus_encode_exact_size()
    }
}

impl<const MAX: usize> ConsensusDecoding for MaxSizeBytes<MAX> {
    fn consensus_decode<R: Read>(reader: &mut R) -> Result<Self, io::Error> {
        let len = reader.read_varint()?;
        if len > MAX {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Vec size ({}) exceeded maximum ({})", len, MAX),
            ));
        }
        let mut bytes = vec![0u8; len];
        reader.read_exact(&mut bytes)?;
        Ok(Self { inner: bytes })
    }
}

impl<const MAX: usize> Deref for MaxSizeBytes<MAX> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<const N: usize> ConsensusEncoding for [u8; N] {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        // For fixed length types we dont need a length byte
        writer.write_all(&self[..])?;
        Ok(())
    }
}

impl<const N: usize> ConsensusEncodingSized for [u8; N] {
    fn consensus_encode_exact_size(&self) -> usize {
        N
    }
}

impl<const N: usize> ConsensusDecoding for [u8; N] {
    fn consensus_decode<R: Read>(reader: &mut R) -> Result<Self, io::Error> {
        let mut buf = [0u8; N];
        reader.read_exact(&mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::OsRng, RngCore};

    use super::*;
    use crate::consensus::check_consensus_encoding_correctness;

    #[test]
    fn it_encodes_and_decodes_correctly() {
        let mut subject = [0u8; 1024];
        OsRng.fill_bytes(&mut subject);
        check_consensus_encoding_correctness(subject).unwrap();

        let mut buf = Vec::new();
        let slice = subject.as_slice();
        slice.consensus_encode(&mut buf).unwrap();
        let mut reader = buf.as_slice();
        let decoded: MaxSizeBytes<1024> = ConsensusDecoding::consensus_decode(&mut reader).unwrap();
        assert_eq!(&*decoded, slice);
        assert!(reader.is_empty());

        let subject = MaxSizeBytes::<1024>::from_bytes_checked(subject).unwrap();
        check_consensus_encoding_correctness(subject).unwrap();
    }

    #[test]
    fn it_length_encodes_with_a_varint() {
        assert_eq!(to_length_encoded(&[]), vec![0]);
        assert_eq!(to_length_encoded(&[0x73]), vec![1, 0x73]);

        let long = vec![9u8; 300];
        let encoded = to_length_encoded(&long);
        // 300 = 0b1_0010_1100 -> 0xac 0x02
        assert_eq!(&encoded[..2], &[0xac, 0x02]);
        assert_eq!(&encoded[2..], long.as_slice());
        assert_eq!(encoded.len(), long.consensus_encode_exact_size());
    }

    #[test]
    fn it_rejects_oversized_bytes() {
        let encoded = to_length_encoded(&[1u8; 5]);
        let err = MaxSizeBytes::<4>::consensus_decode(&mut encoded.as_slice()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(MaxSizeBytes::<4>::from_bytes_checked([1u8; 5]).is_none());
    }
}
