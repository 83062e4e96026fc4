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
    io,
    io::{Read, Write},
};

use crate::consensus::{ConsensusDecoding, ConsensusEncoding, ConsensusEncodingSized};

/// An optional value is a presence byte, followed by the value only when it is present
impl<T: ConsensusEncoding> ConsensusEncoding for Option<T> {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        match self {
            Some(t) => {
                writer.write_all(&[1u8])?;
                t.consensus_encode(writer)?;
            },
            None => {
                writer.write_all(&[0u8])?;
            },
        }
        Ok(())
    }
}

impl<T: ConsensusEncodingSized> ConsensusEncodingSized for Option<T> {
    fn consensus_encode_exact_size(&self) -> usize {
        1 + self.as_ref().map(|t| t.consensus_encode_exact_size()).unwrap_or(0)
    }
}

impl<T: ConsensusDecoding> ConsensusDecoding for Option<T> {
    fn consensus_decode<R: Read>(reader: &mut R) -> Result<Self, io::Error> {
        let mut buf = [0u8; 1];
        reader.read_exact(&mut buf)?;
        match buf[0] {
            0 => Ok(None),
            1 => {
                let t = T::consensus_decode(reader)?;
                Ok(Some(t))
            },
            b => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("consensus decode: Invalid Option byte {}", b),
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::consensus::{check_consensus_encoding_correctness, MaxSizeBytes};

    #[test]
    fn it_encodes_and_decodes_correctly() {
        let subject = Option::<u64>::None;
        check_consensus_encoding_correctness(subject).unwrap();
        let subject = Some(123u64);
        check_consensus_encoding_correctness(subject).unwrap();
    }

    #[test]
    fn absent_values_are_a_single_zero_byte() {
        assert_eq!(Option::<[u8; 32]>::None.to_consensus_bytes(), vec![0]);
        let present = Some([5u8; 32]).to_consensus_bytes();
        assert_eq!(present.len(), 33);
        assert_eq!(present[0], 1);

        let unique_id = Some(MaxSizeBytes::<8>::from_bytes_checked([1u8, 2]).unwrap());
        assert_eq!(unique_id.to_consensus_bytes(), vec![1, 2, 1, 2]);
    }

    #[test]
    fn it_rejects_an_invalid_presence_byte() {
        let err = Option::<u8>::consensus_decode(&mut [2u8, 0].as_slice()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
