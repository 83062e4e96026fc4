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

use integer_encoding::{VarInt, VarIntReader, VarIntWriter};

use crate::consensus::{ConsensusDecoding, ConsensusEncoding, ConsensusEncodingSized};

impl ConsensusEncoding for u8 {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        writer.write_all(&[*self])?;
        Ok(())
    }
}

impl ConsensusEncodingSized for u8 {
    fn consensus_encode_exact_size(&self) -> usize {
        1
    }
}

impl ConsensusDecoding for u8 {
    fn consensus_decode<R: Read>(reader: &mut R) -> Result<Self, io::Error> {
        let mut buf = [0u8; 1];
        reader.read_exact(&mut buf)?;
        Ok(buf[0])
    }
}

/// u64 values are varint encoded
impl ConsensusEncoding for u64 {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        writer.write_varint(*self)?;
        Ok(())
    }
}

impl ConsensusEncodingSized for u64 {
    fn consensus_encode_exact_size(&self) -> usize {
        self.required_space()
    }
}

impl ConsensusDecoding for u64 {
    fn consensus_decode<R: Read>(reader: &mut R) -> Result<Self, io::Error> {
        // Decode safety: read_varint will stop reading the varint after 10 bytes
        let n = reader.read_varint()?;
        Ok(n)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::consensus::check_consensus_encoding_correctness;

    #[test]
    fn it_encodes_and_decodes_correctly() {
        check_consensus_encoding_correctness(0u8).unwrap();
        check_consensus_encoding_correctness(255u8).unwrap();
        check_consensus_encoding_correctness(0u64).unwrap();
        check_consensus_encoding_correctness(u64::MAX).unwrap();
    }

    #[test]
    fn u64_is_a_varint() {
        assert_eq!(100u64.to_consensus_bytes(), vec![100]);
        assert_eq!(128u64.to_consensus_bytes(), vec![0x80, 0x01]);
        assert_eq!(u64::MAX.consensus_encode_exact_size(), 10);
    }
}
