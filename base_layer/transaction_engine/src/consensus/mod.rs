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

//! Canonical consensus encoding. Every byte written here must match the validating node's own encoder.

use std::io;

mod bytes;
pub use bytes::{to_length_encoded, MaxSizeBytes};

mod crypto;

mod generic;

mod hashing;
pub use hashing::DomainSeparatedConsensusHasher;

mod integers;

/// Abstracts the ability of a type to canonically encode itself for the purposes of consensus
pub trait ConsensusEncoding {
    /// Encode to the given writer. If writing to this Writer is infallible, this implementation must always succeed
    /// for values that passed validation.
    fn consensus_encode<W: io::Write>(&self, writer: &mut W) -> Result<(), io::Error>;

    fn to_consensus_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        // unreachable panic: Vec's Write impl is infallible, and only validated values reach this point
        self.consensus_encode(&mut buf)
            .expect("Consensus encoding into a Vec failed. Validate values before encoding them.");
        buf
    }
}

pub trait ConsensusEncodingSized: ConsensusEncoding {
    /// The return value MUST be the exact byte size of the implementing type
    /// and SHOULD be implemented without allocations.
    fn consensus_encode_exact_size(&self) -> usize {
        self.to_consensus_bytes().len()
    }
}

/// Abstracts the ability of a type to be decoded from canonical consensus bytes
pub trait ConsensusDecoding: Sized {
    /// Attempt to decode this type from the given reader
    fn consensus_decode<R: io::Read>(reader: &mut R) -> Result<Self, io::Error>;
}

#[cfg(test)]
pub fn check_consensus_encoding_correctness<T>(subject: T) -> Result<(), io::Error>
where T: ConsensusEncoding + ConsensusEncodingSized + ConsensusDecoding + Eq + std::fmt::Debug {
    use std::io::ErrorKind;

    let mut buf = Vec::new();
    subject.consensus_encode(&mut buf)?;
    assert_eq!(buf.len(), subject.consensus_encode_exact_size());

    let mut reader = buf.as_slice();
    let decoded = T::consensus_decode(&mut reader)?;
    assert_eq!(decoded, subject);
    if !reader.is_empty() {
        return Err(io::Error::new(
            ErrorKind::InvalidData,
            format!("Extra bytes at end of data: {}", reader.len()),
        ));
    }
    Ok(())
}
