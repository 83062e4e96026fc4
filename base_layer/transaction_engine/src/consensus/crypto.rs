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

use tari_utilities::ByteArray;

use crate::{
    consensus::{ConsensusDecoding, ConsensusEncoding, ConsensusEncodingSized},
    types::{Commitment, PublicKey, KEY_LENGTH},
};

/// Writes a fixed width field with no length prefix. A field of the wrong width is an implementation error, so this
/// fails fast rather than truncating or padding.
fn write_fixed_width<W: Write>(field: &str, bytes: &[u8], writer: &mut W) -> Result<(), io::Error> {
    assert_eq!(
        bytes.len(),
        KEY_LENGTH,
        "`{}` must be exactly {} bytes, got {}",
        field,
        KEY_LENGTH,
        bytes.len()
    );
    writer.write_all(bytes)
}

fn read_point<R: Read>(reader: &mut R) -> Result<PublicKey, io::Error> {
    let mut buf = [0u8; KEY_LENGTH];
    reader.read_exact(&mut buf)?;
    PublicKey::from_canonical_bytes(&buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))
}

impl ConsensusEncoding for PublicKey {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        write_fixed_width("public key", self.as_bytes(), writer)
    }
}

impl ConsensusEncodingSized for PublicKey {
    fn consensus_encode_exact_size(&self) -> usize {
        KEY_LENGTH
    }
}

impl ConsensusDecoding for PublicKey {
    fn consensus_decode<R: Read>(reader: &mut R) -> Result<Self, io::Error> {
        read_point(reader)
    }
}

impl ConsensusEncoding for Commitment {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        write_fixed_width("commitment", self.as_bytes(), writer)
    }
}

impl ConsensusEncodingSized for Commitment {
    fn consensus_encode_exact_size(&self) -> usize {
        KEY_LENGTH
    }
}

impl ConsensusDecoding for Commitment {
    fn consensus_decode<R: Read>(reader: &mut R) -> Result<Self, io::Error> {
        read_point(reader).map(|p| Commitment::from_public_key(&p))
    }
}
