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

use tari_crypto::hashing::DomainSeparation;
use tari_transaction_hashing::DomainHasher;

use crate::{consensus::ConsensusEncoding, types::HashOutput};

/// Domain separated hasher that writes the consensus encoding of each value it is given.
pub struct DomainSeparatedConsensusHasher<M> {
    hasher: DomainHasher<M>,
}

impl<M: DomainSeparation> DomainSeparatedConsensusHasher<M> {
    #[allow(clippy::new_ret_no_self)]
    pub fn new(label: &'static str) -> Self {
        Self {
            hasher: DomainHasher::new(label),
        }
    }

    pub fn finalize(self) -> HashOutput {
        self.hasher.finalize()
    }

    pub fn update_consensus_encode<T: ConsensusEncoding + ?Sized>(&mut self, data: &T) {
        // Hashing is infallible, so this can only fail for a value that does not fit its consensus width
        data.consensus_encode(&mut self.hasher)
            .expect("Incorrect implementation of ConsensusEncoding encountered. Implementations MUST be infallible.");
    }

    pub fn chain<T: ConsensusEncoding + ?Sized>(mut self, data: &T) -> Self {
        self.update_consensus_encode(data);
        self
    }

    /// Writes bytes as-is, for fields whose consensus form is not their default encoding
    pub fn chain_raw<T: AsRef<[u8]>>(mut self, data: T) -> Self {
        self.hasher.update(data);
        self
    }
}

#[cfg(test)]
mod tests {
    use tari_crypto::hash_domain;

    use super::*;

    hash_domain!(TestHashDomain, "com.tari.test.test_hash", 0);

    #[test]
    fn it_hashes_using_the_domain_hasher() {
        let expected_hash = DomainHasher::<TestHashDomain>::new("foo").chain(b"\xff\x01").finalize();
        let hash = DomainSeparatedConsensusHasher::<TestHashDomain>::new("foo")
            .chain(&255u64)
            .finalize();

        assert_eq!(hash, expected_hash);
    }

    #[test]
    fn raw_and_encoded_writes_can_be_mixed() {
        let expected_hash = DomainHasher::<TestHashDomain>::new("foo")
            .chain(1000u64.to_le_bytes())
            .chain([2u8, 0xaa, 0xbb])
            .finalize();
        let hash = DomainSeparatedConsensusHasher::<TestHashDomain>::new("foo")
            .chain_raw(1000u64.to_le_bytes())
            .chain(&vec![0xaau8, 0xbb])
            .finalize();

        assert_eq!(hash, expected_hash);
    }
}
