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

use std::{io, io::Write, marker::PhantomData};

use blake2::Blake2b;
use digest::{consts::U32, Digest};
use tari_crypto::hashing::DomainSeparation;

/// The byte length of every digest produced by the hashers in this module.
pub const DIGEST_LENGTH: usize = 32;

type Blake2b256 = Blake2b<U32>;

/// A domain separated Blake2b-256 hasher.
///
/// Construction writes the full domain tag (`<domain>.v<version>.<label>`) into the digest, prefixed with its length
/// as a little-endian u64. Data chained afterwards is written as-is. Callers are responsible for length-prefixing any
/// variable length field, since two adjacent unprefixed fields could otherwise be re-split to produce the same hash.
///
/// `finalize` consumes the hasher, so a finalized hasher can never be written to again.
pub struct DomainHasher<M> {
    inner: RawHasher,
    _m: PhantomData<M>,
}

impl<M: DomainSeparation> DomainHasher<M> {
    #[allow(clippy::new_ret_no_self)]
    pub fn new(label: &'static str) -> Self {
        let tag = M::domain_separation_tag(label);
        let inner = RawHasher::new()
            .chain((tag.len() as u64).to_le_bytes())
            .chain(tag.as_bytes());
        Self {
            inner,
            _m: PhantomData,
        }
    }

    /// Writes the raw bytes into the hasher.
    pub fn update<T: AsRef<[u8]>>(&mut self, data: T) {
        self.inner.update(data);
    }

    pub fn chain<T: AsRef<[u8]>>(mut self, data: T) -> Self {
        self.update(data);
        self
    }

    pub fn finalize(self) -> [u8; DIGEST_LENGTH] {
        self.inner.finalize()
    }
}

impl<M> Write for DomainHasher<M> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A plain Blake2b-256 accumulator with no domain tag. `DomainHasher` writes its tag into one of these.
#[derive(Clone, Default)]
pub struct RawHasher {
    writer: WriteHashWrapper<Blake2b256>,
}

impl RawHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update<T: AsRef<[u8]>>(&mut self, data: T) {
        self.writer.0.update(data.as_ref());
    }

    pub fn chain<T: AsRef<[u8]>>(mut self, data: T) -> Self {
        self.update(data);
        self
    }

    pub fn finalize(self) -> [u8; DIGEST_LENGTH] {
        self.writer.0.finalize().into()
    }
}

impl Write for RawHasher {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Wraps a Digest and implements the Write trait so that consensus encoders can write straight into the hash.
#[derive(Clone, Default)]
struct WriteHashWrapper<D>(D);

impl<D: Digest> Write for WriteHashWrapper<D> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tari_crypto::hash_domain;

    use super::*;
    use crate::domains::TransactionHashDomain;

    hash_domain!(TestHashDomain, "com.tari.test.test_hash", 0);

    #[test]
    fn label_yields_distinct_hash() {
        let input = [1u8; 32];

        let hash_label1 = DomainHasher::<TestHashDomain>::new("label1").chain(input).finalize();
        let hash_label2 = DomainHasher::<TestHashDomain>::new("label2").chain(input).finalize();

        assert_ne!(hash_label1, hash_label2);
    }

    #[test]
    fn it_prefixes_the_tag_with_its_length() {
        let tag = b"com.tari.test.test_hash.v0.foo";
        let expected: [u8; 32] = Blake2b256::default()
            .chain_update((tag.len() as u64).to_le_bytes())
            .chain_update(tag)
            .chain_update([0xffu8, 0x01])
            .finalize()
            .into();

        let hash = DomainHasher::<TestHashDomain>::new("foo").chain([0xffu8, 0x01]).finalize();

        assert_eq!(hash, expected);
    }

    #[test]
    fn it_uses_the_transaction_domain_tag() {
        assert_eq!(
            TransactionHashDomain::domain_separation_tag("kernel_signature"),
            "com.tari.base_layer.core.transactions.v0.kernel_signature"
        );
    }

    #[test]
    fn chained_data_is_not_length_prefixed() {
        let split = DomainHasher::<TestHashDomain>::new("foo")
            .chain([1u8, 2])
            .chain([3u8])
            .finalize();
        let joined = DomainHasher::<TestHashDomain>::new("foo").chain([1u8, 2, 3]).finalize();
        assert_eq!(split, joined);

        let mut written = DomainHasher::<TestHashDomain>::new("foo");
        written.write_all(&[1u8, 2, 3]).unwrap();
        assert_eq!(written.finalize(), joined);
    }

    #[test]
    fn kernel_and_metadata_domains_never_collide() {
        let payload = [7u8; 96];
        let kernel = DomainHasher::<TransactionHashDomain>::new("kernel_signature")
            .chain(payload)
            .finalize();
        let metadata = DomainHasher::<TransactionHashDomain>::new("metadata_signature")
            .chain(payload)
            .finalize();
        assert_ne!(kernel, metadata);
    }

    #[test]
    fn raw_hasher_is_plain_blake2b() {
        let expected: [u8; 32] = Blake2b256::default().chain_update(b"abc").finalize().into();
        assert_eq!(RawHasher::new().chain(b"abc").finalize(), expected);

        // The domain tag changes the output even when nothing else is written
        let tagged = DomainHasher::<TestHashDomain>::new("").chain(b"").finalize();
        let raw = RawHasher::new().chain(b"").finalize();
        assert_ne!(tagged, raw);
    }

    #[test]
    fn it_matches_a_known_vector() {
        // Blake2b-256("abc")
        assert_eq!(
            hex::encode(RawHasher::new().chain(b"abc").finalize()),
            "bddd813c634239723171ef3fee98579b94964e3bb1cb3e427262c8c068d52319"
        );
    }
}
