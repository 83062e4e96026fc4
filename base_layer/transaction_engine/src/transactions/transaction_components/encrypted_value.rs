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

use std::{io, io::Write};

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305,
    Key,
    Nonce,
};
use serde::{Deserialize, Serialize};
use tari_transaction_hashing::{domains::WalletOutputEncryptionKeysDomain, DomainHasher};
use tari_utilities::ByteArray;
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

use crate::{
    consensus::{ConsensusEncoding, ConsensusEncodingSized},
    crypto::AdapterError,
    transactions::tari_amount::MicroMinotari,
    types::{Commitment, PrivateKey},
};

pub const SIZE: usize = 24;

/// value: u64 + tag: [u8; 16]
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash, Zeroize)]
pub struct EncryptedValue(#[serde(with = "crate::serializers::hex")] pub [u8; SIZE]);

impl Default for EncryptedValue {
    fn default() -> Self {
        Self([0; SIZE])
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncryptionError {
    #[error("Encryption failed")]
    EncryptionFailed,
    #[error("Decryption failed: the value was not encrypted with this key and commitment")]
    DecryptionFailed,
}

impl EncryptedValue {
    const TAG: &'static [u8] = b"TARI_AAD_VALUE";

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AdapterError> {
        let data = <[u8; SIZE]>::try_from(bytes).map_err(|_| AdapterError::InvalidByteLength {
            field: "encrypted_value",
            expected: SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self(data))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn encrypt_value(
        encryption_key: &PrivateKey,
        commitment: &Commitment,
        value: MicroMinotari,
    ) -> Result<EncryptedValue, EncryptionError> {
        let aead_key = kdf_aead(encryption_key, commitment);
        // Fixed length plaintext under a fixed zero nonce; the key is unique per commitment
        let aead_payload = Payload {
            msg: &value.as_u64().to_le_bytes(),
            aad: Self::TAG,
        };
        let buffer = ChaCha20Poly1305::new(Key::from_slice(aead_key.as_ref()))
            .encrypt(&Nonce::default(), aead_payload)
            .map_err(|_| EncryptionError::EncryptionFailed)?;
        let data = <[u8; SIZE]>::try_from(buffer.as_slice()).map_err(|_| EncryptionError::EncryptionFailed)?;
        Ok(EncryptedValue(data))
    }

    pub fn decrypt_value(
        encryption_key: &PrivateKey,
        commitment: &Commitment,
        value: &EncryptedValue,
    ) -> Result<MicroMinotari, EncryptionError> {
        let aead_key = kdf_aead(encryption_key, commitment);
        let aead_payload = Payload {
            msg: value.as_bytes(),
            aad: Self::TAG,
        };
        let decrypted_bytes = ChaCha20Poly1305::new(Key::from_slice(aead_key.as_ref()))
            .decrypt(&Nonce::default(), aead_payload)
            .map_err(|_| EncryptionError::DecryptionFailed)?;
        let value_bytes =
            <[u8; 8]>::try_from(decrypted_bytes.as_slice()).map_err(|_| EncryptionError::DecryptionFailed)?;
        Ok(u64::from_le_bytes(value_bytes).into())
    }
}

// Derive a ChaCha20-Poly1305 key from the encryption key and commitment
fn kdf_aead(encryption_key: &PrivateKey, commitment: &Commitment) -> Zeroizing<[u8; 32]> {
    Zeroizing::new(
        DomainHasher::<WalletOutputEncryptionKeysDomain>::new("encrypted_value")
            .chain(encryption_key.as_bytes())
            .chain(commitment.as_bytes())
            .finalize(),
    )
}

impl ConsensusEncoding for EncryptedValue {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        writer.write_all(&self.0)?;
        Ok(())
    }
}

impl ConsensusEncodingSized for EncryptedValue {
    fn consensus_encode_exact_size(&self) -> usize {
        SIZE
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::OsRng;
    use tari_crypto::keys::{PublicKey as PublicKeyTrait, SecretKey};

    use super::*;
    use crate::types::PublicKey;

    fn random_commitment() -> Commitment {
        Commitment::from_public_key(&PublicKey::from_secret_key(&PrivateKey::random(&mut OsRng)))
    }

    #[test]
    fn it_encrypts_and_decrypts_correctly() {
        for value in [0, 123456, 654321, u64::MAX] {
            let commitment = random_commitment();
            let encryption_key = PrivateKey::random(&mut OsRng);
            let amount = MicroMinotari::from(value);
            let encrypted_value = EncryptedValue::encrypt_value(&encryption_key, &commitment, amount).unwrap();
            let decrypted_value =
                EncryptedValue::decrypt_value(&encryption_key, &commitment, &encrypted_value).unwrap();
            assert_eq!(amount, decrypted_value);
        }
    }

    #[test]
    fn it_fails_to_decrypt_with_another_commitment() {
        let key = PrivateKey::random(&mut OsRng);
        let encrypted = EncryptedValue::encrypt_value(&key, &random_commitment(), MicroMinotari(5)).unwrap();
        assert_eq!(
            EncryptedValue::decrypt_value(&key, &random_commitment(), &encrypted),
            Err(EncryptionError::DecryptionFailed)
        );
    }

    #[test]
    fn it_checks_the_width_of_raw_bytes() {
        assert!(EncryptedValue::from_bytes(&[0u8; SIZE]).is_ok());
        assert_eq!(
            EncryptedValue::from_bytes(&[0u8; 23]),
            Err(AdapterError::InvalidByteLength {
                field: "encrypted_value",
                expected: SIZE,
                actual: 23
            })
        );
    }
}
