// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use tari_utilities::ByteArray;

use crate::{
    crypto::AdapterError,
    types::{Commitment, PrivateKey, PublicKey, KEY_LENGTH},
};

fn check_length(field: &'static str, bytes: &[u8]) -> Result<(), AdapterError> {
    if bytes.len() != KEY_LENGTH {
        return Err(AdapterError::InvalidByteLength {
            field,
            expected: KEY_LENGTH,
            actual: bytes.len(),
        });
    }
    Ok(())
}

/// Parses a 32-byte little-endian scalar. Non-canonical scalars (>= the group order) are rejected.
pub fn private_key_from_bytes(field: &'static str, bytes: &[u8]) -> Result<PrivateKey, AdapterError> {
    check_length(field, bytes)?;
    PrivateKey::from_canonical_bytes(bytes).map_err(|e| AdapterError::InvalidScalar {
        field,
        reason: e.to_string(),
    })
}

pub fn private_key_from_hex(field: &'static str, hex_str: &str) -> Result<PrivateKey, AdapterError> {
    let bytes = hex::decode(hex_str).map_err(|e| AdapterError::InvalidHex {
        field,
        reason: e.to_string(),
    })?;
    private_key_from_bytes(field, &bytes)
}

pub fn public_key_from_bytes(field: &'static str, bytes: &[u8]) -> Result<PublicKey, AdapterError> {
    check_length(field, bytes)?;
    PublicKey::from_canonical_bytes(bytes).map_err(|e| AdapterError::InvalidPoint {
        field,
        reason: e.to_string(),
    })
}

pub fn commitment_from_bytes(field: &'static str, bytes: &[u8]) -> Result<Commitment, AdapterError> {
    public_key_from_bytes(field, bytes).map(|p| Commitment::from_public_key(&p))
}

#[cfg(test)]
mod test {
    use rand::rngs::OsRng;
    use tari_crypto::keys::{PublicKey as _, SecretKey as _};

    use super::*;

    #[test]
    fn it_rejects_the_wrong_width() {
        let err = commitment_from_bytes("commitment", &[1u8; 31]).unwrap_err();
        assert_eq!(err, AdapterError::InvalidByteLength {
            field: "commitment",
            expected: 32,
            actual: 31
        });

        let err = private_key_from_hex("blinding_key", "00ff").unwrap_err();
        assert_eq!(err, AdapterError::InvalidByteLength {
            field: "blinding_key",
            expected: 32,
            actual: 2
        });
    }

    #[test]
    fn it_rejects_non_canonical_scalars() {
        let err = private_key_from_bytes("k", &[0xffu8; 32]).unwrap_err();
        assert!(matches!(err, AdapterError::InvalidScalar { field: "k", .. }));
    }

    #[test]
    fn it_rejects_bad_hex() {
        let err = private_key_from_hex("k", "zz").unwrap_err();
        assert!(matches!(err, AdapterError::InvalidHex { field: "k", .. }));
    }

    #[test]
    fn it_parses_keys_and_points() {
        let k = PrivateKey::random(&mut OsRng);
        let p = PublicKey::from_secret_key(&k);
        assert_eq!(private_key_from_hex("k", &hex::encode(k.as_bytes())).unwrap(), k);
        assert_eq!(public_key_from_bytes("p", p.as_bytes()).unwrap(), p);
        assert_eq!(
            commitment_from_bytes("c", p.as_bytes()).unwrap(),
            Commitment::from_public_key(&p)
        );
    }
}
