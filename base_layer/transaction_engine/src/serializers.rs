// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Serde helpers for byte fields. Human readable formats get lowercase hex, binary formats get the raw bytes.

pub mod hex {
    use std::convert::TryFrom;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer, T: AsRef<[u8]>>(v: &T, s: S) -> Result<S::Ok, S::Error> {
        if s.is_human_readable() {
            s.serialize_str(&::hex::encode(v.as_ref()))
        } else {
            s.serialize_bytes(v.as_ref())
        }
    }

    pub fn deserialize<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<Vec<u8>>,
    {
        let bytes = if d.is_human_readable() {
            let hex = <String as Deserialize>::deserialize(d)?;
            ::hex::decode(hex).map_err(serde::de::Error::custom)?
        } else {
            <Vec<u8> as Deserialize>::deserialize(d)?
        };

        T::try_from(bytes).map_err(|_| serde::de::Error::custom("Incorrect byte length"))
    }
}
