// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! The narrow functional surface over the external commitment and signature primitives. The engine never performs
//! curve arithmetic itself; it sequences calls to a [CommitmentSignatureAdapter] and feeds it the challenges built by
//! the challenge builders.

mod adapter;
pub use adapter::{AdapterError, CommitmentSignatureAdapter};

mod parsing;
pub use parsing::{commitment_from_bytes, private_key_from_bytes, private_key_from_hex, public_key_from_bytes};

mod ristretto;
pub use ristretto::RistrettoAdapter;
