// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Hash domains and the domain separated hashers used to build transaction signature challenges and output hashes.

mod domain_hasher;
pub use domain_hasher::{DomainHasher, RawHasher, DIGEST_LENGTH};

pub mod domains;
