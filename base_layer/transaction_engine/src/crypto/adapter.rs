// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use thiserror::Error;

use crate::types::{ComSignature, Commitment, HashOutput, PrivateKey, PublicKey, RangeProof, Signature};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdapterError {
    #[error("`{field}` must be {expected} bytes, got {actual}")]
    InvalidByteLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid hex for `{field}`: {reason}")]
    InvalidHex { field: &'static str, reason: String },
    #[error("`{field}` is not a canonical scalar: {reason}")]
    InvalidScalar { field: &'static str, reason: String },
    #[error("`{field}` is not a valid curve point: {reason}")]
    InvalidPoint { field: &'static str, reason: String },
    #[error("Challenge could not be represented as a scalar")]
    InvalidChallenge,
    #[error("Signing failed: {0}")]
    Signing(String),
    #[error("Range proof error: {0}")]
    RangeProof(String),
}

/// Commitment and signature primitives required by the transaction and coinbase builders.
///
/// Every operation is synchronous and deterministic given its inputs, except `random_secret_key`. Implementations
/// must reduce all scalar arithmetic modulo the group order.
pub trait CommitmentSignatureAdapter: Send + Sync {
    /// Draws a fresh, uniformly random secret key, used for blinding factors, script keys and nonces
    fn random_secret_key(&self) -> PrivateKey;

    /// `value·H + blinding·G`
    fn commit(&self, blinding: &PrivateKey, value: u64) -> Commitment;

    fn public_key_from_secret(&self, secret: &PrivateKey) -> PublicKey;

    /// Commits to a nonce pair as `nonce_x·G + nonce_a·H`. This is the public nonce of a commitment signature.
    fn commit_private_keys(&self, nonce_a: &PrivateKey, nonce_x: &PrivateKey) -> Commitment;

    /// Produces the commitment signature `(R, u, v)` over the opening `(a, x)` of `a·H + x·G`, with
    /// `R = commit_private_keys(nonce_a, nonce_x)`, `u = nonce_a + e·a` and `v = nonce_x + e·x`.
    fn sign_commitment_challenge_with_nonce(
        &self,
        a: &PrivateKey,
        x: &PrivateKey,
        nonce_a: &PrivateKey,
        nonce_x: &PrivateKey,
        challenge: &HashOutput,
    ) -> Result<ComSignature, AdapterError>;

    /// Produces the Schnorr signature `(R, s)` with `R = nonce·G` and `s = nonce + e·secret`.
    fn sign_challenge_with_nonce(
        &self,
        secret: &PrivateKey,
        nonce: &PrivateKey,
        challenge: &HashOutput,
    ) -> Result<Signature, AdapterError>;

    fn add_secret_keys(&self, a: &PrivateKey, b: &PrivateKey) -> PrivateKey;

    /// `a - b` modulo the group order. Never fails, including when `b > a` as integers.
    fn subtract_secret_keys(&self, a: &PrivateKey, b: &PrivateKey) -> PrivateKey;

    /// Represents an amount as a scalar so that it can be signed as the value half of a commitment opening
    fn secret_key_from_value(&self, value: u64) -> PrivateKey;

    /// Reduces a 32-byte digest to a scalar modulo the group order
    fn secret_key_from_digest(&self, digest: &HashOutput) -> Result<PrivateKey, AdapterError>;

    fn create_range_proof(&self, blinding: &PrivateKey, value: u64) -> Result<RangeProof, AdapterError>;

    fn verify_range_proof(&self, proof: &RangeProof, commitment: &Commitment) -> bool;

    /// `s·G == R + e·P`
    fn verify_signature(&self, signature: &Signature, public_key: &PublicKey, challenge: &HashOutput) -> bool;

    /// `commit(v, u) == R + e·C`
    fn verify_commitment_signature(
        &self,
        signature: &ComSignature,
        commitment: &Commitment,
        challenge: &HashOutput,
    ) -> bool;

    fn add_commitments(&self, a: &Commitment, b: &Commitment) -> Commitment;

    fn subtract_commitments(&self, a: &Commitment, b: &Commitment) -> Commitment;

    /// `C + P`, used to verify signatures made with a commitment's blinding factor plus a second key
    fn commitment_add_public_key(&self, commitment: &Commitment, public_key: &PublicKey) -> Commitment;
}
