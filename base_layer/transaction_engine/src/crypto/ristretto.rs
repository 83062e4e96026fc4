// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::sync::Mutex;

use log::*;
use rand::{
    rngs::{OsRng, StdRng},
    SeedableRng,
};
use tari_crypto::{
    commitment::HomomorphicCommitmentFactory,
    keys::{PublicKey as PublicKeyTrait, SecretKey},
    range_proof::RangeProofService,
    ristretto::bulletproofs_plus::BulletproofsPlusService,
};

use crate::{
    config::TransactionEngineConfig,
    crypto::{AdapterError, CommitmentSignatureAdapter},
    types::{ComSignature, Commitment, CommitmentFactory, HashOutput, PrivateKey, PublicKey, RangeProof, Signature},
};

const LOG_TARGET: &str = "c::tx::crypto::ristretto";

/// Ristretto255 implementation of the commitment and signature primitives, using Pedersen commitments and
/// Bulletproofs+ range proofs from `tari_crypto`.
pub struct RistrettoAdapter {
    commitment_factory: CommitmentFactory,
    range_proof_service: BulletproofsPlusService,
    // Only set for reproducible test vectors
    seeded_rng: Option<Mutex<StdRng>>,
}

impl RistrettoAdapter {
    pub fn new(config: &TransactionEngineConfig) -> Result<Self, AdapterError> {
        let commitment_factory = CommitmentFactory::default();
        let range_proof_service =
            BulletproofsPlusService::init(config.range_proof_bit_length, 1, CommitmentFactory::default())
                .map_err(|e| AdapterError::RangeProof(e.to_string()))?;
        debug!(
            target: LOG_TARGET,
            "Initialised Ristretto adapter with {}-bit range proofs", config.range_proof_bit_length
        );
        Ok(Self {
            commitment_factory,
            range_proof_service,
            seeded_rng: None,
        })
    }

    /// An adapter whose random keys and nonces are drawn from a seeded RNG. Range proofs still use OS randomness,
    /// which does not affect any hash or challenge.
    pub fn seeded(config: &TransactionEngineConfig, seed: u64) -> Result<Self, AdapterError> {
        let mut adapter = Self::new(config)?;
        adapter.seeded_rng = Some(Mutex::new(StdRng::seed_from_u64(seed)));
        Ok(adapter)
    }

    /// A 32-byte digest zero-extended to 64 bytes, which `from_uniform_bytes` reduces to `digest mod l`
    fn wide_challenge(challenge: &HashOutput) -> [u8; 64] {
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(challenge);
        wide
    }

    fn challenge_scalar(challenge: &HashOutput) -> Result<PrivateKey, AdapterError> {
        PrivateKey::from_uniform_bytes(&Self::wide_challenge(challenge)).map_err(|_| AdapterError::InvalidChallenge)
    }
}

impl CommitmentSignatureAdapter for RistrettoAdapter {
    fn random_secret_key(&self) -> PrivateKey {
        match &self.seeded_rng {
            Some(rng) => {
                let mut rng = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                PrivateKey::random(&mut *rng)
            },
            None => PrivateKey::random(&mut OsRng),
        }
    }

    fn commit(&self, blinding: &PrivateKey, value: u64) -> Commitment {
        self.commitment_factory.commit_value(blinding, value)
    }

    fn public_key_from_secret(&self, secret: &PrivateKey) -> PublicKey {
        PublicKey::from_secret_key(secret)
    }

    fn commit_private_keys(&self, nonce_a: &PrivateKey, nonce_x: &PrivateKey) -> Commitment {
        self.commitment_factory.commit(nonce_x, nonce_a)
    }

    fn sign_commitment_challenge_with_nonce(
        &self,
        a: &PrivateKey,
        x: &PrivateKey,
        nonce_a: &PrivateKey,
        nonce_x: &PrivateKey,
        challenge: &HashOutput,
    ) -> Result<ComSignature, AdapterError> {
        ComSignature::sign(
            a,
            x,
            nonce_a,
            nonce_x,
            &Self::wide_challenge(challenge),
            &self.commitment_factory,
        )
        .map_err(|e| AdapterError::Signing(e.to_string()))
    }

    fn sign_challenge_with_nonce(
        &self,
        secret: &PrivateKey,
        nonce: &PrivateKey,
        challenge: &HashOutput,
    ) -> Result<Signature, AdapterError> {
        Signature::sign_raw_uniform(secret, nonce.clone(), &Self::wide_challenge(challenge))
            .map_err(|e| AdapterError::Signing(e.to_string()))
    }

    fn add_secret_keys(&self, a: &PrivateKey, b: &PrivateKey) -> PrivateKey {
        a + b
    }

    fn subtract_secret_keys(&self, a: &PrivateKey, b: &PrivateKey) -> PrivateKey {
        a - b
    }

    fn secret_key_from_value(&self, value: u64) -> PrivateKey {
        PrivateKey::from(value)
    }

    fn secret_key_from_digest(&self, digest: &HashOutput) -> Result<PrivateKey, AdapterError> {
        Self::challenge_scalar(digest)
    }

    fn create_range_proof(&self, blinding: &PrivateKey, value: u64) -> Result<RangeProof, AdapterError> {
        self.range_proof_service
            .construct_proof(blinding, value)
            .map(RangeProof::from)
            .map_err(|e| AdapterError::RangeProof(e.to_string()))
    }

    fn verify_range_proof(&self, proof: &RangeProof, commitment: &Commitment) -> bool {
        self.range_proof_service.verify(proof.as_vec(), commitment)
    }

    fn verify_signature(&self, signature: &Signature, public_key: &PublicKey, challenge: &HashOutput) -> bool {
        signature.verify_raw_uniform(public_key, &Self::wide_challenge(challenge))
    }

    fn verify_commitment_signature(
        &self,
        signature: &ComSignature,
        commitment: &Commitment,
        challenge: &HashOutput,
    ) -> bool {
        signature.verify_challenge(commitment, &Self::wide_challenge(challenge), &self.commitment_factory)
    }

    fn add_commitments(&self, a: &Commitment, b: &Commitment) -> Commitment {
        Commitment::from_public_key(&(a.as_public_key() + b.as_public_key()))
    }

    fn subtract_commitments(&self, a: &Commitment, b: &Commitment) -> Commitment {
        Commitment::from_public_key(&(a.as_public_key() - b.as_public_key()))
    }

    fn commitment_add_public_key(&self, commitment: &Commitment, public_key: &PublicKey) -> Commitment {
        Commitment::from_public_key(&(commitment.as_public_key() + public_key))
    }
}
