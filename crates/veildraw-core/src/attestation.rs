//! Attested disclosures and the trusted-attestor keyring.
//!
//! A withdrawal only settles if the submitted plaintext carries a signature
//! from a key the operator trusts, binding that plaintext to the prize
//! handle. Signature and digest rules live in `veildraw-verifier` so
//! external auditors can check disclosures without this crate.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use ed25519_dalek::VerifyingKey;
use serde::Deserialize;
use thiserror::Error;

use crate::error::{LotteryError, LotteryResult};
use crate::handle::Handle;

pub use veildraw_verifier::{
    disclosure_digest, sign_disclosure, verify_disclosure, AttestationError,
};

/// Signature material attached to a disclosed plaintext: the attestor's
/// ed25519 public key and its signature over the handle/plaintext digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisclosureAttestation {
    pub attestor: [u8; 32],
    pub signature: [u8; 64],
}

#[derive(Debug, Error)]
pub enum KeyringError {
    #[error("failed to read keyring file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse keyring file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("key {0} is not valid hex")]
    InvalidHex(String),

    #[error("key {0} is not a valid ed25519 public key")]
    InvalidKey(String),
}

#[derive(Debug, Deserialize)]
struct KeyringFile {
    keys: BTreeMap<String, String>,
}

/// The set of attestor public keys whose disclosures the engine accepts.
#[derive(Debug, Default, Clone)]
pub struct TrustedAttestors {
    keys: BTreeMap<String, [u8; 32]>,
}

impl TrustedAttestors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key_id: impl Into<String>, key: VerifyingKey) {
        self.keys.insert(key_id.into(), key.to_bytes());
    }

    pub fn contains(&self, key: &[u8; 32]) -> bool {
        self.keys.values().any(|trusted| trusted == key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Loads a JSON keyring of the form `{"keys": {"key-id": "<hex>"}}`.
    /// Every key is validated as a canonical ed25519 point up front so a
    /// bad entry fails loading rather than every later verification.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KeyringError> {
        let raw = fs::read(path)?;
        let file: KeyringFile = serde_json::from_slice(&raw)?;

        let mut keys = BTreeMap::new();
        for (key_id, hex_key) in file.keys {
            let decoded = hex::decode(&hex_key)
                .map_err(|_| KeyringError::InvalidHex(key_id.clone()))?;
            let bytes: [u8; 32] = decoded
                .try_into()
                .map_err(|_| KeyringError::InvalidKey(key_id.clone()))?;
            VerifyingKey::from_bytes(&bytes)
                .map_err(|_| KeyringError::InvalidKey(key_id.clone()))?;
            keys.insert(key_id, bytes);
        }
        Ok(Self { keys })
    }
}

/// Checks a disclosed plaintext against the withdrawal gate: the attestor
/// must be trusted and its signature must bind this exact handle to this
/// exact plaintext. Any failure is reported as `InvalidAttestation`; the
/// caller learns nothing about which check tripped.
pub fn verify_attested_disclosure(
    attestors: &TrustedAttestors,
    handle: Handle,
    plaintext: u128,
    attestation: &DisclosureAttestation,
) -> LotteryResult<()> {
    if !attestors.contains(&attestation.attestor) {
        return Err(LotteryError::InvalidAttestation);
    }
    verify_disclosure(
        &handle.to_le_bytes(),
        &plaintext.to_le_bytes(),
        &attestation.attestor,
        &attestation.signature,
    )
    .map_err(|_| LotteryError::InvalidAttestation)
}
