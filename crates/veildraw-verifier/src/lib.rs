// Copyright (c) 2026 VeilDraw Contributors
// SPDX-License-Identifier: Apache-2.0

//! veildraw-verifier
//!
//! Standalone verification of veildraw decryption attestations: the canonical
//! digest binding a ciphertext handle to its disclosed plaintext, and the
//! ed25519 signature check over that digest. Validators that only need to
//! audit withdrawals embed this crate without pulling in the protocol core.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

pub type Hash32 = [u8; 32];

/// Width of a handle and of a disclosed plaintext on the wire.
pub const DISCLOSURE_WORD_LEN: usize = 16;

const DOMAIN_DISCLOSURE_V1: &[u8] = b"veildraw:disclosure:v1";

#[derive(Debug, thiserror::Error)]
pub enum AttestationError {
    #[error("attestor verifying key must be 32 bytes")]
    InvalidVerifyingKey,
    #[error("attestation signature must be 64 bytes")]
    InvalidSignature,
    #[error("signature verification failed")]
    SignatureVerification,
}

fn sha256_domain(domain: &[u8], payload: &[u8]) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(payload);
    hasher.finalize().into()
}

/// Canonical digest an attestor signs to bind a handle to a plaintext.
///
/// Both words are little-endian and handle-width, so the payload is
/// fixed-size and needs no length prefixes; the domain tag keeps these
/// signatures from colliding with any other signed structure.
pub fn disclosure_digest(
    handle_le: &[u8; DISCLOSURE_WORD_LEN],
    plaintext_le: &[u8; DISCLOSURE_WORD_LEN],
) -> Hash32 {
    let mut payload = [0u8; 2 * DISCLOSURE_WORD_LEN];
    payload[..DISCLOSURE_WORD_LEN].copy_from_slice(handle_le);
    payload[DISCLOSURE_WORD_LEN..].copy_from_slice(plaintext_le);
    sha256_domain(DOMAIN_DISCLOSURE_V1, &payload)
}

/// Signs the binding of `handle_le` to `plaintext_le`.
pub fn sign_disclosure(
    signing_key: &SigningKey,
    handle_le: &[u8; DISCLOSURE_WORD_LEN],
    plaintext_le: &[u8; DISCLOSURE_WORD_LEN],
) -> [u8; 64] {
    signing_key
        .sign(&disclosure_digest(handle_le, plaintext_le))
        .to_bytes()
}

/// Verifies that `signature_bytes` is a valid signature by `key_bytes` over
/// the binding of `handle_le` to `plaintext_le`. Fails closed on any
/// malformed input.
pub fn verify_disclosure(
    handle_le: &[u8; DISCLOSURE_WORD_LEN],
    plaintext_le: &[u8; DISCLOSURE_WORD_LEN],
    key_bytes: &[u8],
    signature_bytes: &[u8],
) -> Result<(), AttestationError> {
    let key_arr: [u8; 32] = key_bytes
        .try_into()
        .map_err(|_| AttestationError::InvalidVerifyingKey)?;
    let key =
        VerifyingKey::from_bytes(&key_arr).map_err(|_| AttestationError::InvalidVerifyingKey)?;
    let signature = Signature::from_slice(signature_bytes)
        .map_err(|_| AttestationError::InvalidSignature)?;
    let digest = disclosure_digest(handle_le, plaintext_le);
    key.verify(&digest, &signature)
        .map_err(|_| AttestationError::SignatureVerification)
}
