// Copyright (c) 2026 VeilDraw Contributors
// SPDX-License-Identifier: Apache-2.0

//! The confidential-compute collaborator.
//!
//! The protocol depends on exactly four coprocessor operations: registering
//! a caller-sealed value, homomorphic equality, homomorphic select, and
//! mirroring an allowance grant into the coprocessor's own access table.
//! `LocalCoprocessor` is the in-process implementation used in tests and
//! single-node deployments: values arrive AEAD-sealed, live behind random
//! non-zero 128-bit handles, and never leave except through the decryption
//! oracle.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::RngCore;
use ring::aead::{self, Aad, LessSafeKey, Nonce, UnboundKey};
use thiserror::Error;

use crate::handle::Handle;
use crate::party::PartyId;

const CIPHERTEXT_MAGIC: [u8; 4] = *b"VDCT";
const CIPHERTEXT_VERSION: u8 = 1;
const CIPHERTEXT_ALG_AES_256_GCM: u8 = 2;
const NONCE_LEN: usize = 12;
const HEADER_LEN: usize = 4 + 1 + 1 + NONCE_LEN;
const TAG_LEN: usize = 16;
const VALUE_LEN: usize = 16;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CoprocessorError {
    #[error("ciphertext payload is malformed")]
    MalformedCiphertext,
    #[error("handle does not reference a registered ciphertext")]
    UnknownHandle,
    #[error("select condition is not an encrypted boolean")]
    NotABoolean,
}

/// Operations the protocol requires from the confidential coprocessor.
/// Handles are stable 128-bit opaque values; every call is synchronous.
pub trait Coprocessor: Send + Sync {
    /// Stores a caller-sealed value and returns its handle.
    fn register(&self, ciphertext: &[u8]) -> Result<Handle, CoprocessorError>;

    /// Homomorphic equality; the result handle references an encrypted
    /// boolean.
    fn equal(&self, lhs: Handle, rhs: Handle) -> Result<Handle, CoprocessorError>;

    /// Homomorphic conditional select over an encrypted boolean condition.
    fn select(
        &self,
        condition: Handle,
        if_true: u128,
        if_false: u128,
    ) -> Result<Handle, CoprocessorError>;

    /// Mirrors an allowance grant into the coprocessor's access table so
    /// its decryption endpoint can honor it.
    fn grant_allowance(&self, handle: Handle, grantee: PartyId) -> Result<(), CoprocessorError>;
}

/// Seals a 128-bit value into the submission payload format: magic,
/// version, algorithm, random nonce, then AEAD ciphertext and tag. This is
/// the client-side half of `register`.
pub fn seal_value(key: &[u8; 32], value: u128) -> Result<Vec<u8>, CoprocessorError> {
    let cipher = make_cipher(key)?;
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    let mut in_out = value.to_le_bytes().to_vec();
    in_out.reserve(TAG_LEN);
    cipher
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| CoprocessorError::MalformedCiphertext)?;

    let mut out = Vec::with_capacity(HEADER_LEN + in_out.len());
    out.extend_from_slice(&CIPHERTEXT_MAGIC);
    out.push(CIPHERTEXT_VERSION);
    out.push(CIPHERTEXT_ALG_AES_256_GCM);
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&in_out);
    Ok(out)
}

fn open_value(key: &[u8; 32], payload: &[u8]) -> Result<u128, CoprocessorError> {
    if payload.len() != HEADER_LEN + VALUE_LEN + TAG_LEN {
        return Err(CoprocessorError::MalformedCiphertext);
    }
    if payload[0..4] != CIPHERTEXT_MAGIC
        || payload[4] != CIPHERTEXT_VERSION
        || payload[5] != CIPHERTEXT_ALG_AES_256_GCM
    {
        return Err(CoprocessorError::MalformedCiphertext);
    }

    let mut nonce_bytes = [0u8; NONCE_LEN];
    nonce_bytes.copy_from_slice(&payload[6..HEADER_LEN]);
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    let cipher = make_cipher(key)?;
    let mut in_out = payload[HEADER_LEN..].to_vec();
    let plain = cipher
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| CoprocessorError::MalformedCiphertext)?;
    if plain.len() != VALUE_LEN {
        return Err(CoprocessorError::MalformedCiphertext);
    }
    let mut bytes = [0u8; VALUE_LEN];
    bytes.copy_from_slice(plain);
    Ok(u128::from_le_bytes(bytes))
}

fn make_cipher(key: &[u8; 32]) -> Result<LessSafeKey, CoprocessorError> {
    let unbound = UnboundKey::new(&aead::AES_256_GCM, key)
        .map_err(|_| CoprocessorError::MalformedCiphertext)?;
    Ok(LessSafeKey::new(unbound))
}

#[derive(Debug, Default)]
struct CoprocessorState {
    values: HashMap<Handle, u128>,
    allowed: HashSet<(Handle, PartyId)>,
}

/// In-process coprocessor holding sealed values behind random handles.
///
/// Cloning shares the handle table, so one instance can serve both the
/// state machine and the decryption oracle.
#[derive(Clone)]
pub struct LocalCoprocessor {
    key: [u8; 32],
    state: Arc<Mutex<CoprocessorState>>,
}

impl LocalCoprocessor {
    pub fn new(key: [u8; 32]) -> Self {
        Self {
            key,
            state: Arc::new(Mutex::new(CoprocessorState::default())),
        }
    }

    /// Seals `value` under this instance's key, as a submitting client
    /// would before calling `register`.
    pub fn seal(&self, value: u128) -> Result<Vec<u8>, CoprocessorError> {
        seal_value(&self.key, value)
    }

    /// True if the coprocessor-side access table authorizes `party` on
    /// `handle`.
    pub fn is_allowed(&self, handle: Handle, party: &PartyId) -> bool {
        self.state.lock().allowed.contains(&(handle, *party))
    }

    pub(crate) fn value_of(&self, handle: Handle) -> Option<u128> {
        self.state.lock().values.get(&handle).copied()
    }

    fn insert_value(&self, value: u128) -> Handle {
        let mut state = self.state.lock();
        loop {
            let mut raw = [0u8; Handle::LEN];
            OsRng.fill_bytes(&mut raw);
            let handle = Handle::from_le_bytes(raw);
            // Zero is the protocol's "no value" sentinel; never issue it.
            if handle.is_zero() || state.values.contains_key(&handle) {
                continue;
            }
            state.values.insert(handle, value);
            return handle;
        }
    }
}

impl Coprocessor for LocalCoprocessor {
    fn register(&self, ciphertext: &[u8]) -> Result<Handle, CoprocessorError> {
        let value = open_value(&self.key, ciphertext)?;
        Ok(self.insert_value(value))
    }

    fn equal(&self, lhs: Handle, rhs: Handle) -> Result<Handle, CoprocessorError> {
        let (a, b) = {
            let state = self.state.lock();
            let a = *state
                .values
                .get(&lhs)
                .ok_or(CoprocessorError::UnknownHandle)?;
            let b = *state
                .values
                .get(&rhs)
                .ok_or(CoprocessorError::UnknownHandle)?;
            (a, b)
        };
        Ok(self.insert_value(u128::from(a == b)))
    }

    fn select(
        &self,
        condition: Handle,
        if_true: u128,
        if_false: u128,
    ) -> Result<Handle, CoprocessorError> {
        let flag = {
            let state = self.state.lock();
            *state
                .values
                .get(&condition)
                .ok_or(CoprocessorError::UnknownHandle)?
        };
        let value = match flag {
            0 => if_false,
            1 => if_true,
            _ => return Err(CoprocessorError::NotABoolean),
        };
        Ok(self.insert_value(value))
    }

    fn grant_allowance(&self, handle: Handle, grantee: PartyId) -> Result<(), CoprocessorError> {
        let mut state = self.state.lock();
        if !state.values.contains_key(&handle) {
            return Err(CoprocessorError::UnknownHandle);
        }
        state.allowed.insert((handle, grantee));
        Ok(())
    }
}
