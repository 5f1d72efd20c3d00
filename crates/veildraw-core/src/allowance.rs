//! Capability records gating decryption.
//!
//! An allowance for (handle, grantee) is a one-byte marker at a derived
//! address. Its existence is what authorizes the decryption oracle to
//! disclose the referent plaintext to that grantee; the state machine
//! writes one the moment it produces a handle the party is entitled to see,
//! and never speculatively.

use crate::address::{allowance_address, Address};
use crate::handle::Handle;
use crate::party::PartyId;
use crate::store::AccountStore;

const ALLOWANCE_RECORD: [u8; 1] = [1];

/// Records that `grantee` may request decryption of `handle`. Idempotent.
pub fn grant(store: &mut impl AccountStore, handle: Handle, grantee: &PartyId) -> Address {
    let address = allowance_address(handle, grantee);
    store.put(address, ALLOWANCE_RECORD.to_vec());
    address
}

/// True if `grantee` holds an allowance on `handle`.
pub fn exists(store: &impl AccountStore, handle: Handle, grantee: &PartyId) -> bool {
    store.contains(&allowance_address(handle, grantee))
}
