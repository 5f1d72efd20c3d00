// Copyright (c) 2026 VeilDraw Contributors
// SPDX-License-Identifier: Apache-2.0

//! Deterministic account addressing.
//!
//! Every account the protocol touches lives at a 32-byte address derived
//! from a fixed kind tag plus the components that scope it, so no index
//! structures are persisted anywhere: knowing (round id), (round, owner) or
//! (handle, grantee) is enough to find the record.

use sha2::{Digest, Sha256};
use std::fmt;

use crate::handle::Handle;
use crate::party::PartyId;

const ADDRESS_DOMAIN: &[u8] = b"veildraw/address/v1";

const TAG_LOTTERY: &str = "lottery";
const TAG_VAULT: &str = "vault";
const TAG_TICKET: &str = "ticket";
const TAG_ALLOWANCE: &str = "allowance";
const TAG_CASH: &str = "cash";

/// 32-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 32]);

impl Address {
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(self.0))
    }
}

fn encode_len_prefixed(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(bytes);
}

fn derive(kind: &str, components: &[&[u8]]) -> Address {
    let mut encoded = Vec::with_capacity(96);
    encode_len_prefixed(&mut encoded, kind.as_bytes());
    for component in components {
        encode_len_prefixed(&mut encoded, component);
    }

    let mut hasher = Sha256::new();
    hasher.update(ADDRESS_DOMAIN);
    hasher.update(encoded);
    Address(hasher.finalize().into())
}

/// Address of the round record for `round_id`.
pub fn lottery_address(round_id: u64) -> Address {
    derive(TAG_LOTTERY, &[&round_id.to_le_bytes()])
}

/// Address of the vault owned by the round at `lottery`.
pub fn vault_address(lottery: &Address) -> Address {
    derive(TAG_VAULT, &[lottery.as_bytes()])
}

/// Address of `owner`'s ticket for the round at `lottery`. One per pair:
/// a second purchase lands on the same address and is rejected.
pub fn ticket_address(lottery: &Address, owner: &PartyId) -> Address {
    derive(TAG_TICKET, &[lottery.as_bytes(), owner.as_bytes()])
}

/// Address of the capability record allowing `grantee` to decrypt `handle`.
pub fn allowance_address(handle: Handle, grantee: &PartyId) -> Address {
    derive(TAG_ALLOWANCE, &[&handle.to_le_bytes(), grantee.as_bytes()])
}

/// Address of `party`'s spendable balance.
pub fn cash_address(party: &PartyId) -> Address {
    derive(TAG_CASH, &[party.as_bytes()])
}
