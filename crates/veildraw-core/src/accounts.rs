// Copyright (c) 2026 VeilDraw Contributors
// SPDX-License-Identifier: Apache-2.0

//! Bit-exact account record layouts.
//!
//! Records are fixed-width with little-endian integers, decoded defensively:
//! a record of the wrong length or with an unknown status byte is corrupt,
//! never partially read.

use thiserror::Error;

use crate::handle::Handle;
use crate::party::PartyId;

/// Wire size of a round record: id, authority, ticket price, winning handle.
pub const LOTTERY_RECORD_LEN: usize = 8 + PartyId::LEN + 8 + Handle::LEN;

/// Wire size of a ticket record: owner, three handles, status byte.
pub const TICKET_RECORD_LEN: usize = PartyId::LEN + 3 * Handle::LEN + 1;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    #[error("record length does not match the account layout")]
    WrongLength,
    #[error("unknown ticket status byte: {0}")]
    UnknownStatus(u8),
}

/// Round configuration plus the one-shot winning-number handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotteryAccount {
    pub round_id: u64,
    pub authority: PartyId,
    pub ticket_price: u64,
    pub winning_handle: Handle,
}

impl LotteryAccount {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(LOTTERY_RECORD_LEN);
        out.extend_from_slice(&self.round_id.to_le_bytes());
        out.extend_from_slice(self.authority.as_bytes());
        out.extend_from_slice(&self.ticket_price.to_le_bytes());
        out.extend_from_slice(&self.winning_handle.to_le_bytes());
        out
    }

    pub fn decode(record: &[u8]) -> Result<Self, CodecError> {
        if record.len() != LOTTERY_RECORD_LEN {
            return Err(CodecError::WrongLength);
        }
        let mut round_id = [0u8; 8];
        round_id.copy_from_slice(&record[0..8]);
        let mut authority = [0u8; PartyId::LEN];
        authority.copy_from_slice(&record[8..40]);
        let mut ticket_price = [0u8; 8];
        ticket_price.copy_from_slice(&record[40..48]);
        let mut winning_handle = [0u8; Handle::LEN];
        winning_handle.copy_from_slice(&record[48..64]);
        Ok(Self {
            round_id: u64::from_le_bytes(round_id),
            authority: PartyId::new(authority),
            ticket_price: u64::from_le_bytes(ticket_price),
            winning_handle: Handle::from_le_bytes(winning_handle),
        })
    }
}

/// Where a ticket sits in its one-way lifecycle. The tag, not zero-testing
/// of handle fields, decides which transition is legal next; "no ticket" is
/// the absence of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TicketStatus {
    Purchased = 1,
    Checked = 2,
    Claimed = 3,
    Withdrawn = 4,
}

impl TicketStatus {
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(byte: u8) -> Result<Self, CodecError> {
        match byte {
            1 => Ok(Self::Purchased),
            2 => Ok(Self::Checked),
            3 => Ok(Self::Claimed),
            4 => Ok(Self::Withdrawn),
            other => Err(CodecError::UnknownStatus(other)),
        }
    }
}

/// One participant's ticket for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketAccount {
    pub owner: PartyId,
    pub guess_handle: Handle,
    pub result_handle: Handle,
    pub prize_handle: Handle,
    pub status: TicketStatus,
}

impl TicketAccount {
    /// Fresh ticket as written by a purchase.
    pub fn purchased(owner: PartyId, guess_handle: Handle) -> Self {
        Self {
            owner,
            guess_handle,
            result_handle: Handle::ZERO,
            prize_handle: Handle::ZERO,
            status: TicketStatus::Purchased,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(TICKET_RECORD_LEN);
        out.extend_from_slice(self.owner.as_bytes());
        out.extend_from_slice(&self.guess_handle.to_le_bytes());
        out.extend_from_slice(&self.result_handle.to_le_bytes());
        out.extend_from_slice(&self.prize_handle.to_le_bytes());
        out.push(self.status.as_byte());
        out
    }

    pub fn decode(record: &[u8]) -> Result<Self, CodecError> {
        if record.len() != TICKET_RECORD_LEN {
            return Err(CodecError::WrongLength);
        }
        let mut owner = [0u8; PartyId::LEN];
        owner.copy_from_slice(&record[0..32]);
        let mut guess_handle = [0u8; Handle::LEN];
        guess_handle.copy_from_slice(&record[32..48]);
        let mut result_handle = [0u8; Handle::LEN];
        result_handle.copy_from_slice(&record[48..64]);
        let mut prize_handle = [0u8; Handle::LEN];
        prize_handle.copy_from_slice(&record[64..80]);
        let status = TicketStatus::from_byte(record[80])?;
        Ok(Self {
            owner: PartyId::new(owner),
            guess_handle: Handle::from_le_bytes(guess_handle),
            result_handle: Handle::from_le_bytes(result_handle),
            prize_handle: Handle::from_le_bytes(prize_handle),
            status,
        })
    }
}
