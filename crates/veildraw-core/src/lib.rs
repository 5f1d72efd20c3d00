// Copyright [2026] [VeilDraw Contributors]
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// Copyright (c) 2026 VeilDraw Contributors
// SPDX-License-Identifier: Apache-2.0

//! Confidential lottery engine.
//!
//! Participants guess a secret number without the operator, other players,
//! or the ledger ever seeing guesses, results, or winnings in the clear:
//!
//! - every secret lives in a confidential coprocessor and is referenced by
//!   an opaque 128-bit [`Handle`],
//! - access is capability-based: a party can decrypt a handle only if an
//!   allowance for the (handle, party) pair was granted,
//! - each ticket moves one way through purchased, checked, claimed, and
//!   withdrawn, with every transition written once,
//! - plaintext re-enters at withdrawal only, gated on an ed25519
//!   attestation binding the disclosed amount to the ticket's prize handle.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod accounts;
pub mod address;
pub mod allowance;
pub mod attestation;
pub mod coprocessor;
pub mod error;
pub mod funds;
pub mod handle;
pub mod lottery;
pub mod oracle;
pub mod party;
pub mod store;

pub use crate::error::{LotteryError, LotteryResult};
pub use crate::handle::Handle;
pub use crate::party::PartyId;
