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

//! The lottery state machine.
//!
//! `LotteryEngine` drives every round through its lifecycle: create, buy,
//! draw, check, claim, withdraw. Each operation validates its preconditions
//! against the account store before writing anything, so a failed call
//! leaves the store exactly as it found it. Guesses, the winning number,
//! match results, and prize amounts all stay encrypted inside the
//! coprocessor; the engine only ever moves handles. Plaintext enters the
//! picture once, at withdrawal, and only under a verified attestation.

use tracing::{info, warn};

use crate::accounts::{LotteryAccount, TicketAccount, TicketStatus};
use crate::address::{cash_address, lottery_address, ticket_address, vault_address, Address};
use crate::allowance;
use crate::attestation::{verify_attested_disclosure, DisclosureAttestation, TrustedAttestors};
use crate::coprocessor::Coprocessor;
use crate::error::{LotteryError, LotteryResult};
use crate::funds;
use crate::handle::Handle;
use crate::party::PartyId;
use crate::store::AccountStore;

/// Drives lottery rounds over any account store and coprocessor backend.
pub struct LotteryEngine<C> {
    coprocessor: C,
    attestors: TrustedAttestors,
}

impl<C: Coprocessor> LotteryEngine<C> {
    pub fn new(coprocessor: C, attestors: TrustedAttestors) -> Self {
        Self {
            coprocessor,
            attestors,
        }
    }

    /// Opens a new round with `caller` as its authority. Creates the round
    /// account with no winning number and a zeroed vault. Fails with
    /// `DuplicateRound` if the round id is already taken.
    pub fn create_lottery<S: AccountStore>(
        &self,
        store: &mut S,
        caller: PartyId,
        round_id: u64,
        ticket_price: u64,
    ) -> LotteryResult<Address> {
        let lottery = lottery_address(round_id);
        if store.contains(&lottery) {
            return Err(LotteryError::DuplicateRound);
        }

        let account = LotteryAccount {
            round_id,
            authority: caller,
            ticket_price,
            winning_handle: Handle::ZERO,
        };
        store.put(lottery, account.encode());
        funds::initialize(store, &vault_address(&lottery));

        info!(
            target: "veildraw.lottery",
            round = round_id,
            authority = %caller,
            ticket_price,
            "round created"
        );
        Ok(lottery)
    }

    /// Buys `caller` a ticket for the round: registers the sealed guess
    /// with the coprocessor, moves the ticket price from the buyer's cash
    /// account into the round vault, and records the ticket as purchased.
    /// The buyer receives an allowance on their own guess handle. One
    /// ticket per party per round.
    pub fn buy_ticket<S: AccountStore>(
        &self,
        store: &mut S,
        caller: PartyId,
        round_id: u64,
        encrypted_guess: &[u8],
    ) -> LotteryResult<Handle> {
        let lottery = lottery_address(round_id);
        let round = load_lottery(store, &lottery)?;

        let ticket = ticket_address(&lottery, &caller);
        if store.contains(&ticket) {
            return Err(LotteryError::TicketAlreadyExists);
        }

        let stake = round.ticket_price;
        let buyer_cash = cash_address(&caller);
        if funds::balance(store, &buyer_cash)? < stake {
            return Err(LotteryError::InsufficientStake);
        }
        // Validate the vault credit up front so the writes below cannot
        // partially apply.
        let vault = vault_address(&lottery);
        if funds::balance(store, &vault)?.checked_add(stake).is_none() {
            return Err(LotteryError::BalanceOverflow);
        }

        let guess = self.coprocessor.register(encrypted_guess)?;
        self.coprocessor.grant_allowance(guess, caller)?;

        funds::transfer(store, &buyer_cash, &vault, stake)?;
        allowance::grant(store, guess, &caller);
        store.put(ticket, TicketAccount::purchased(caller, guess).encode());

        info!(
            target: "veildraw.lottery",
            round = round_id,
            buyer = %caller,
            stake,
            guess = %guess,
            "ticket purchased"
        );
        Ok(guess)
    }

    /// Fixes the round's winning number. Authority-only, and only once per
    /// round. The sealed number is registered with the coprocessor and its
    /// handle stored on the round account; no allowance is granted to
    /// anyone, so the number itself stays sealed for good.
    pub fn draw_winner<S: AccountStore>(
        &self,
        store: &mut S,
        caller: PartyId,
        round_id: u64,
        encrypted_winning_number: &[u8],
    ) -> LotteryResult<Handle> {
        let lottery = lottery_address(round_id);
        let mut round = load_lottery(store, &lottery)?;

        if round.authority != caller {
            return Err(LotteryError::Unauthorized);
        }
        if !round.winning_handle.is_zero() {
            return Err(LotteryError::AlreadyDrawn);
        }

        let winning = self.coprocessor.register(encrypted_winning_number)?;
        round.winning_handle = winning;
        store.put(lottery, round.encode());

        info!(
            target: "veildraw.lottery",
            round = round_id,
            winning = %winning,
            "winning number drawn"
        );
        Ok(winning)
    }

    /// Compares the ticket's guess against the winning number inside the
    /// coprocessor and stores the encrypted boolean result on the ticket.
    /// Only the ticket owner may check, only after the draw, and only once.
    pub fn check_winner<S: AccountStore>(
        &self,
        store: &mut S,
        caller: PartyId,
        round_id: u64,
        ticket_owner: PartyId,
    ) -> LotteryResult<Handle> {
        let lottery = lottery_address(round_id);
        let round = load_lottery(store, &lottery)?;
        let ticket_addr = ticket_address(&lottery, &ticket_owner);
        let mut ticket = load_ticket(store, &ticket_addr)?;

        if caller != ticket.owner {
            return Err(LotteryError::NotTicketOwner);
        }
        if round.winning_handle.is_zero() {
            return Err(LotteryError::NotDrawnYet);
        }
        if ticket.status != TicketStatus::Purchased {
            return Err(LotteryError::AlreadyChecked);
        }

        let result = self
            .coprocessor
            .equal(ticket.guess_handle, round.winning_handle)?;
        self.coprocessor.grant_allowance(result, ticket.owner)?;

        allowance::grant(store, result, &ticket.owner);
        ticket.result_handle = result;
        ticket.status = TicketStatus::Checked;
        store.put(ticket_addr, ticket.encode());

        info!(
            target: "veildraw.lottery",
            round = round_id,
            owner = %ticket.owner,
            result = %result,
            "ticket checked"
        );
        Ok(result)
    }

    /// Converts the encrypted match result into an encrypted prize amount:
    /// the round's ticket price on a win, zero on a loss. The owner cannot
    /// tell which from the handle alone. Requires a checked ticket; claiming
    /// twice fails.
    pub fn claim_prize<S: AccountStore>(
        &self,
        store: &mut S,
        caller: PartyId,
        round_id: u64,
        ticket_owner: PartyId,
    ) -> LotteryResult<Handle> {
        let lottery = lottery_address(round_id);
        let round = load_lottery(store, &lottery)?;
        let ticket_addr = ticket_address(&lottery, &ticket_owner);
        let mut ticket = load_ticket(store, &ticket_addr)?;

        if caller != ticket.owner {
            return Err(LotteryError::NotTicketOwner);
        }
        match ticket.status {
            TicketStatus::Purchased => return Err(LotteryError::NotCheckedYet),
            TicketStatus::Checked => {}
            TicketStatus::Claimed | TicketStatus::Withdrawn => {
                return Err(LotteryError::AlreadyClaimed)
            }
        }

        let prize = self.coprocessor.select(
            ticket.result_handle,
            u128::from(round.ticket_price),
            0,
        )?;
        self.coprocessor.grant_allowance(prize, ticket.owner)?;

        allowance::grant(store, prize, &ticket.owner);
        ticket.prize_handle = prize;
        ticket.status = TicketStatus::Claimed;
        store.put(ticket_addr, ticket.encode());

        info!(
            target: "veildraw.lottery",
            round = round_id,
            owner = %ticket.owner,
            prize = %prize,
            "prize claimed"
        );
        Ok(prize)
    }

    /// Settles the ticket. The caller presents the plaintext they obtained
    /// by decrypting their prize handle, together with the oracle's
    /// attestation over that (handle, plaintext) pair. The gate checks, in
    /// order: the ticket has not already been withdrawn, the presented
    /// handle is exactly the ticket's prize handle, and the attestation is
    /// from a trusted attestor and binds this handle to this plaintext.
    /// Only then is the amount paid from the vault to the owner's cash
    /// account. A losing ticket settles the same way with amount zero.
    pub fn withdraw_prize<S: AccountStore>(
        &self,
        store: &mut S,
        caller: PartyId,
        round_id: u64,
        ticket_owner: PartyId,
        claimed_handle: Handle,
        claimed_plaintext: u128,
        attestation: &DisclosureAttestation,
    ) -> LotteryResult<u64> {
        let lottery = lottery_address(round_id);
        load_lottery(store, &lottery)?;
        let ticket_addr = ticket_address(&lottery, &ticket_owner);
        let mut ticket = load_ticket(store, &ticket_addr)?;

        if caller != ticket.owner {
            return Err(LotteryError::NotTicketOwner);
        }
        if ticket.status == TicketStatus::Withdrawn {
            return Err(LotteryError::AlreadyWithdrawn);
        }
        // An unclaimed ticket has a zero prize handle; the zero check keeps
        // a zero claim from matching it.
        if claimed_handle.is_zero() || claimed_handle != ticket.prize_handle {
            return Err(LotteryError::HandleMismatch);
        }
        if let Err(err) = verify_attested_disclosure(
            &self.attestors,
            claimed_handle,
            claimed_plaintext,
            attestation,
        ) {
            warn!(
                target: "veildraw.lottery",
                round = round_id,
                owner = %ticket.owner,
                error = %err,
                "withdrawal attestation rejected"
            );
            return Err(err);
        }

        let amount =
            u64::try_from(claimed_plaintext).map_err(|_| LotteryError::BalanceOverflow)?;
        funds::transfer(
            store,
            &vault_address(&lottery),
            &cash_address(&ticket.owner),
            amount,
        )?;
        ticket.status = TicketStatus::Withdrawn;
        store.put(ticket_addr, ticket.encode());

        info!(
            target: "veildraw.lottery",
            round = round_id,
            owner = %ticket.owner,
            amount,
            "prize withdrawn"
        );
        Ok(amount)
    }
}

fn load_lottery(store: &impl AccountStore, address: &Address) -> LotteryResult<LotteryAccount> {
    let raw = store.get(address).ok_or(LotteryError::RoundNotFound)?;
    Ok(LotteryAccount::decode(&raw)?)
}

fn load_ticket(store: &impl AccountStore, address: &Address) -> LotteryResult<TicketAccount> {
    let raw = store.get(address).ok_or(LotteryError::TicketNotFound)?;
    Ok(TicketAccount::decode(&raw)?)
}
