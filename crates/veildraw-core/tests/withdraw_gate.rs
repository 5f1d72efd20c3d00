use ed25519_dalek::SigningKey;

use veildraw_core::address::{cash_address, lottery_address, vault_address};
use veildraw_core::attestation::{sign_disclosure, DisclosureAttestation, TrustedAttestors};
use veildraw_core::coprocessor::LocalCoprocessor;
use veildraw_core::funds;
use veildraw_core::lottery::LotteryEngine;
use veildraw_core::oracle::{DecryptionOracle, DisclosedPlaintext, LocalDecryptionOracle};
use veildraw_core::store::{AccountStore, MemoryStore};
use veildraw_core::{Handle, LotteryError, PartyId};

const TICKET_PRICE: u64 = 1_000;
const ROUND: u64 = 3;
const WINNING_NUMBER: u128 = 42;

const AUTHORITY: PartyId = PartyId::new([1u8; 32]);
const ALICE: PartyId = PartyId::new([2u8; 32]);
const BOB: PartyId = PartyId::new([3u8; 32]);

struct Harness {
    engine: LotteryEngine<LocalCoprocessor>,
    coprocessor: LocalCoprocessor,
    oracle: LocalDecryptionOracle,
    store: MemoryStore,
}

fn harness(attestors: TrustedAttestors) -> (Harness, SigningKey) {
    let coprocessor = LocalCoprocessor::new([31u8; 32]);
    let oracle_key = SigningKey::from_bytes(&[7u8; 32]);
    let oracle = LocalDecryptionOracle::new(coprocessor.clone(), oracle_key.clone());
    (
        Harness {
            engine: LotteryEngine::new(coprocessor.clone(), attestors),
            coprocessor,
            oracle,
            store: MemoryStore::new(),
        },
        oracle_key,
    )
}

fn trusting_harness() -> Harness {
    let oracle_key = SigningKey::from_bytes(&[7u8; 32]);
    let mut attestors = TrustedAttestors::new();
    attestors.insert("oracle-1", oracle_key.verifying_key());
    harness(attestors).0
}

/// Runs a winning ticket through claim and returns the oracle's disclosure
/// of the prize handle.
fn claimed_prize(h: &mut Harness, who: PartyId, guess: u128) -> DisclosedPlaintext {
    funds::credit(&mut h.store, &cash_address(&who), TICKET_PRICE).expect("fund");
    let sealed = h.coprocessor.seal(guess).expect("seal");
    h.engine
        .buy_ticket(&mut h.store, who, ROUND, &sealed)
        .expect("buy");
    h.engine
        .check_winner(&mut h.store, who, ROUND, who)
        .expect("check");
    let prize = h
        .engine
        .claim_prize(&mut h.store, who, ROUND, who)
        .expect("claim");
    h.oracle.decrypt(prize, who).expect("decrypt prize")
}

fn create_and_draw(h: &mut Harness) {
    h.engine
        .create_lottery(&mut h.store, AUTHORITY, ROUND, TICKET_PRICE)
        .expect("create");
    let sealed = h.coprocessor.seal(WINNING_NUMBER).expect("seal");
    h.engine
        .draw_winner(&mut h.store, AUTHORITY, ROUND, &sealed)
        .expect("draw");
}

fn withdraw(
    h: &mut Harness,
    caller: PartyId,
    owner: PartyId,
    handle: Handle,
    plaintext: u128,
    attestation: &DisclosureAttestation,
) -> Result<u64, LotteryError> {
    h.engine.withdraw_prize(
        &mut h.store,
        caller,
        ROUND,
        owner,
        handle,
        plaintext,
        attestation,
    )
}

#[test]
fn a_faithful_disclosure_settles() {
    let mut h = trusting_harness();
    create_and_draw(&mut h);

    // Buying happens after the draw here; the machine allows that.
    let disclosed = claimed_prize(&mut h, ALICE, WINNING_NUMBER);
    assert_eq!(disclosed.plaintext, u128::from(TICKET_PRICE));

    let paid = withdraw(
        &mut h,
        ALICE,
        ALICE,
        disclosed.handle,
        disclosed.plaintext,
        &disclosed.attestation,
    )
    .expect("withdraw");
    assert_eq!(paid, TICKET_PRICE);
}

#[test]
fn inflated_plaintext_is_rejected() {
    let mut h = trusting_harness();
    create_and_draw(&mut h);
    let disclosed = claimed_prize(&mut h, ALICE, WINNING_NUMBER);

    assert_eq!(
        withdraw(
            &mut h,
            ALICE,
            ALICE,
            disclosed.handle,
            disclosed.plaintext + 1,
            &disclosed.attestation,
        ),
        Err(LotteryError::InvalidAttestation)
    );
}

#[test]
fn untrusted_attestor_is_rejected() {
    let mut h = trusting_harness();
    create_and_draw(&mut h);
    let disclosed = claimed_prize(&mut h, ALICE, WINNING_NUMBER);

    // A correct signature from a key outside the keyring buys nothing.
    let rogue = SigningKey::from_bytes(&[99u8; 32]);
    let attestation = DisclosureAttestation {
        attestor: rogue.verifying_key().to_bytes(),
        signature: sign_disclosure(
            &rogue,
            &disclosed.handle.to_le_bytes(),
            &disclosed.plaintext.to_le_bytes(),
        ),
    };
    assert_eq!(
        withdraw(
            &mut h,
            ALICE,
            ALICE,
            disclosed.handle,
            disclosed.plaintext,
            &attestation,
        ),
        Err(LotteryError::InvalidAttestation)
    );
}

#[test]
fn corrupted_signature_is_rejected() {
    let mut h = trusting_harness();
    create_and_draw(&mut h);
    let disclosed = claimed_prize(&mut h, ALICE, WINNING_NUMBER);

    let mut attestation = disclosed.attestation;
    attestation.signature[0] ^= 0x01;
    assert_eq!(
        withdraw(
            &mut h,
            ALICE,
            ALICE,
            disclosed.handle,
            disclosed.plaintext,
            &attestation,
        ),
        Err(LotteryError::InvalidAttestation)
    );
}

#[test]
fn an_empty_keyring_admits_nobody() {
    let (mut h, _oracle_key) = harness(TrustedAttestors::new());
    create_and_draw(&mut h);
    let disclosed = claimed_prize(&mut h, ALICE, WINNING_NUMBER);

    assert_eq!(
        withdraw(
            &mut h,
            ALICE,
            ALICE,
            disclosed.handle,
            disclosed.plaintext,
            &disclosed.attestation,
        ),
        Err(LotteryError::InvalidAttestation)
    );
}

#[test]
fn only_the_prize_handle_passes_the_gate() {
    let mut h = trusting_harness();
    create_and_draw(&mut h);
    claimed_prize(&mut h, ALICE, WINNING_NUMBER);

    // The result handle is Alice's to decrypt, but it is not her prize
    // handle, so its disclosure cannot settle the ticket.
    let lottery = lottery_address(ROUND);
    let ticket_addr = veildraw_core::address::ticket_address(&lottery, &ALICE);
    let raw = h.store.get(&ticket_addr).expect("ticket");
    let ticket = veildraw_core::accounts::TicketAccount::decode(&raw).expect("decode");

    let result_disclosure = h
        .oracle
        .decrypt(ticket.result_handle, ALICE)
        .expect("decrypt result");
    assert_eq!(
        withdraw(
            &mut h,
            ALICE,
            ALICE,
            result_disclosure.handle,
            result_disclosure.plaintext,
            &result_disclosure.attestation,
        ),
        Err(LotteryError::HandleMismatch)
    );
}

#[test]
fn another_tickets_disclosure_cannot_settle_yours() {
    let mut h = trusting_harness();
    create_and_draw(&mut h);
    claimed_prize(&mut h, ALICE, WINNING_NUMBER);
    let bob_disclosure = claimed_prize(&mut h, BOB, WINNING_NUMBER);

    // Bob's disclosure is genuine and trusted, but it does not name Alice's
    // prize handle.
    assert_eq!(
        withdraw(
            &mut h,
            ALICE,
            ALICE,
            bob_disclosure.handle,
            bob_disclosure.plaintext,
            &bob_disclosure.attestation,
        ),
        Err(LotteryError::HandleMismatch)
    );
}

#[test]
fn a_stranger_cannot_settle_with_a_valid_payload() {
    let mut h = trusting_harness();
    create_and_draw(&mut h);
    let disclosed = claimed_prize(&mut h, ALICE, WINNING_NUMBER);

    assert_eq!(
        withdraw(
            &mut h,
            BOB,
            ALICE,
            disclosed.handle,
            disclosed.plaintext,
            &disclosed.attestation,
        ),
        Err(LotteryError::NotTicketOwner)
    );
}

#[test]
fn the_vault_is_debited_exactly_once() {
    let mut h = trusting_harness();
    create_and_draw(&mut h);
    let alice_disclosure = claimed_prize(&mut h, ALICE, WINNING_NUMBER);
    claimed_prize(&mut h, BOB, WINNING_NUMBER - 1);

    let lottery = lottery_address(ROUND);
    let vault = vault_address(&lottery);
    assert_eq!(
        funds::balance(&h.store, &vault).expect("vault"),
        2 * TICKET_PRICE
    );

    withdraw(
        &mut h,
        ALICE,
        ALICE,
        alice_disclosure.handle,
        alice_disclosure.plaintext,
        &alice_disclosure.attestation,
    )
    .expect("withdraw");
    assert_eq!(
        funds::balance(&h.store, &vault).expect("vault"),
        TICKET_PRICE
    );

    // Replaying the same disclosure fails and moves nothing.
    assert_eq!(
        withdraw(
            &mut h,
            ALICE,
            ALICE,
            alice_disclosure.handle,
            alice_disclosure.plaintext,
            &alice_disclosure.attestation,
        ),
        Err(LotteryError::AlreadyWithdrawn)
    );
    assert_eq!(
        funds::balance(&h.store, &vault).expect("vault"),
        TICKET_PRICE
    );
    assert_eq!(
        funds::balance(&h.store, &cash_address(&ALICE)).expect("cash"),
        TICKET_PRICE
    );
}
