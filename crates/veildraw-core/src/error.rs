use thiserror::Error;

use crate::accounts::CodecError;
use crate::coprocessor::CoprocessorError;

pub type LotteryResult<T> = Result<T, LotteryError>;

/// Protocol-level failures. Every variant is a precondition violation
/// detected before any account write, so a failed call leaves all accounts
/// exactly as they were.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LotteryError {
    #[error("a lottery round already exists for this id")]
    DuplicateRound,

    #[error("no lottery round exists for this id")]
    RoundNotFound,

    #[error("participant already holds a ticket for this round")]
    TicketAlreadyExists,

    #[error("no ticket exists for this participant and round")]
    TicketNotFound,

    #[error("stake balance does not cover the ticket price")]
    InsufficientStake,

    #[error("caller is not the round authority")]
    Unauthorized,

    #[error("winning number already drawn for this round")]
    AlreadyDrawn,

    #[error("winning number has not been drawn yet")]
    NotDrawnYet,

    #[error("ticket has already been checked")]
    AlreadyChecked,

    #[error("caller does not own this ticket")]
    NotTicketOwner,

    #[error("ticket has not been checked yet")]
    NotCheckedYet,

    #[error("prize has already been claimed")]
    AlreadyClaimed,

    #[error("claimed handle does not match the ticket prize handle")]
    HandleMismatch,

    #[error("decryption attestation rejected")]
    InvalidAttestation,

    #[error("prize has already been withdrawn")]
    AlreadyWithdrawn,

    #[error("account balance too low for transfer")]
    InsufficientFunds,

    #[error("balance arithmetic overflow")]
    BalanceOverflow,

    #[error(transparent)]
    Corrupt(#[from] CodecError),

    #[error("coprocessor: {0}")]
    Coprocessor(#[from] CoprocessorError),
}
