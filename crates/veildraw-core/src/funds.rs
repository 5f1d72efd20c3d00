//! Balance records and overdraft-checked transfers.

use crate::accounts::CodecError;
use crate::address::Address;
use crate::error::{LotteryError, LotteryResult};
use crate::store::AccountStore;

/// Wire size of a balance record.
pub const BALANCE_RECORD_LEN: usize = 8;

/// Balance at `address`; an absent record reads as zero.
pub fn balance(store: &impl AccountStore, address: &Address) -> LotteryResult<u64> {
    match store.get(address) {
        Some(record) => Ok(decode_balance(&record)?),
        None => Ok(0),
    }
}

/// Writes an explicit zero-balance record (a freshly created vault).
pub fn initialize(store: &mut impl AccountStore, address: &Address) {
    store.put(*address, encode_balance(0));
}

pub fn credit(store: &mut impl AccountStore, address: &Address, amount: u64) -> LotteryResult<()> {
    let next = balance(store, address)?
        .checked_add(amount)
        .ok_or(LotteryError::BalanceOverflow)?;
    store.put(*address, encode_balance(next));
    Ok(())
}

pub fn debit(store: &mut impl AccountStore, address: &Address, amount: u64) -> LotteryResult<()> {
    let next = balance(store, address)?
        .checked_sub(amount)
        .ok_or(LotteryError::InsufficientFunds)?;
    store.put(*address, encode_balance(next));
    Ok(())
}

/// Moves `amount` from one balance record to another. Both sides are
/// validated before either record is written, so a failure leaves no
/// partial move.
pub fn transfer(
    store: &mut impl AccountStore,
    from: &Address,
    to: &Address,
    amount: u64,
) -> LotteryResult<()> {
    if from == to {
        // A self-transfer cannot change the balance but must still be covered.
        balance(store, from)?
            .checked_sub(amount)
            .ok_or(LotteryError::InsufficientFunds)?;
        return Ok(());
    }

    let debited = balance(store, from)?
        .checked_sub(amount)
        .ok_or(LotteryError::InsufficientFunds)?;
    let credited = balance(store, to)?
        .checked_add(amount)
        .ok_or(LotteryError::BalanceOverflow)?;
    store.put(*from, encode_balance(debited));
    store.put(*to, encode_balance(credited));
    Ok(())
}

fn encode_balance(value: u64) -> Vec<u8> {
    value.to_le_bytes().to_vec()
}

fn decode_balance(record: &[u8]) -> Result<u64, CodecError> {
    let bytes: [u8; BALANCE_RECORD_LEN] =
        record.try_into().map_err(|_| CodecError::WrongLength)?;
    Ok(u64::from_le_bytes(bytes))
}
