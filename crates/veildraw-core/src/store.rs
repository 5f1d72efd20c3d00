use std::collections::BTreeMap;

use crate::address::Address;

/// Keyed account storage the state machine reads and writes through.
///
/// Stands in for the host ledger's account table: opaque byte records at
/// 32-byte addresses. Implementations only need point reads and writes;
/// the protocol never iterates or deletes.
pub trait AccountStore {
    fn get(&self, address: &Address) -> Option<Vec<u8>>;

    fn put(&mut self, address: Address, record: Vec<u8>);

    fn contains(&self, address: &Address) -> bool {
        self.get(address).is_some()
    }
}

/// In-memory store backed by an ordered map.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    records: BTreeMap<Address, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl AccountStore for MemoryStore {
    fn get(&self, address: &Address) -> Option<Vec<u8>> {
        self.records.get(address).cloned()
    }

    fn put(&mut self, address: Address, record: Vec<u8>) {
        self.records.insert(address, record);
    }

    fn contains(&self, address: &Address) -> bool {
        self.records.contains_key(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::lottery_address;

    #[test]
    fn put_get_contains() {
        let mut store = MemoryStore::new();
        let address = lottery_address(1);
        assert!(!store.contains(&address));
        assert_eq!(store.get(&address), None);

        store.put(address, vec![1, 2, 3]);
        assert!(store.contains(&address));
        assert_eq!(store.get(&address), Some(vec![1, 2, 3]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn put_overwrites_in_place() {
        let mut store = MemoryStore::new();
        let address = lottery_address(1);
        store.put(address, vec![1]);
        store.put(address, vec![2]);
        assert_eq!(store.get(&address), Some(vec![2]));
        assert_eq!(store.len(), 1);
    }
}
