use std::fmt;

/// 32-byte identity of a participant or round authority.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartyId([u8; 32]);

impl PartyId {
    /// Width of the wire encoding in bytes.
    pub const LEN: usize = 32;

    pub const fn new(bytes: [u8; 32]) -> Self {
        PartyId(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for PartyId {
    fn from(bytes: [u8; 32]) -> Self {
        PartyId(bytes)
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PartyId({})", hex::encode(self.0))
    }
}
