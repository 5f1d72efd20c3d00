// Copyright (c) 2026 VeilDraw Contributors
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Opaque reference to a ciphertext held by the confidential coprocessor.
///
/// A handle carries no plaintext; it is only meaningful to the coprocessor
/// that issued it. The all-zero value is reserved as the "not yet computed"
/// sentinel and is never issued for a real ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u128);

impl Handle {
    /// Width of the wire encoding in bytes.
    pub const LEN: usize = 16;

    /// Sentinel for "no value / not yet computed".
    pub const ZERO: Handle = Handle(0);

    pub const fn new(raw: u128) -> Self {
        Handle(raw)
    }

    pub const fn raw(self) -> u128 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn to_le_bytes(self) -> [u8; Self::LEN] {
        self.0.to_le_bytes()
    }

    pub const fn from_le_bytes(bytes: [u8; Self::LEN]) -> Self {
        Handle(u128::from_le_bytes(bytes))
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
