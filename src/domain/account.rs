//! Holder identity used by the share ledger and the token capability.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::token_address::{low_u64_bytes, parse_hex32};
use crate::error::AmmError;

/// Identity of a liquidity provider, trader, or pool custody account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// Creates an account id from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Creates an account id whose last eight bytes hold `n` big-endian.
    #[must_use]
    pub fn from_low_u64(n: u64) -> Self {
        Self(low_u64_bytes(n))
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AccountId {
    type Err = AmmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex32(s).map(Self)
    }
}
