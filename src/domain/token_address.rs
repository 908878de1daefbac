//! Chain-agnostic token identifier.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// A 32-byte token identifier.
///
/// Ordering is lexicographic over the bytes; [`TokenPair`](super::TokenPair)
/// relies on it to pick the canonical side of a pair.  Displayed and
/// parsed as `0x`-prefixed lowercase hex.
///
/// # Examples
///
/// ```
/// use hydra_liquidity::domain::TokenAddress;
///
/// let lo = TokenAddress::from_low_u64(1);
/// let hi = TokenAddress::from_low_u64(2);
/// assert!(lo < hi);
/// assert_eq!(lo.to_string().parse::<TokenAddress>(), Ok(lo));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TokenAddress([u8; 32]);

impl TokenAddress {
    /// Creates an address from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Creates an address whose last eight bytes hold `n` big-endian.
    ///
    /// Addresses built this way order the same way as `n`.
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

impl fmt::Display for TokenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for TokenAddress {
    type Err = AmmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex32(s).map(Self)
    }
}

pub(crate) fn low_u64_bytes(n: u64) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[24..].copy_from_slice(&n.to_be_bytes());
    bytes
}

pub(crate) fn parse_hex32(s: &str) -> Result<[u8; 32], AmmError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(digits, &mut bytes)
        .map_err(|e| AmmError::InvalidConfiguration(format!("invalid identifier {s:?}: {e}")))?;
    Ok(bytes)
}
