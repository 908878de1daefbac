//! Division rounding direction.

use serde::{Deserialize, Serialize};

/// Direction in which an inexact integer division is resolved.
///
/// Every division in the engine names its direction.  Share minting,
/// withdrawals and swap outputs all use [`Rounding::Down`] so rounding
/// dust stays in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Ceiling.
    Up,
    /// Floor (truncation for unsigned values).
    Down,
}

impl Rounding {
    /// Resolves a quotient `q` with remainder `r` in this direction.
    ///
    /// Returns `None` when rounding up would overflow `u128`.
    #[must_use]
    pub const fn resolve(self, q: u128, r: u128) -> Option<u128> {
        match self {
            Self::Down => Some(q),
            Self::Up if r == 0 => Some(q),
            Self::Up => q.checked_add(1),
        }
    }
}
