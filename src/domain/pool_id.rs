//! Registry-assigned pool identifier.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::AccountId;

/// Marker written into the leading bytes of every custody account so it
/// cannot collide with ids built by [`AccountId::from_low_u64`].
const CUSTODY_TAG: [u8; 4] = *b"pool";

/// Sequential identifier handed out by the registry, starting at 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PoolId(u64);

impl PoolId {
    /// Wraps a raw id.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// The account that holds this pool's reserves on the token ledger.
    #[must_use]
    pub fn custody_account(&self) -> AccountId {
        let mut bytes = [0u8; 32];
        bytes[..4].copy_from_slice(&CUSTODY_TAG);
        bytes[24..].copy_from_slice(&self.0.to_be_bytes());
        AccountId::from_bytes(bytes)
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool#{}", self.0)
    }
}
