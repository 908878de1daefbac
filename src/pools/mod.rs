//! Pool implementation and the shared handle the registry hands out.
//!
//! A [`Pool`] owns its reserves and share ledger behind a mutex, so a
//! [`PoolHandle`] can be cloned freely across threads.

mod pool;

#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;

use std::sync::Arc;

pub use pool::{Pool, PoolState};

/// Shared reference to a registered pool.
pub type PoolHandle = Arc<Pool>;
