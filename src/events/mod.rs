//! Informational events for observers and indexers.
//!
//! Events are emitted after an operation has committed.  Nothing in the
//! engine reads them back, so a sink that drops events cannot affect
//! correctness.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, Amount, PoolId, Shares, TokenAddress};

/// A committed state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PoolEvent {
    /// The registry created a pool for a canonical pair.
    PoolCreated {
        /// Lower-ordered token.
        token_a: TokenAddress,
        /// Higher-ordered token.
        token_b: TokenAddress,
        /// Id of the new pool.
        pool_id: PoolId,
    },
    /// A provider deposited both assets and received shares.
    LiquidityAdded {
        /// Pool the deposit went into.
        pool_id: PoolId,
        /// Depositor.
        provider: AccountId,
        /// Token-A amount taken into reserves.
        amount_a: Amount,
        /// Token-B amount taken into reserves.
        amount_b: Amount,
        /// Shares minted to the provider.
        shares_minted: Shares,
    },
    /// A provider burned shares and received both assets.
    LiquidityRemoved {
        /// Pool the withdrawal came from.
        pool_id: PoolId,
        /// Withdrawing provider.
        provider: AccountId,
        /// Token-A amount paid out.
        amount_a: Amount,
        /// Token-B amount paid out.
        amount_b: Amount,
        /// Shares burned.
        shares_burned: Shares,
    },
    /// A trader exchanged one asset for the other.
    Swap {
        /// Pool traded against.
        pool_id: PoolId,
        /// Trader.
        trader: AccountId,
        /// Asset sold to the pool.
        token_in: TokenAddress,
        /// Full input, fee included.
        amount_in: Amount,
        /// Output paid to the trader.
        amount_out: Amount,
    },
}

/// Receiver of [`PoolEvent`]s.
pub trait EventSink: Send + Sync {
    /// Delivers one event.  Must not call back into the emitting pool.
    fn emit(&self, event: &PoolEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: &PoolEvent) {}
}

/// Keeps every event in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PoolEvent>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the events received so far.
    #[must_use]
    pub fn events(&self) -> Vec<PoolEvent> {
        self.events.lock().clone()
    }

    /// Removes and returns the events received so far.
    pub fn drain(&self) -> Vec<PoolEvent> {
        core::mem::take(&mut *self.events.lock())
    }

    /// Number of events received.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns `true` if nothing has been received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &PoolEvent) {
        self.events.lock().push(event.clone());
    }
}
