//! Unified error types for the liquidity engine.
//!
//! Every fallible operation in the crate returns [`AmmError`].  Each
//! variant names one specific failure so that callers can tell a
//! duplicate pair apart from a deposit that is too small or a rejected
//! token transfer.  No operation recovers locally: an error always means
//! the operation had no effect on pool or registry state.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, AmmError>;

/// All error conditions raised by the registry, pools, math and ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    /// Both sides of a pair refer to the same token.
    #[error("identical tokens: a pool needs two distinct assets")]
    IdenticalTokens,

    /// A pool for the canonical pair is already registered.
    #[error("pool already exists for this token pair")]
    PoolAlreadyExists,

    /// No pool is registered for the requested pair or id.
    #[error("pool not found")]
    PoolNotFound,

    /// A deposit was too small to round to a positive share amount.
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// A withdrawal would return zero of both assets.
    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    /// A swap would return zero output.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// The pool cannot serve the request: it is empty, or the swap
    /// solve produced an output at least as large as the reserve.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// The caller tried to burn more shares than they hold.
    #[error("insufficient shares: holder has {held}, requested {requested}")]
    InsufficientShares {
        /// Shares currently held by the caller.
        held: u128,
        /// Shares the caller asked to burn.
        requested: u128,
    },

    /// A swap named a token that does not belong to the pool.
    #[error("token does not belong to this pool")]
    InvalidTokenForPool,

    /// An operation was called with a zero amount.
    #[error("amount must be greater than zero")]
    ZeroAmount,

    /// The deposit does not match the pool ratio and the pool is
    /// configured to reject unbalanced deposits.
    #[error("unbalanced deposit rejected by pool policy")]
    UnbalancedDeposit,

    /// The external token capability rejected a transfer.
    #[error("token transfer failed: {0}")]
    TransferFailed(String),

    /// Arithmetic overflow.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Pool or registry configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl AmmError {
    /// Returns `true` for errors raised by the token capability.
    #[must_use]
    pub const fn is_transfer_failure(&self) -> bool {
        matches!(self, Self::TransferFailed(_))
    }
}
