//! Pool creation and pair lookup.
//!
//! [`PoolRegistry`] is the single entry point for obtaining pools.  It
//! canonicalises each pair, rejects duplicates and hands out shared
//! [`PoolHandle`](crate::pools::PoolHandle)s that callers then operate on
//! directly.

mod registry;

pub use registry::PoolRegistry;
