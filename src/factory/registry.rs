//! Process-wide registry of pools, one per unordered token pair.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::PoolConfig;
use crate::domain::{PoolId, TokenAddress, TokenPair};
use crate::error::AmmError;
use crate::events::{EventSink, PoolEvent};
use crate::ledger::TokenLedger;
use crate::pools::{Pool, PoolHandle};

#[derive(Default)]
struct Directory {
    by_pair: HashMap<TokenPair, PoolHandle>,
    by_id: Vec<PoolHandle>,
}

/// Creates pools and resolves token pairs to them.
///
/// Pairs are canonicalised through [`TokenPair::new`] before every insert
/// and lookup, so `(x, y)` and `(y, x)` always reach the same pool.  Pool
/// ids are assigned sequentially from 1 in creation order.
///
/// # Thread Safety
///
/// Lookups take a shared lock.  Creation takes the exclusive lock for the
/// check and the insert together, so two threads racing to create the same
/// pair see exactly one success and one [`AmmError::PoolAlreadyExists`].
/// Once a handle is returned the registry is out of the picture: pool
/// operations never touch the registry lock.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use hydra_liquidity::config::PoolConfig;
/// use hydra_liquidity::domain::TokenAddress;
/// use hydra_liquidity::error::AmmError;
/// use hydra_liquidity::events::NoopSink;
/// use hydra_liquidity::factory::PoolRegistry;
/// use hydra_liquidity::ledger::InMemoryLedger;
///
/// let registry = PoolRegistry::new(
///     PoolConfig::default(),
///     Arc::new(InMemoryLedger::new()),
///     Arc::new(NoopSink),
/// );
/// let (usdc, weth) = (TokenAddress::from_low_u64(2), TokenAddress::from_low_u64(1));
///
/// let pool = registry.create_pool(usdc, weth).expect("new pair");
/// assert_eq!(pool.token_a(), weth);
///
/// let same = registry.get_pool(weth, usdc).expect("registered");
/// assert!(Arc::ptr_eq(&pool, &same));
/// assert_eq!(registry.create_pool(weth, usdc).unwrap_err(), AmmError::PoolAlreadyExists);
/// ```
pub struct PoolRegistry {
    config: PoolConfig,
    ledger: Arc<dyn TokenLedger>,
    sink: Arc<dyn EventSink>,
    directory: RwLock<Directory>,
}

impl PoolRegistry {
    /// Creates an empty registry.
    ///
    /// `config` is applied to pools created with
    /// [`create_pool`](Self::create_pool).  Every pool shares `ledger`
    /// and `sink`.
    pub fn new(config: PoolConfig, ledger: Arc<dyn TokenLedger>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            config,
            ledger,
            sink,
            directory: RwLock::new(Directory::default()),
        }
    }

    /// Default configuration for new pools.
    #[must_use]
    pub const fn config(&self) -> PoolConfig {
        self.config
    }

    /// Creates an empty pool for the unordered pair `{x, y}` with the
    /// registry's default configuration.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalTokens`] if `x == y`.
    /// - [`AmmError::PoolAlreadyExists`] if the pair is already registered.
    pub fn create_pool(&self, x: TokenAddress, y: TokenAddress) -> Result<PoolHandle, AmmError> {
        self.create_pool_with(x, y, self.config)
    }

    /// Like [`create_pool`](Self::create_pool) with a per-pool configuration.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalTokens`] if `x == y`.
    /// - [`AmmError::InvalidConfiguration`] if `config` fails validation.
    /// - [`AmmError::PoolAlreadyExists`] if the pair is already registered.
    pub fn create_pool_with(
        &self,
        x: TokenAddress,
        y: TokenAddress,
        config: PoolConfig,
    ) -> Result<PoolHandle, AmmError> {
        let pair = TokenPair::new(x, y)?;
        config.validate()?;

        let mut directory = self.directory.write();
        if directory.by_pair.contains_key(&pair) {
            debug!(token_a = %pair.token_a(), token_b = %pair.token_b(), "pool already registered");
            return Err(AmmError::PoolAlreadyExists);
        }

        let next = u64::try_from(directory.by_id.len())
            .ok()
            .and_then(|n| n.checked_add(1))
            .ok_or(AmmError::Overflow("pool id space exhausted"))?;
        let id = PoolId::new(next);
        let pool = Arc::new(Pool::new(
            id,
            pair,
            config,
            Arc::clone(&self.ledger),
            Arc::clone(&self.sink),
        ));
        directory.by_pair.insert(pair, Arc::clone(&pool));
        directory.by_id.push(Arc::clone(&pool));
        drop(directory);

        info!(
            pool = %id,
            token_a = %pair.token_a(),
            token_b = %pair.token_b(),
            fee = %config.fee(),
            "pool created"
        );
        self.sink.emit(&PoolEvent::PoolCreated {
            token_a: pair.token_a(),
            token_b: pair.token_b(),
            pool_id: id,
        });
        Ok(pool)
    }

    /// Looks up the pool for `{x, y}` in either argument order.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] if no pool is registered for the
    /// pair, including when `x == y`.
    pub fn get_pool(&self, x: TokenAddress, y: TokenAddress) -> Result<PoolHandle, AmmError> {
        let pair = TokenPair::new(x, y).map_err(|_| AmmError::PoolNotFound)?;
        self.directory
            .read()
            .by_pair
            .get(&pair)
            .cloned()
            .ok_or(AmmError::PoolNotFound)
    }

    /// Looks up a pool by its id.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] for an unknown id.
    pub fn pool_by_id(&self, id: PoolId) -> Result<PoolHandle, AmmError> {
        let index = id
            .get()
            .checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .ok_or(AmmError::PoolNotFound)?;
        self.directory
            .read()
            .by_id
            .get(index)
            .cloned()
            .ok_or(AmmError::PoolNotFound)
    }

    /// All pools in creation order.
    #[must_use]
    pub fn pools(&self) -> Vec<PoolHandle> {
        self.directory.read().by_id.clone()
    }

    /// Number of registered pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directory.read().by_id.len()
    }

    /// Returns `true` if no pool has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directory.read().by_id.is_empty()
    }
}

impl core::fmt::Debug for PoolRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PoolRegistry")
            .field("config", &self.config)
            .field("pools", &self.len())
            .finish_non_exhaustive()
    }
}
