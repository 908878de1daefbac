//! # Hydra Liquidity
//!
//! Constant-product liquidity engine: a registry of two-asset pools, each
//! holding paired reserves, minting and burning proportional ownership
//! shares, and pricing trades with a fee that compounds into the reserves.
//!
//! Every quantity is an integer in the asset's smallest unit.  Products
//! are taken through a 256-bit intermediate, so 18-decimal reserves in
//! the trillions do not overflow.  Every pool operation is all-or-nothing:
//! reserves, share balances and external token balances either all change
//! or none does.
//!
//! ## Create a pool, deposit and swap
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use hydra_liquidity::prelude::*;
//!
//! let ledger = Arc::new(InMemoryLedger::new());
//! let registry = PoolRegistry::new(PoolConfig::default(), ledger.clone(), Arc::new(NoopSink));
//!
//! let (usdc, weth) = (TokenAddress::from_low_u64(1), TokenAddress::from_low_u64(2));
//! let alice = AccountId::from_low_u64(42);
//!
//! let pool = registry.create_pool(weth, usdc).expect("new pair");
//! for token in [usdc, weth] {
//!     ledger.mint(token, alice, Amount::new(1_000_000)).expect("mint");
//!     ledger.approve(token, alice, pool.custody_account(), Amount::new(1_000_000));
//! }
//!
//! let receipt = pool
//!     .add_liquidity(alice, Amount::new(1_000), Amount::new(1_000))
//!     .expect("first deposit");
//! assert_eq!(receipt.shares, Shares::new(1_000));
//!
//! let out = pool.swap(alice, usdc, Amount::new(100)).expect("swap");
//! assert_eq!(out, Amount::new(90));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Consumer   │  create_pool / get_pool
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │   Registry   │  canonical pair → PoolHandle
//! └──────┬───────┘
//!        │ Arc<Pool>
//!        ▼
//! ┌──────────────┐
//! │     Pool     │  reserves + shares behind a mutex
//! └──────┬───────┘
//!        │ reserve_math           Settlement
//!        ▼                           ▼
//! ┌──────────────┐          ┌──────────────┐
//! │     Math     │          │  TokenLedger │  external balances
//! └──────────────┘          └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Amount`](domain::Amount), [`Shares`](domain::Shares), [`TokenPair`](domain::TokenPair), [`FeeRate`](domain::FeeRate), etc. |
//! | [`math`]   | Checked arithmetic, 256-bit `mul_div` and the pure [`reserve_math`](math::reserve_math) |
//! | [`config`] | [`PoolConfig`](config::PoolConfig) and [`ExcessPolicy`](config::ExcessPolicy) |
//! | [`ledger`] | [`TokenLedger`](ledger::TokenLedger) capability, in-memory ledger and rollback [`Settlement`](ledger::Settlement) |
//! | [`traits`] | [`SwapPool`](traits::SwapPool) and [`LiquidityPool`](traits::LiquidityPool) |
//! | [`pools`]  | The constant-product [`Pool`](pools::Pool) |
//! | [`factory`] | [`PoolRegistry`](factory::PoolRegistry) |
//! | [`events`] | [`PoolEvent`](events::PoolEvent) and sinks |
//! | [`error`]  | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod factory;
pub mod ledger;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod traits;
