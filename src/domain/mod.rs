//! Value types shared by the registry, pools and token ledger.
//!
//! All quantities are integers in the asset's smallest unit and every
//! constructor that can fail validates its input, so a value that exists
//! already satisfies its invariant.

mod account;
mod amount;
mod fee_rate;
mod pool_id;
mod rounding;
mod shares;
mod token_address;
mod token_pair;

pub use account::AccountId;
pub use amount::Amount;
pub use fee_rate::FeeRate;
pub use pool_id::PoolId;
pub use rounding::Rounding;
pub use shares::Shares;
pub use token_address::TokenAddress;
pub use token_pair::{Side, TokenPair};
