//! Canonically ordered pair of distinct tokens.

use serde::{Deserialize, Serialize};

use super::TokenAddress;
use crate::error::AmmError;

/// One side of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The lower-ordered token.
    A,
    /// The higher-ordered token.
    B,
}

impl Side {
    /// Returns the opposite side.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// An unordered pair of distinct tokens stored in canonical order.
///
/// The constructor sorts its arguments so that `token_a < token_b`.
/// `(X, Y)` and `(Y, X)` therefore build equal values with equal hashes,
/// which is what lets the registry key its map directly by `TokenPair`.
///
/// # Examples
///
/// ```
/// use hydra_liquidity::domain::{TokenAddress, TokenPair};
///
/// let x = TokenAddress::from_low_u64(9);
/// let y = TokenAddress::from_low_u64(3);
/// let pair = TokenPair::new(x, y).expect("distinct tokens");
/// assert_eq!(pair.token_a(), y);
/// assert_eq!(pair, TokenPair::new(y, x).expect("distinct tokens"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    token_a: TokenAddress,
    token_b: TokenAddress,
}

impl TokenPair {
    /// Builds the canonical pair for two tokens given in any order.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::IdenticalTokens`] if `x == y`.
    pub fn new(x: TokenAddress, y: TokenAddress) -> Result<Self, AmmError> {
        if x == y {
            return Err(AmmError::IdenticalTokens);
        }
        let (token_a, token_b) = if x < y { (x, y) } else { (y, x) };
        Ok(Self { token_a, token_b })
    }

    /// The lower-ordered token.
    #[must_use]
    pub const fn token_a(&self) -> TokenAddress {
        self.token_a
    }

    /// The higher-ordered token.
    #[must_use]
    pub const fn token_b(&self) -> TokenAddress {
        self.token_b
    }

    /// Returns the token on `side`.
    #[must_use]
    pub const fn token(&self, side: Side) -> TokenAddress {
        match side {
            Side::A => self.token_a,
            Side::B => self.token_b,
        }
    }

    /// Returns `true` if `token` is one of the two pair members.
    #[must_use]
    pub fn contains(&self, token: &TokenAddress) -> bool {
        self.token_a == *token || self.token_b == *token
    }

    /// Returns which side `token` sits on.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidTokenForPool`] if `token` is not in the pair.
    pub fn side_of(&self, token: &TokenAddress) -> Result<Side, AmmError> {
        if *token == self.token_a {
            Ok(Side::A)
        } else if *token == self.token_b {
            Ok(Side::B)
        } else {
            Err(AmmError::InvalidTokenForPool)
        }
    }

    /// Returns the counterpart of `token`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidTokenForPool`] if `token` is not in the pair.
    pub fn other(&self, token: &TokenAddress) -> Result<TokenAddress, AmmError> {
        self.side_of(token).map(|side| self.token(side.flip()))
    }
}
