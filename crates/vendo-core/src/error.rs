//! # Error Types
//!
//! Domain-specific error types for vendo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ConfigError  - Machine construction failures (fatal, machine never    │
//! │                 comes into existence)                                   │
//! │  VendError    - Transaction outcomes (soft, machine state untouched,   │
//! │                 customer retries in the same session)                   │
//! │  CoinError    - Coin arithmetic failures (unrecognised coin, change    │
//! │                 request the store cannot honour)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (location, amounts)
//! 3. Errors are enum variants, never String
//! 4. A failed `vend` is an ordinary outcome the caller must handle; only
//!    `ConfigError` represents a genuinely unrecoverable condition

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Coin Error
// =============================================================================

/// Failures raised by [`CoinStore`](crate::coins::CoinStore) arithmetic.
///
/// `UnrecognizedCoin` is the foreign-coin rejection path: the store is left
/// unchanged when it is returned, so callers may treat it as "eject the coin".
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CoinError {
    /// The inserted value does not match any catalog denomination.
    #[error("unrecognised coin ({pence}p)")]
    UnrecognizedCoin { pence: i64 },

    /// More change was requested than the store holds in total.
    ///
    /// The sale protocol checks funds before asking for change, so hitting
    /// this from `vend` would indicate a protocol bug, not a customer error.
    #[error("cannot ask for more change ({requested}) than the store holds ({available})")]
    InsufficientBalance {
        requested: Money,
        available: Money,
    },

    /// A negative change amount was requested.
    #[error("cannot ask for negative change ({pence}p)")]
    NegativeAmount { pence: i64 },
}

// =============================================================================
// Config Error
// =============================================================================

/// Machine construction failures.
///
/// These are fatal: the machine does not come into existence. They surface
/// misconfigured stock definitions to the operator at load time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two stock definitions target the same location.
    #[error("multiple items configured at location {0}")]
    DuplicateLocation(char),

    /// Location is outside the supported alphabet.
    #[error("invalid item location '{0}' (expected 'A'..='Z')")]
    InvalidLocation(char),

    /// Price is not a multiple of the smallest catalog denomination.
    ///
    /// A 65p item can never be paid for exactly, nor its change made,
    /// when the smallest accepted coin is 10p.
    #[error("item at location {location} has an invalid price of {price}")]
    InvalidPrice { location: char, price: Money },

    /// No sellable stock was loaded (zero definitions, or all quantities zero).
    #[error("machine is empty: no sellable stock was loaded")]
    EmptyMachine,

    /// A stock configuration document could not be parsed.
    #[error("malformed stock configuration: {0}")]
    MalformedStock(#[from] serde_json::Error),
}

// =============================================================================
// Vend Error
// =============================================================================

/// Transaction-time outcomes of [`VendingMachine`](crate::machine::VendingMachine)
/// operations.
///
/// ## No-Partial-Effect Guarantee
/// Every variant leaves the bank, the user balance, and every slot's
/// remaining quantity exactly as they were before the call. The customer's
/// coins stay in the machine as credit and they may retry.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VendError {
    /// No item is configured at the location, or its quantity is zero.
    #[error("item at location {location} is out of stock")]
    OutOfStock { location: char },

    /// The inserted balance does not cover the item's price.
    #[error("that item costs {price}, you are {short} short")]
    InsufficientFunds { price: Money, short: Money },

    /// Bank plus inserted coins cannot compose exact change for the sale.
    #[error("no change available ({change_due} due), add smaller coins or choose another item")]
    InsufficientChange { change_due: Money },

    /// The machine is switched off; it accepts no money and sells nothing.
    #[error("the machine is not running")]
    MachineNotRunning,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for coin-store operations.
pub type CoinResult<T> = Result<T, CoinError>;

/// Convenience type alias for machine transaction operations.
pub type VendResult<T> = Result<T, VendError>;

// =============================================================================
// Unit Tests
// =============================================================================
