//! # vendo-core: Pure Business Logic for Vendo
//!
//! This crate is the **heart** of Vendo, a coin-operated vending machine.
//! It contains all business logic as pure functions with zero I/O
//! dependencies: the customer never loses money, and the machine never
//! fabricates or destroys currency.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Vendo Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Hosting layer (apps/operator)                   │   │
//! │  │      coin mech events ──► commands ──► rendered messages        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vendo-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   coins   │  │   stock   │  │  machine  │  │   │
//! │  │   │   Money   │  │ CoinStore │  │ StockSlot │  │  Vending  │  │   │
//! │  │   │  (pence)  │  │  change   │  │  loaders  │  │  Machine  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FLOATS • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `Money` type with integer pence arithmetic (no floating point!)
//! - [`coins`] - the accepted-coin catalog and `CoinStore` change-making
//! - [`stock`] - stock slots and the loader collaborator interface
//! - [`machine`] - the `VendingMachine` state and sale protocol
//! - [`error`] - domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every operation is synchronous, bounded, and
//!    deterministic (the receipt timestamp aside)
//! 2. **Integer Money**: all monetary values are pence (i64), never floats
//! 3. **Coins Move, Never Copy**: custody transfer zeroes the source store
//!    in the same step, so total currency is conserved
//! 4. **Failures Are Outcomes**: a failed vend is a value the caller must
//!    handle, and it leaves every piece of machine state untouched
//!
//! ## Example Usage
//!
//! ```rust
//! use vendo_core::{CoinStore, StockDefinition, VecStockLoader, VendingMachine};
//!
//! let loader = VecStockLoader::new(vec![StockDefinition {
//!     location: 'A',
//!     price_pence: 60,
//!     quantity: 2,
//! }]);
//! let mut machine = VendingMachine::new(loader, CoinStore::with_counts(5, 5, 1, 5)).unwrap();
//!
//! machine.turn_on();
//! machine.insert_coin(100).unwrap();
//!
//! let receipt = machine.vend('A').unwrap();
//! assert_eq!(receipt.change.value().pence(), 40);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod coins;
pub mod error;
pub mod machine;
pub mod money;
pub mod stock;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vendo_core::CoinStore` instead of
// `use vendo_core::coins::CoinStore`

pub use coins::{is_valid_price, Coin, CoinStore};
pub use error::{CoinError, CoinResult, ConfigError, VendError, VendResult};
pub use machine::{SaleReceipt, VendingMachine};
pub use money::Money;
pub use stock::{
    JsonStockLoader, StockDefinition, StockLoader, StockSlot, VecStockLoader, FIRST_LOCATION,
    LAST_LOCATION, SLOT_COUNT,
};
