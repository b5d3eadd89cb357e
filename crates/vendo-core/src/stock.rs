//! # Stock Module
//!
//! Sellable item definitions and the loader interface that supplies them.
//!
//! ## Loading Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Stock Configuration Flow                            │
//! │                                                                         │
//! │  JSON document ──► JsonStockLoader ──┐                                  │
//! │                                      ├──► StockDefinition stream        │
//! │  In-memory list ─► VecStockLoader ───┘         │                        │
//! │                                                ▼                        │
//! │                                     StockSlot::new (validation)         │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                                     VendingMachine::new (consumed once) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loader is a capability, not a format: anything that yields a finite
//! sequence of definitions satisfies it, restartable only by reconstruction.

use serde::{Deserialize, Serialize};

use crate::coins::is_valid_price;
use crate::error::ConfigError;
use crate::money::Money;

// =============================================================================
// Location Alphabet
// =============================================================================

/// First valid slot location code.
pub const FIRST_LOCATION: char = 'A';

/// Last valid slot location code.
pub const LAST_LOCATION: char = 'Z';

/// Number of addressable slots in a machine.
pub const SLOT_COUNT: usize = 26;

/// Converts a location code to a zero-based slot index, if it is valid.
pub(crate) fn location_index(location: char) -> Option<usize> {
    if (FIRST_LOCATION..=LAST_LOCATION).contains(&location) {
        Some(location as usize - FIRST_LOCATION as usize)
    } else {
        None
    }
}

// =============================================================================
// Stock Definition
// =============================================================================

/// One raw stock-configuration entry, as produced by a loader.
///
/// This is the unvalidated wire shape; [`StockSlot::new`] turns it into a
/// machine-ready slot or rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDefinition {
    /// Slot location code, `'A'..='Z'`.
    pub location: char,

    /// Unit price in pence.
    pub price_pence: i64,

    /// Number of units loaded into the slot.
    pub quantity: u32,
}

// =============================================================================
// Stock Slot
// =============================================================================

/// One priced, quantity-limited sellable item at a fixed location.
///
/// Location and price are immutable after validation. The remaining
/// quantity only ever moves down, by exactly one per committed sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockSlot {
    location: char,
    price: Money,
    remaining: u32,
}

impl StockSlot {
    /// Validates a definition into a slot.
    ///
    /// ## Errors
    /// - [`ConfigError::InvalidLocation`] if the location is outside `'A'..='Z'`
    /// - [`ConfigError::InvalidPrice`] if the price is not a non-negative
    ///   multiple of the smallest catalog coin
    pub fn new(def: StockDefinition) -> Result<Self, ConfigError> {
        if location_index(def.location).is_none() {
            return Err(ConfigError::InvalidLocation(def.location));
        }

        let price = Money::from_pence(def.price_pence);
        if !is_valid_price(price) {
            return Err(ConfigError::InvalidPrice {
                location: def.location,
                price,
            });
        }

        Ok(StockSlot {
            location: def.location,
            price,
            remaining: def.quantity,
        })
    }

    /// Location code of this slot.
    #[inline]
    pub fn location(&self) -> char {
        self.location
    }

    /// Unit price.
    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }

    /// Units left in the slot.
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether at least one unit is left.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.remaining > 0
    }

    /// Zero-based index of this slot's (already validated) location.
    pub(crate) fn index(&self) -> usize {
        self.location as usize - FIRST_LOCATION as usize
    }

    /// Removes one unit as part of a committed sale.
    ///
    /// Callers must have established `in_stock()` first; the sale protocol
    /// does so in its resolution step.
    pub(crate) fn take_one(&mut self) {
        debug_assert!(self.remaining > 0, "sold from an empty slot");
        self.remaining -= 1;
    }
}

// =============================================================================
// Stock Loader
// =============================================================================

/// Supplies the initial stock configuration at machine construction.
///
/// A loader yields zero or more definitions and is exhausted when it
/// returns `None`; the machine consumes it exactly once. Concrete sources
/// (in-memory lists, JSON documents, anything else) all fit behind this.
pub trait StockLoader {
    /// Returns the next stock definition, or `None` when exhausted.
    fn next_definition(&mut self) -> Option<StockDefinition>;
}

/// In-memory FIFO loader.
///
/// The simplest concrete source; also what tests use to script machine
/// configurations.
#[derive(Debug)]
pub struct VecStockLoader {
    defs: std::vec::IntoIter<StockDefinition>,
}

impl VecStockLoader {
    /// Creates a loader that yields `defs` in order.
    pub fn new(defs: Vec<StockDefinition>) -> Self {
        VecStockLoader {
            defs: defs.into_iter(),
        }
    }
}

impl StockLoader for VecStockLoader {
    fn next_definition(&mut self) -> Option<StockDefinition> {
        self.defs.next()
    }
}

/// Loader backed by a JSON array of stock definitions.
///
/// ## Expected Document Shape
/// ```json
/// [
///   { "location": "A", "price_pence": 60, "quantity": 2 },
///   { "location": "B", "price_pence": 100, "quantity": 2 }
/// ]
/// ```
#[derive(Debug)]
pub struct JsonStockLoader {
    defs: std::vec::IntoIter<StockDefinition>,
}

impl JsonStockLoader {
    /// Parses a JSON document into a loader.
    ///
    /// Parsing happens eagerly so that a malformed document fails here,
    /// as [`ConfigError::MalformedStock`], rather than partway through
    /// machine construction.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let defs: Vec<StockDefinition> = serde_json::from_str(document)?;
        Ok(JsonStockLoader {
            defs: defs.into_iter(),
        })
    }
}

impl StockLoader for JsonStockLoader {
    fn next_definition(&mut self) -> Option<StockDefinition> {
        self.defs.next()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
