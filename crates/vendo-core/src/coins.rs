//! # Coins Module
//!
//! The accepted-coin catalog and the `CoinStore` multiset that every coin in
//! the system lives in, whether it is the machine's bank, a customer's
//! in-progress balance, or a parcel of change about to be dispensed.
//!
//! ## Custody Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Coin Custody Flow                                │
//! │                                                                         │
//! │  Customer ──insert──► user balance ──merge_from──► bank                │
//! │                                                     │                   │
//! │                                              make_change                │
//! │                                                     │                   │
//! │                                                     ▼                   │
//! │                                              change parcel ──► customer │
//! │                                                                         │
//! │  Every arrow is a MOVE: a coin is owned by exactly one store at a      │
//! │  time, so bank + balances + issued change is conserved.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoinError, CoinResult};
use crate::money::Money;

// =============================================================================
// Coin Catalog
// =============================================================================

/// An accepted coin denomination.
///
/// The discriminant doubles as the index into [`CoinStore`] count arrays,
/// so [`Coin::ALL`] must stay in strictly descending face-value order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coin {
    /// £1.00
    Pound,
    /// 50p
    Fifty,
    /// 20p
    Twenty,
    /// 10p
    Ten,
}

impl Coin {
    /// The fixed catalog of accepted denominations, highest value first.
    ///
    /// The greedy change algorithm in [`CoinStore::make_change`] walks this
    /// order, so descending order is a correctness requirement, not a
    /// presentation choice.
    pub const ALL: [Coin; 4] = [Coin::Pound, Coin::Fifty, Coin::Twenty, Coin::Ten];

    /// The smallest accepted denomination; defines the currency granularity.
    pub const MINIMUM: Coin = Coin::Ten;

    /// Face value of this coin.
    #[inline]
    pub const fn face_value(self) -> Money {
        match self {
            Coin::Pound => Money::from_pence(100),
            Coin::Fifty => Money::from_pence(50),
            Coin::Twenty => Money::from_pence(20),
            Coin::Ten => Money::from_pence(10),
        }
    }

    /// Identifies a coin from its pence value.
    ///
    /// This is the recognition step for physically inserted coins: an
    /// unmatched value is a foreign or damaged coin and comes back as
    /// [`CoinError::UnrecognizedCoin`].
    ///
    /// With four catalog entries a linear walk beats any lookup structure.
    pub fn from_pence(pence: i64) -> CoinResult<Coin> {
        Coin::ALL
            .into_iter()
            .find(|coin| coin.face_value().pence() == pence)
            .ok_or(CoinError::UnrecognizedCoin { pence })
    }

    /// Index of this coin in catalog order (0 = highest value).
    #[inline]
    const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase denomination name, used in store breakdowns and log events.
    pub const fn name(self) -> &'static str {
        match self {
            Coin::Pound => "pound",
            Coin::Fifty => "fifty",
            Coin::Twenty => "twenty",
            Coin::Ten => "ten",
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Checks that a price is representable in the coin catalog.
///
/// With 10p as the smallest accepted coin, a 65p price could never be paid
/// exactly nor have exact change composed, so it is rejected at
/// configuration time.
pub fn is_valid_price(price: Money) -> bool {
    !price.is_negative() && price.pence() % Coin::MINIMUM.face_value().pence() == 0
}

// =============================================================================
// Coin Store
// =============================================================================

/// A multiset of coins, keyed by denomination.
///
/// ## Invariants
/// - Counts are never negative (`u32` makes this structural)
/// - Total value is always `Σ count × face value`
/// - A store is owned by exactly one logical holder; coins change holder
///   only through [`CoinStore::merge_from`] or [`CoinStore::make_change`],
///   both of which deduct from the source in the same step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinStore {
    /// Count per denomination, indexed in [`Coin::ALL`] order.
    counts: [u32; Coin::ALL.len()],
}

impl CoinStore {
    /// Creates an empty store.
    pub const fn new() -> Self {
        CoinStore {
            counts: [0; Coin::ALL.len()],
        }
    }

    /// Creates a store pre-loaded with a set of coins (e.g. a shop float).
    pub const fn with_counts(pounds: u32, fifties: u32, twenties: u32, tens: u32) -> Self {
        CoinStore {
            counts: [pounds, fifties, twenties, tens],
        }
    }

    /// Total value of the store.
    pub fn value(&self) -> Money {
        Coin::ALL
            .into_iter()
            .map(|coin| coin.face_value() * self.count_of(coin) as i64)
            .fold(Money::zero(), |acc, v| acc + v)
    }

    /// Total number of coins, regardless of denomination.
    pub fn coin_count(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Number of coins held of one denomination.
    #[inline]
    pub fn count_of(&self, coin: Coin) -> u32 {
        self.counts[coin.index()]
    }

    /// Checks whether the store holds no coins at all.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Adds a single known-good coin to the store.
    #[inline]
    pub fn insert(&mut self, coin: Coin) {
        self.counts[coin.index()] += 1;
    }

    /// Recognises a coin by pence value and adds it to the store.
    ///
    /// On [`CoinError::UnrecognizedCoin`] the store is left unchanged: the
    /// caller must treat the error as "eject the coin", never as a balance
    /// change.
    pub fn insert_pence(&mut self, pence: i64) -> CoinResult<Coin> {
        let coin = Coin::from_pence(pence)?;
        self.insert(coin);
        Ok(coin)
    }

    /// Moves the entire contents of `other` into this store.
    ///
    /// A coin cannot exist in two stores at once: `other` is zeroed in the
    /// same step, so total system currency is conserved. This is the only
    /// way coins change custodianship wholesale.
    pub fn merge_from(&mut self, other: &mut CoinStore) {
        for coin in Coin::ALL {
            self.counts[coin.index()] += other.counts[coin.index()];
            other.counts[coin.index()] = 0;
        }
    }

    /// Greedy decomposition of `amount` against this store, without mutation.
    ///
    /// Walks the catalog in descending order, taking
    /// `min(remaining / face_value, available)` of each denomination.
    /// Returns the coins taken and whatever value could not be supplied.
    fn decompose(&self, amount: Money) -> (CoinStore, Money) {
        let mut remaining = amount.pence();
        let mut taken = CoinStore::new();
        for coin in Coin::ALL {
            let face = coin.face_value().pence();
            let use_count = (remaining / face).min(self.count_of(coin) as i64);
            taken.counts[coin.index()] = use_count as u32;
            remaining -= use_count * face;
        }
        (taken, Money::from_pence(remaining))
    }

    /// Tests whether exact change for `amount` can be composed from this
    /// store's current contents. Never mutates the store.
    ///
    /// Defined in terms of the same greedy decomposition as
    /// [`CoinStore::make_change`], checked for zero remainder, so a `true`
    /// here guarantees `make_change` will succeed exactly for the same
    /// amount on an unmodified store. A zero amount is always composable.
    pub fn can_make_exact(&self, amount: Money) -> bool {
        if amount.is_negative() {
            return false;
        }
        self.decompose(amount).1.is_zero()
    }

    /// Removes and returns a set of coins representing `amount`.
    ///
    /// Uses the greedy algorithm over the catalog in descending order,
    /// which yields the minimum coin count for canonical 1/2/5-multiple
    /// currency structures (a documented assumption, not a general optimal
    /// coin-change solver).
    ///
    /// ## Errors
    /// - [`CoinError::NegativeAmount`] if `amount` is negative
    /// - [`CoinError::InsufficientBalance`] if `amount` exceeds the store's
    ///   total value
    ///
    /// Both are checked before any mutation.
    ///
    /// ## Partial Change
    /// If the store's coin mix cannot supply `amount` exactly (say, 30p
    /// requested from a store holding only £1 coins), this is NOT an error:
    /// the best partial decomposition is removed and returned, and the
    /// shortfall stays unaccounted. Callers that require exactness must
    /// pre-check with [`CoinStore::can_make_exact`].
    pub fn make_change(&mut self, amount: Money) -> CoinResult<CoinStore> {
        if amount.is_negative() {
            return Err(CoinError::NegativeAmount {
                pence: amount.pence(),
            });
        }
        if amount > self.value() {
            return Err(CoinError::InsufficientBalance {
                requested: amount,
                available: self.value(),
            });
        }

        let (change, _shortfall) = self.decompose(amount);
        for coin in Coin::ALL {
            self.counts[coin.index()] -= change.counts[coin.index()];
        }
        Ok(change)
    }
}

/// Per-denomination breakdown plus total, for log events and debugging.
impl fmt::Display for CoinStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for coin in Coin::ALL {
            write!(f, "{}[{}];", coin, self.count_of(coin))?;
        }
        write!(f, "total={}", self.value())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
