//! # Vending Machine Module
//!
//! The machine itself: a fixed rack of stock slots, a bank of change, the
//! current customer's inserted balance, and the sale protocol that ties
//! them together.
//!
//! ## Sale Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          vend(location)                                 │
//! │                                                                         │
//! │  1. Resolve slot ───────── missing / empty ──────► OutOfStock          │
//! │  2. Check funds ────────── balance < price ──────► InsufficientFunds   │
//! │  3. change_due = balance - price                                        │
//! │  4. Feasibility check ──── bank ∪ balance cannot                        │
//! │     (disposable copies)    compose change_due ───► InsufficientChange  │
//! │  5. COMMIT: slot -1, balance moves into bank,                           │
//! │     change drawn from bank (exact, guaranteed by 4)                     │
//! │  6. Machine empty? ──────► auto switch off                              │
//! │  7. Return SaleReceipt                                                  │
//! │                                                                         │
//! │  Steps 1-4 never mutate anything: a failed vend leaves bank, balance   │
//! │  and stock byte-for-byte unchanged.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operator Messages
//! Success and cancellation emit `info!` events; out-of-stock, funds and
//! change shortfalls, rejected coins and the auto-shutdown emit `warn!`.
//! The hosting layer decides how these are rendered.
//!
//! ## Thread Safety
//! The machine is plain owned data serving one customer at a time. A host
//! exposing it to concurrent callers must wrap each customer-visible
//! operation in a single mutual-exclusion scope: the protocol's atomicity
//! assumes no interleaving between its feasibility check and its commit.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::coins::CoinStore;
use crate::error::{ConfigError, VendError, VendResult};
use crate::money::Money;
use crate::stock::{location_index, StockLoader, StockSlot, SLOT_COUNT};

// =============================================================================
// Sale Receipt
// =============================================================================

/// The success result of a sale: what was sold, for how much, what is left
/// in the slot, and the coins to physically dispense.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleReceipt {
    /// Slot the item was vended from.
    pub location: char,

    /// Unit price charged.
    pub price: Money,

    /// Units left in the slot after this sale.
    pub remaining: u32,

    /// Change to eject. May be empty when the customer paid exact coinage.
    pub change: CoinStore,

    /// When the sale committed.
    pub sold_at: DateTime<Utc>,
}

// =============================================================================
// Vending Machine
// =============================================================================

/// A coin-operated vending machine.
///
/// ## Lifecycle
/// Constructed once from a [`StockLoader`] plus an initial bank float,
/// starts switched off, lives for the process. Switches itself off when
/// the last sellable unit is sold; nothing restocks it.
///
/// ## Ownership
/// The bank is exclusively owned and mutated here. Coins only ever enter
/// it through a committed sale and only leave it as change for one.
#[derive(Debug)]
pub struct VendingMachine {
    /// One optional slot per location code. `None` means nothing is
    /// configured there.
    slots: [Option<StockSlot>; SLOT_COUNT],

    /// The machine's own reserve, used to fund change.
    bank: CoinStore,

    /// Coins inserted for the in-progress transaction. Reset to empty on
    /// every completed or cancelled transaction.
    user_balance: CoinStore,

    /// Running state. Money is only accepted while running.
    running: bool,
}

impl VendingMachine {
    /// Configures a machine from loader-supplied stock and an initial
    /// bank float.
    ///
    /// The loader is drained exactly once.
    ///
    /// ## Errors
    /// - [`ConfigError::DuplicateLocation`] if two definitions share a location
    /// - [`ConfigError::InvalidLocation`] / [`ConfigError::InvalidPrice`]
    ///   propagated from slot validation
    /// - [`ConfigError::EmptyMachine`] if the total loaded quantity is zero
    ///   (including the zero-definitions case)
    pub fn new<L: StockLoader>(mut loader: L, initial_bank: CoinStore) -> Result<Self, ConfigError> {
        let mut slots: [Option<StockSlot>; SLOT_COUNT] = std::array::from_fn(|_| None);
        let mut loaded_units: u64 = 0;

        while let Some(def) = loader.next_definition() {
            let slot = StockSlot::new(def)?;
            let idx = slot.index();
            if slots[idx].is_some() {
                return Err(ConfigError::DuplicateLocation(slot.location()));
            }
            loaded_units += u64::from(slot.remaining());
            slots[idx] = Some(slot);
        }

        if loaded_units == 0 {
            return Err(ConfigError::EmptyMachine);
        }

        debug!(
            units = loaded_units,
            float = %initial_bank.value(),
            "machine configured"
        );

        Ok(VendingMachine {
            slots,
            bank: initial_bank,
            user_balance: CoinStore::new(),
            running: false,
        })
    }

    // -------------------------------------------------------------------------
    // Running state
    // -------------------------------------------------------------------------

    /// Whether the machine is switched on.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Switches the machine on. Always succeeds, including when already on.
    pub fn turn_on(&mut self) {
        self.running = true;
    }

    /// Switches the machine off. Always succeeds, including when already
    /// off. An in-progress balance survives; the customer can still
    /// [`coin_return`](VendingMachine::coin_return) it.
    pub fn turn_off(&mut self) {
        self.running = false;
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Value of the coins the current customer has inserted.
    pub fn user_balance_value(&self) -> Money {
        self.user_balance.value()
    }

    /// Whether any slot still has units to sell.
    pub fn has_stock(&self) -> bool {
        self.slots
            .iter()
            .flatten()
            .any(|slot| slot.in_stock())
    }

    // -------------------------------------------------------------------------
    // Customer operations
    // -------------------------------------------------------------------------

    /// Accepts one coin into the customer's balance.
    ///
    /// Returns `Ok(true)` if the coin was accepted and `Ok(false)` if it
    /// was not recognised; on rejection the balance is unchanged and the
    /// mechanics are expected to eject the coin. A rejected coin is a
    /// normal outcome, not an error.
    ///
    /// ## Errors
    /// [`VendError::MachineNotRunning`] while switched off: a machine that
    /// is off must never accept money.
    pub fn insert_coin(&mut self, pence: i64) -> VendResult<bool> {
        if !self.running {
            return Err(VendError::MachineNotRunning);
        }

        match self.user_balance.insert_pence(pence) {
            Ok(coin) => {
                debug!(%coin, balance = %self.user_balance.value(), "coin accepted");
                Ok(true)
            }
            Err(err) => {
                warn!(
                    %err,
                    balance = %self.user_balance.value(),
                    "coin rejected, ejecting"
                );
                Ok(false)
            }
        }
    }

    /// Sells the item at `location` and returns the sale receipt.
    ///
    /// A single indivisible operation: any failure leaves bank, balance and
    /// stock exactly as they were, so the customer can add coins or pick a
    /// different item. On success the customer's whole balance moves into
    /// the bank and the change comes back out of it.
    ///
    /// ## Errors
    /// - [`VendError::MachineNotRunning`] while switched off
    /// - [`VendError::OutOfStock`] if no slot exists there (including
    ///   locations outside the alphabet) or its quantity is zero
    /// - [`VendError::InsufficientFunds`] if the balance does not cover
    ///   the price
    /// - [`VendError::InsufficientChange`] if bank plus balance cannot
    ///   compose the change due
    pub fn vend(&mut self, location: char) -> VendResult<SaleReceipt> {
        if !self.running {
            return Err(VendError::MachineNotRunning);
        }

        // Step 1: resolve the slot. An unconfigured or out-of-alphabet
        // location has nothing to sell.
        let price = match location_index(location).and_then(|idx| self.slots[idx].as_ref()) {
            Some(slot) if slot.in_stock() => slot.price(),
            _ => {
                warn!(location = %location, "item is out of stock, please try another item");
                return Err(VendError::OutOfStock { location });
            }
        };

        // Step 2: funds.
        let credit = self.user_balance.value();
        if credit < price {
            let short = price - credit;
            warn!(location = %location, %price, %short, "insufficient funds for item");
            return Err(VendError::InsufficientFunds { price, short });
        }

        // Step 3: what the customer is owed back.
        let change_due = credit - price;

        // Step 4: feasibility against bank ∪ balance, on disposable copies.
        // The combined projection matters: the customer's own coins may be
        // exactly what completes the change.
        if !self.can_make_exact_combined(change_due) {
            warn!(
                location = %location,
                %change_due,
                "cannot compose exact change, add smaller coins or choose another item"
            );
            return Err(VendError::InsufficientChange { change_due });
        }

        // Step 5: commit. From here on every mutation is guaranteed to
        // complete: funds are covered and the change draw is exact.
        let remaining = match location_index(location).and_then(|idx| self.slots[idx].as_mut()) {
            Some(slot) => {
                slot.take_one();
                slot.remaining()
            }
            // Unreachable: the slot resolved in step 1 and nothing has
            // changed since. Kept total rather than panicking.
            None => return Err(VendError::OutOfStock { location }),
        };

        self.bank.merge_from(&mut self.user_balance);
        let change = match self.bank.make_change(change_due) {
            Ok(change) => change,
            // Unreachable for the same reason: step 4 ran the identical
            // decomposition over the identical coin mix.
            Err(_) => return Err(VendError::InsufficientChange { change_due }),
        };

        let receipt = SaleReceipt {
            location,
            price,
            remaining,
            change,
            sold_at: Utc::now(),
        };
        info!(
            location = %location,
            %price,
            remaining,
            change = %receipt.change,
            "sold item"
        );

        // Step 6: the last sale empties the machine, so switch off.
        if !self.has_stock() {
            warn!("last sale emptied the machine, switching off");
            self.turn_off();
        }

        Ok(receipt)
    }

    /// Cancels the in-progress transaction and hands the customer's coins
    /// back. Available in any machine state; always succeeds.
    ///
    /// The balance is never folded into the bank: repeated insert/cancel
    /// cycles would otherwise let a customer swap unwanted denominations
    /// into the machine's reserve.
    pub fn coin_return(&mut self) -> CoinStore {
        let returned = std::mem::take(&mut self.user_balance);
        info!(returned = %returned, "cancelled vend, returning balance");
        returned
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Would the bank, after receiving the customer's coins, be able to
    /// supply exact change for `amount`? Works on disposable copies so
    /// that neither store is touched.
    fn can_make_exact_combined(&self, amount: Money) -> bool {
        let mut projection = self.bank.clone();
        let mut held = self.user_balance.clone();
        projection.merge_from(&mut held);
        projection.can_make_exact(amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coins::Coin;
    use crate::stock::{StockDefinition, VecStockLoader};

    fn def(location: char, price_pence: i64, quantity: u32) -> StockDefinition {
        StockDefinition {
            location,
            price_pence,
            quantity,
        }
    }

    /// A=60p(qty2), B=100p(qty2), C=170p(qty2)
    fn stock_loader() -> VecStockLoader {
        VecStockLoader::new(vec![def('A', 60, 2), def('B', 100, 2), def('C', 170, 2)])
    }

    fn machine_with_bank(bank: CoinStore) -> VendingMachine {
        VendingMachine::new(stock_loader(), bank).unwrap()
    }

    #[test]
    fn test_construct_no_definitions_fails() {
        let result = VendingMachine::new(VecStockLoader::new(vec![]), CoinStore::new());
        assert!(matches!(result, Err(ConfigError::EmptyMachine)));
    }

    #[test]
    fn test_construct_all_zero_quantities_fails() {
        let loader = VecStockLoader::new(vec![def('A', 60, 0), def('B', 100, 0)]);
        let result = VendingMachine::new(loader, CoinStore::new());
        assert!(matches!(result, Err(ConfigError::EmptyMachine)));
    }

    #[test]
    fn test_construct_duplicate_location_fails() {
        let loader = VecStockLoader::new(vec![def('A', 10, 5), def('A', 20, 3)]);
        let result = VendingMachine::new(loader, CoinStore::new());
        assert!(matches!(result, Err(ConfigError::DuplicateLocation('A'))));
    }

    #[test]
    fn test_construct_invalid_location_fails() {
        let loader = VecStockLoader::new(vec![def('a', 10, 5)]);
        let result = VendingMachine::new(loader, CoinStore::new());
        assert!(matches!(result, Err(ConfigError::InvalidLocation('a'))));
    }

    #[test]
    fn test_construct_invalid_price_fails() {
        // 9p is not a multiple of the smallest (10p) coin
        let loader = VecStockLoader::new(vec![def('A', 9, 5)]);
        let result = VendingMachine::new(loader, CoinStore::new());
        assert!(matches!(
            result,
            Err(ConfigError::InvalidPrice { location: 'A', .. })
        ));
    }

    #[test]
    fn test_default_state_is_off() {
        let machine = machine_with_bank(CoinStore::new());
        assert!(!machine.is_running());
    }

    #[test]
    fn test_turns_on_and_off() {
        let mut machine = machine_with_bank(CoinStore::new());
        machine.turn_on();
        assert!(machine.is_running());
        machine.turn_off();
        assert!(!machine.is_running());
    }

    #[test]
    fn test_insert_coin_while_off_fails() {
        let mut machine = machine_with_bank(CoinStore::new());
        assert_eq!(machine.insert_coin(100), Err(VendError::MachineNotRunning));
        assert_eq!(machine.user_balance_value(), Money::zero());
    }

    #[test]
    fn test_vend_while_off_fails() {
        let mut machine = machine_with_bank(CoinStore::with_counts(5, 5, 5, 5));
        assert!(matches!(
            machine.vend('A'),
            Err(VendError::MachineNotRunning)
        ));
    }

    #[test]
    fn test_insert_coin_rejects_foreign_coin() {
        let mut machine = machine_with_bank(CoinStore::new());
        machine.turn_on();

        assert_eq!(machine.insert_coin(100), Ok(true));
        // A 7p coin is not in the catalog: rejected, balance untouched
        assert_eq!(machine.insert_coin(7), Ok(false));
        assert_eq!(machine.user_balance_value(), Money::from_pence(100));
    }

    #[test]
    fn test_vend_success_with_change() {
        let mut machine = machine_with_bank(CoinStore::with_counts(5, 5, 1, 5));
        machine.turn_on();
        machine.insert_coin(100).unwrap();

        // £1 credit, 60p sale: 40p change as one 20p plus two 10p
        let receipt = machine.vend('A').unwrap();
        assert_eq!(receipt.location, 'A');
        assert_eq!(receipt.price, Money::from_pence(60));
        assert_eq!(receipt.remaining, 1);
        assert_eq!(receipt.change.value(), Money::from_pence(40));
        assert_eq!(receipt.change.count_of(Coin::Twenty), 1);
        assert_eq!(receipt.change.count_of(Coin::Ten), 2);
        // Balance is spent by a successful vend
        assert_eq!(machine.user_balance_value(), Money::zero());
    }

    #[test]
    fn test_vend_unknown_location_is_out_of_stock() {
        let mut machine = machine_with_bank(CoinStore::with_counts(5, 5, 5, 5));
        machine.turn_on();
        machine.insert_coin(100).unwrap();

        assert_eq!(machine.vend('Z'), Err(VendError::OutOfStock { location: 'Z' }));
        assert_eq!(machine.vend('5'), Err(VendError::OutOfStock { location: '5' }));
        assert_eq!(machine.user_balance_value(), Money::from_pence(100));
    }

    #[test]
    fn test_vend_insufficient_funds_keeps_balance() {
        let mut machine = machine_with_bank(CoinStore::with_counts(5, 5, 5, 5));
        machine.turn_on();
        machine.insert_coin(100).unwrap();

        // C costs £1.70
        assert_eq!(
            machine.vend('C'),
            Err(VendError::InsufficientFunds {
                price: Money::from_pence(170),
                short: Money::from_pence(70),
            })
        );

        // The balance survived: buy something cheaper with it
        assert!(machine.vend('A').is_ok());
    }

    #[test]
    fn test_vend_insufficient_change_keeps_everything() {
        // Empty bank; the only coin in the whole machine is this £1
        let mut machine = machine_with_bank(CoinStore::new());
        machine.turn_on();
        machine.insert_coin(100).unwrap();

        // 60p item would need 40p change that nothing can compose
        assert_eq!(
            machine.vend('A'),
            Err(VendError::InsufficientChange {
                change_due: Money::from_pence(40),
            })
        );
        assert_eq!(machine.user_balance_value(), Money::from_pence(100));
        assert_eq!(machine.bank.value(), Money::zero());

        // Exact coinage for the £1 item bypasses the change question
        let receipt = machine.vend('B').unwrap();
        assert_eq!(receipt.change.value(), Money::zero());
        assert!(receipt.change.is_empty());
    }

    #[test]
    fn test_failed_vend_leaves_stock_untouched() {
        let mut machine = machine_with_bank(CoinStore::new());
        machine.turn_on();
        machine.insert_coin(100).unwrap();

        assert!(machine.vend('A').is_err()); // InsufficientChange

        // Slot A still holds both units: sell them for exact coinage
        machine.coin_return();
        machine.insert_coin(50).unwrap();
        machine.insert_coin(10).unwrap();
        assert_eq!(machine.vend('A').unwrap().remaining, 1);
    }

    #[test]
    fn test_customer_coins_complete_the_change() {
        // Bank holds one 50p; customer pays 60p item with 50+20+10.
        // Change due is 20p, and only the customer's own 20p can supply it.
        let loader = VecStockLoader::new(vec![def('A', 60, 1)]);
        let mut machine =
            VendingMachine::new(loader, CoinStore::with_counts(0, 1, 0, 0)).unwrap();
        machine.turn_on();
        machine.insert_coin(50).unwrap();
        machine.insert_coin(20).unwrap();
        machine.insert_coin(10).unwrap();

        let receipt = machine.vend('A').unwrap();
        assert_eq!(receipt.change.value(), Money::from_pence(20));
        assert_eq!(receipt.change.count_of(Coin::Twenty), 1);
    }

    #[test]
    fn test_item_sells_out_but_machine_stays_on() {
        let mut machine = machine_with_bank(CoinStore::with_counts(100, 100, 100, 100));
        machine.turn_on();

        machine.insert_coin(100).unwrap();
        assert!(machine.vend('A').is_ok()); // 2 -> 1
        machine.insert_coin(100).unwrap();
        assert!(machine.vend('A').is_ok()); // 1 -> 0

        machine.insert_coin(100).unwrap();
        assert_eq!(machine.vend('A'), Err(VendError::OutOfStock { location: 'A' }));

        // Balance survived the failed vend; B costs exactly £1
        let receipt = machine.vend('B').unwrap();
        assert!(receipt.change.is_empty());
        assert!(machine.is_running());
    }

    #[test]
    fn test_machine_sells_out_and_switches_off() {
        let mut machine = machine_with_bank(CoinStore::with_counts(100, 100, 100, 100));
        machine.turn_on();

        // Sell out A (60p) and B (£1)
        for _ in 0..2 {
            machine.insert_coin(100).unwrap();
            machine.vend('A').unwrap();
        }
        for _ in 0..2 {
            machine.insert_coin(100).unwrap();
            machine.vend('B').unwrap();
        }

        // Sell out C (£1.70): still on after the first
        machine.insert_coin(100).unwrap();
        machine.insert_coin(100).unwrap();
        machine.vend('C').unwrap();
        assert!(machine.is_running());

        machine.insert_coin(100).unwrap();
        machine.insert_coin(100).unwrap();
        machine.vend('C').unwrap();
        assert!(!machine.is_running());
        assert!(!machine.has_stock());

        // And a switched-off machine takes no more money
        assert_eq!(machine.insert_coin(100), Err(VendError::MachineNotRunning));
    }

    #[test]
    fn test_coin_return() {
        let mut machine = machine_with_bank(CoinStore::new());
        machine.turn_on();

        machine.insert_coin(100).unwrap();
        machine.insert_coin(50).unwrap();
        assert_eq!(machine.user_balance_value(), Money::from_pence(150));

        let returned = machine.coin_return();
        assert_eq!(returned.value(), Money::from_pence(150));
        assert_eq!(returned.count_of(Coin::Pound), 1);
        assert_eq!(returned.count_of(Coin::Fifty), 1);
        assert_eq!(machine.user_balance_value(), Money::zero());

        // Never merged into the bank
        assert_eq!(machine.bank.value(), Money::zero());
    }

    #[test]
    fn test_coin_return_works_while_off() {
        let mut machine = machine_with_bank(CoinStore::new());
        machine.turn_on();
        machine.insert_coin(100).unwrap();
        machine.turn_off();

        let returned = machine.coin_return();
        assert_eq!(returned.value(), Money::from_pence(100));
    }

    #[test]
    fn test_currency_is_conserved() {
        // bank + user balance + issued change must equal the initial float
        // plus every accepted deposit, across any operation sequence.
        let initial_bank = CoinStore::with_counts(5, 5, 1, 5);
        let initial_value = initial_bank.value();
        let mut machine = machine_with_bank(initial_bank);
        machine.turn_on();

        let mut deposited = Money::zero();
        let mut dispensed = Money::zero();

        let mut deposit = |machine: &mut VendingMachine, pence: i64| {
            if machine.insert_coin(pence) == Ok(true) {
                deposited += Money::from_pence(pence);
            }
        };

        deposit(&mut machine, 100);
        deposit(&mut machine, 7); // rejected
        let _ = machine.vend('C'); // fails: short 70p
        if let Ok(receipt) = machine.vend('A') {
            dispensed += receipt.change.value();
        }

        deposit(&mut machine, 50);
        deposit(&mut machine, 20);
        dispensed += machine.coin_return().value();

        deposit(&mut machine, 100);
        if let Ok(receipt) = machine.vend('B') {
            dispensed += receipt.change.value();
        }

        assert_eq!(
            machine.bank.value() + machine.user_balance_value() + dispensed,
            initial_value + deposited
        );
    }
}
