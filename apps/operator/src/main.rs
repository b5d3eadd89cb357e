//! # Operator Console
//!
//! Wires up a demo vending machine and runs a scripted customer session.
//!
//! ## Usage
//! ```bash
//! cargo run -p vendo-operator
//!
//! # With verbose core events
//! RUST_LOG=debug cargo run -p vendo-operator
//! ```
//!
//! The core emits operator messages as `tracing` events (`info!` for sales
//! and cancellations, `warn!` for shortfalls and rejections); this binary
//! just renders them to the console.

use tracing::info;
use tracing_subscriber::EnvFilter;

use vendo_core::{CoinStore, JsonStockLoader, VendingMachine};

/// Demo stock configuration, in the JSON shape `JsonStockLoader` accepts.
const STOCK_CONFIG: &str = r#"[
    { "location": "A", "price_pence": 60,  "quantity": 2 },
    { "location": "B", "price_pence": 100, "quantity": 2 },
    { "location": "C", "price_pence": 170, "quantity": 2 }
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Default to info so the machine's operator messages show up
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let loader = JsonStockLoader::from_json(STOCK_CONFIG)?;
    let mut machine = VendingMachine::new(loader, CoinStore::with_counts(5, 5, 1, 5))?;
    machine.turn_on();
    info!("machine is on, starting scripted session");

    // Customer 1: pays £1 for the 60p item at A, gets 40p change
    machine.insert_coin(100)?;
    if let Ok(receipt) = machine.vend('A') {
        info!(change = %receipt.change, "customer 1 served");
    }

    // Customer 2: tries the £1.70 item with £1 credit, then gives up
    machine.insert_coin(100)?;
    let _ = machine.vend('C');
    let returned = machine.coin_return();
    info!(returned = %returned, "customer 2 walked away");

    // Customer 3: slips in a foreign coin, then pays exact for B
    machine.insert_coin(7)?;
    machine.insert_coin(100)?;
    let _ = machine.vend('B');

    info!(balance = %machine.user_balance_value(), running = machine.is_running(), "session over");
    Ok(())
}
