// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Currency registry: a flat mutable table, seeded at init and mutated
//! only by administrative rate updates.

use crate::errors::{Result, WalletError};
use crate::models::Currency;
use crate::store;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

/// Seed the default catalog. Existing rows are left untouched so rate
/// updates survive re-running `init`.
pub fn seed_defaults(conn: &Connection) -> Result<()> {
    let defaults = [
        ("btc", "Bitcoin", "BTC", 8u32, "40000"),
        ("eth", "Ethereum", "ETH", 18, "2000"),
        ("usdt", "Tether", "USDT", 6, "1"),
    ];
    for (id, name, symbol, decimals, rate) in defaults {
        conn.execute(
            "INSERT OR IGNORE INTO currencies(id, name, symbol, decimals, exchange_rate)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, name, symbol, decimals, rate],
        )?;
    }
    Ok(())
}

pub fn get_all(conn: &Connection) -> Result<Vec<Currency>> {
    store::list_currencies(conn)
}

pub fn get_by_id(conn: &Connection, id: &str) -> Result<Currency> {
    store::get_currency(conn, id)
}

/// Set the USD rate for a currency. The rate must be positive.
pub fn update_exchange_rate(conn: &Connection, id: &str, rate: Decimal) -> Result<Currency> {
    if rate <= Decimal::ZERO {
        return Err(WalletError::InvalidRate);
    }
    let n = conn.execute(
        "UPDATE currencies SET exchange_rate=?1 WHERE id=?2",
        params![rate.to_string(), id],
    )?;
    if n == 0 {
        return Err(WalletError::NotFound("currency"));
    }
    store::get_currency(conn, id)
}
