// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-user, per-currency balance table.
//!
//! Balances are never negative. Administrative adjustments clamp decreases
//! at zero; the transaction state machine rejects underflowing debits with
//! `InsufficientBalance` before calling in here.

use crate::errors::Result;
use crate::store;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

/// Balance for (user, currency); an absent row reads as zero.
pub fn balance_of(conn: &Connection, user_id: i64, currency: &str) -> Result<Decimal> {
    let amount = conn
        .query_row(
            "SELECT amount FROM balances WHERE user_id=?1 AND currency=?2",
            params![user_id, currency],
            |r| store::dec_col(r, 0),
        )
        .optional()?;
    Ok(amount.unwrap_or(Decimal::ZERO))
}

/// Apply `balance = max(0, balance + delta)` and return the new balance.
///
/// Decreases past zero clamp rather than fail; this is the admin-adjustment
/// policy (see DESIGN.md).
pub fn adjust(conn: &Connection, user_id: i64, currency: &str, delta: Decimal) -> Result<Decimal> {
    let current = balance_of(conn, user_id, currency)?;
    let next = (current + delta).max(Decimal::ZERO);
    conn.execute(
        "INSERT INTO balances(user_id, currency, amount) VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id, currency) DO UPDATE SET amount=excluded.amount",
        params![user_id, currency, next.to_string()],
    )?;
    Ok(next)
}

/// Debit used by the transaction state machine inside its critical section.
/// The caller has already verified sufficiency.
pub(crate) fn debit(conn: &Connection, user_id: i64, currency: &str, amount: Decimal) -> Result<Decimal> {
    adjust(conn, user_id, currency, -amount)
}

/// Credit counterpart of [`debit`].
pub(crate) fn credit(conn: &Connection, user_id: i64, currency: &str, amount: Decimal) -> Result<Decimal> {
    adjust(conn, user_id, currency, amount)
}
