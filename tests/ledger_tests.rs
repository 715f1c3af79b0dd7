// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use coinkeep::db;
use coinkeep::errors::WalletError;
use coinkeep::services::{currencies, ledger, users};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn setup() -> (Connection, i64) {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    currencies::seed_defaults(&conn).unwrap();
    let user = users::register(&conn, "A", "a@example.com").unwrap();
    (conn, user.id)
}

#[test]
fn absent_balance_reads_zero() {
    let (conn, user) = setup();
    assert_eq!(ledger::balance_of(&conn, user, "btc").unwrap(), Decimal::ZERO);
    // Unknown currency ids read zero too; the registry check lives upstream.
    assert_eq!(ledger::balance_of(&conn, user, "doge").unwrap(), Decimal::ZERO);
}

#[test]
fn adjust_accumulates_deltas() {
    let (conn, user) = setup();
    assert_eq!(ledger::adjust(&conn, user, "btc", d("1.5")).unwrap(), d("1.5"));
    assert_eq!(ledger::adjust(&conn, user, "btc", d("-0.25")).unwrap(), d("1.25"));
    assert_eq!(ledger::balance_of(&conn, user, "btc").unwrap(), d("1.25"));
    // Other currencies are untouched.
    assert_eq!(ledger::balance_of(&conn, user, "eth").unwrap(), Decimal::ZERO);
}

#[test]
fn adjust_clamps_decrease_at_zero() {
    let (conn, user) = setup();
    ledger::adjust(&conn, user, "btc", d("0.3")).unwrap();
    assert_eq!(ledger::adjust(&conn, user, "btc", d("-2")).unwrap(), Decimal::ZERO);
    assert_eq!(ledger::balance_of(&conn, user, "btc").unwrap(), Decimal::ZERO);
}

#[test]
fn admin_update_balance_returns_user_with_new_balances() {
    let (conn, user) = setup();
    let updated = users::update_balance(&conn, user, "usdt", d("500")).unwrap();
    assert_eq!(updated.balances.get("usdt").copied().unwrap(), d("500"));

    let updated = users::update_balance(&conn, user, "usdt", d("-9999")).unwrap();
    assert_eq!(updated.balances.get("usdt").copied().unwrap(), Decimal::ZERO);
}

#[test]
fn admin_update_balance_validates_user_and_currency() {
    let (conn, user) = setup();
    let err = users::update_balance(&conn, 999, "btc", d("1")).unwrap_err();
    assert!(matches!(err, WalletError::NotFound("user")));
    let err = users::update_balance(&conn, user, "doge", d("1")).unwrap_err();
    assert!(matches!(err, WalletError::NotFound("currency")));
}
