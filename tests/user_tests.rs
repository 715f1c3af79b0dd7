// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use coinkeep::db;
use coinkeep::errors::WalletError;
use coinkeep::models::KycStatus;
use coinkeep::services::{currencies, users};
use coinkeep::store;
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    currencies::seed_defaults(&conn).unwrap();
    conn
}

#[test]
fn register_starts_unverified_with_empty_wallets() {
    let conn = setup();
    let user = users::register(&conn, "A", "a@example.com").unwrap();
    assert_eq!(user.kyc_status, KycStatus::Unverified);
    assert!(!user.is_admin);
    assert!(user.balances.is_empty());
    // One empty address slot per catalog currency.
    assert_eq!(user.wallet_addresses.len(), 3);
    assert!(user.wallet_addresses.values().all(|a| a.is_empty()));
}

#[test]
fn register_rejects_duplicate_email() {
    let conn = setup();
    users::register(&conn, "A", "a@example.com").unwrap();
    let err = users::register(&conn, "Other A", "a@example.com").unwrap_err();
    assert!(matches!(err, WalletError::EmailInUse));
}

#[test]
fn update_profile_checks_email_ownership() {
    let conn = setup();
    let a = users::register(&conn, "A", "a@example.com").unwrap();
    users::register(&conn, "B", "b@example.com").unwrap();

    let err = users::update_profile(&conn, a.id, None, Some("b@example.com")).unwrap_err();
    assert!(matches!(err, WalletError::EmailInUse));

    // Keeping your own email is fine; so is a fresh one.
    users::update_profile(&conn, a.id, Some("A renamed"), Some("a@example.com")).unwrap();
    let a = users::update_profile(&conn, a.id, None, Some("a2@example.com")).unwrap();
    assert_eq!(a.name, "A renamed");
    assert_eq!(a.email, "a2@example.com");
}

#[test]
fn generated_address_is_persisted_and_resolvable() {
    let conn = setup();
    let user = users::register(&conn, "A", "a@example.com").unwrap();
    let address = users::generate_address(&conn, user.id, "btc").unwrap();
    assert!(address.starts_with("0x"));
    assert_eq!(address.len(), 42);

    let owner = store::find_user_by_address(&conn, &address, "btc").unwrap();
    assert_eq!(owner, Some(user.id));
    // Scoped per currency.
    assert_eq!(store::find_user_by_address(&conn, &address, "eth").unwrap(), None);

    let user = users::get_by_id(&conn, user.id).unwrap();
    assert_eq!(user.wallet_addresses.get("btc").unwrap(), &address);
}

#[test]
fn set_admin_toggles_flag() {
    let conn = setup();
    let user = users::register(&conn, "A", "a@example.com").unwrap();
    let user = users::set_admin(&conn, user.id, true).unwrap();
    assert!(user.is_admin);
    let user = users::set_admin(&conn, user.id, false).unwrap();
    assert!(!user.is_admin);

    let err = users::set_admin(&conn, 999, true).unwrap_err();
    assert!(matches!(err, WalletError::NotFound("user")));
}
