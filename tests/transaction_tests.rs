// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use coinkeep::db;
use coinkeep::errors::WalletError;
use coinkeep::models::TxStatus;
use coinkeep::services::{currencies, kyc, ledger, transactions, users};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    currencies::seed_defaults(&conn).unwrap();
    conn
}

fn submission(name: &str) -> kyc::KycSubmission {
    kyc::KycSubmission {
        full_name: name.to_string(),
        date_of_birth: "1990-01-01".to_string(),
        address: "1 Demo Street".to_string(),
        id_type: "passport".to_string(),
        id_number: "P1234567".to_string(),
        id_front_image: "front.jpg".to_string(),
        id_back_image: "back.jpg".to_string(),
        selfie_image: "selfie.jpg".to_string(),
    }
}

/// Registered, KYC-verified user with a BTC address and the given balance.
fn verified_user(conn: &Connection, name: &str, email: &str, btc: &str) -> (i64, String) {
    let user = users::register(conn, name, email).unwrap();
    kyc::submit(conn, user.id, &submission(name)).unwrap();
    kyc::approve(conn, user.id).unwrap();
    let address = users::generate_address(conn, user.id, "btc").unwrap();
    if btc != "0" {
        users::update_balance(conn, user.id, "btc", d(btc)).unwrap();
    }
    (user.id, address)
}

fn send_btc(
    conn: &Connection,
    from_user: i64,
    from: &str,
    to: &str,
    amount: &str,
) -> Result<coinkeep::models::Transaction, WalletError> {
    let req = transactions::CreateRequest {
        from_address: from.to_string(),
        to_address: to.to_string(),
        amount: d(amount),
        currency: "btc".to_string(),
        description: None,
        from_user_id: Some(from_user),
    };
    transactions::create(conn, &req).map(|(tx, _)| tx)
}

#[test]
fn create_rejects_non_positive_amount() {
    let conn = setup();
    let (a, addr_a) = verified_user(&conn, "A", "a@example.com", "1");
    for amount in ["0", "-0.5"] {
        let err = send_btc(&conn, a, &addr_a, "0xdead", amount).unwrap_err();
        assert!(matches!(err, WalletError::InvalidAmount));
    }
}

#[test]
fn create_requires_verified_kyc() {
    let conn = setup();
    let user = users::register(&conn, "A", "a@example.com").unwrap();
    let addr = users::generate_address(&conn, user.id, "btc").unwrap();
    // Plenty of balance; the gate is KYC alone.
    users::update_balance(&conn, user.id, "btc", d("10")).unwrap();

    let err = send_btc(&conn, user.id, &addr, "0xdead", "0.1").unwrap_err();
    assert!(matches!(err, WalletError::KycRequired));

    // Pending KYC is still not verified.
    kyc::submit(&conn, user.id, &submission("A")).unwrap();
    let err = send_btc(&conn, user.id, &addr, "0xdead", "0.1").unwrap_err();
    assert!(matches!(err, WalletError::KycRequired));
}

#[test]
fn create_rejects_unknown_currency() {
    let conn = setup();
    let (a, addr_a) = verified_user(&conn, "A", "a@example.com", "1");
    let req = transactions::CreateRequest {
        from_address: addr_a,
        to_address: "0xdead".to_string(),
        amount: d("1"),
        currency: "doge".to_string(),
        description: None,
        from_user_id: Some(a),
    };
    let err = transactions::create(&conn, &req).unwrap_err();
    assert!(matches!(err, WalletError::NotFound("currency")));
}

#[test]
fn create_resolves_sender_by_address() {
    let conn = setup();
    let (_, addr_a) = verified_user(&conn, "A", "a@example.com", "1");
    let req = transactions::CreateRequest {
        from_address: addr_a,
        to_address: "0xdead".to_string(),
        amount: d("0.2"),
        currency: "btc".to_string(),
        description: None,
        from_user_id: None,
    };
    let (tx, events) = transactions::create(&conn, &req).unwrap();
    assert_eq!(tx.status, TxStatus::Pending);
    assert!(tx.from_user_id.is_some());
    assert_eq!(events.len(), 1);
}

#[test]
fn approve_moves_funds_between_wallets() {
    let mut conn = setup();
    let (a, addr_a) = verified_user(&conn, "A", "a@example.com", "1");
    let (b, addr_b) = verified_user(&conn, "B", "b@example.com", "0");

    let tx = send_btc(&conn, a, &addr_a, &addr_b, "0.4").unwrap();
    assert_eq!(tx.status, TxStatus::Pending);

    let (approved, events) = transactions::approve(&mut conn, tx.id).unwrap();
    assert_eq!(approved.status, TxStatus::Approved);
    assert_eq!(approved.to_user_id, Some(b));
    assert_eq!(ledger::balance_of(&conn, a, "btc").unwrap(), d("0.6"));
    assert_eq!(ledger::balance_of(&conn, b, "btc").unwrap(), d("0.4"));
    // Sender "approved" plus receiver "received".
    assert_eq!(events.len(), 2);
}

#[test]
fn only_first_decision_wins() {
    let mut conn = setup();
    let (a, addr_a) = verified_user(&conn, "A", "a@example.com", "1");
    let (b, addr_b) = verified_user(&conn, "B", "b@example.com", "0");

    let tx = send_btc(&conn, a, &addr_a, &addr_b, "0.4").unwrap();
    transactions::approve(&mut conn, tx.id).unwrap();

    // A second approve must not double-credit.
    let err = transactions::approve(&mut conn, tx.id).unwrap_err();
    assert!(matches!(err, WalletError::InvalidState(_)));
    // Nor can an approved transfer be rejected.
    let err = transactions::reject(&mut conn, tx.id, "changed my mind").unwrap_err();
    assert!(matches!(err, WalletError::InvalidState(_)));

    assert_eq!(ledger::balance_of(&conn, a, "btc").unwrap(), d("0.6"));
    assert_eq!(ledger::balance_of(&conn, b, "btc").unwrap(), d("0.4"));
}

#[test]
fn reject_records_reason_and_leaves_balances() {
    let mut conn = setup();
    let (a, addr_a) = verified_user(&conn, "A", "a@example.com", "1");
    let (b, addr_b) = verified_user(&conn, "B", "b@example.com", "0");

    let tx = send_btc(&conn, a, &addr_a, &addr_b, "0.4").unwrap();
    let (rejected, _) = transactions::reject(&mut conn, tx.id, "Suspicious activity").unwrap();

    assert_eq!(rejected.status, TxStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Suspicious activity"));
    assert_eq!(ledger::balance_of(&conn, a, "btc").unwrap(), d("1"));
    assert_eq!(ledger::balance_of(&conn, b, "btc").unwrap(), d("0"));

    let err = transactions::approve(&mut conn, tx.id).unwrap_err();
    assert!(matches!(err, WalletError::InvalidState(_)));
}

#[test]
fn reject_requires_reason() {
    let mut conn = setup();
    let (a, addr_a) = verified_user(&conn, "A", "a@example.com", "1");
    let tx = send_btc(&conn, a, &addr_a, "0xdead", "0.4").unwrap();

    for reason in ["", "   "] {
        let err = transactions::reject(&mut conn, tx.id, reason).unwrap_err();
        assert!(matches!(err, WalletError::MissingReason));
    }
    assert_eq!(
        transactions::get_by_id(&conn, tx.id).unwrap().status,
        TxStatus::Pending
    );
}

#[test]
fn insufficient_balance_blocks_approval_not_creation() {
    let mut conn = setup();
    let (a, addr_a) = verified_user(&conn, "A", "a@example.com", "0.1");
    let (b, addr_b) = verified_user(&conn, "B", "b@example.com", "0");

    // Creation does not check balance; the admin queue is the gate.
    let tx = send_btc(&conn, a, &addr_a, &addr_b, "5.0").unwrap();
    assert_eq!(tx.status, TxStatus::Pending);

    let err = transactions::approve(&mut conn, tx.id).unwrap_err();
    assert!(matches!(err, WalletError::InsufficientBalance { .. }));

    // Nothing moved and the transfer is still pending for a later decision.
    assert_eq!(ledger::balance_of(&conn, a, "btc").unwrap(), d("0.1"));
    assert_eq!(ledger::balance_of(&conn, b, "btc").unwrap(), d("0"));
    assert_eq!(
        transactions::get_by_id(&conn, tx.id).unwrap().status,
        TxStatus::Pending
    );
}

#[test]
fn unknown_receiver_credit_is_noop() {
    let mut conn = setup();
    let (a, addr_a) = verified_user(&conn, "A", "a@example.com", "1");

    let tx = send_btc(&conn, a, &addr_a, "0xnobody", "0.4").unwrap();
    let (approved, events) = transactions::approve(&mut conn, tx.id).unwrap();

    assert_eq!(approved.status, TxStatus::Approved);
    assert_eq!(approved.to_user_id, None);
    assert_eq!(ledger::balance_of(&conn, a, "btc").unwrap(), d("0.6"));
    // Only the sender is notified; there is nobody to credit.
    assert_eq!(events.len(), 1);
}

#[test]
fn queries_cover_user_and_pending_views() {
    let mut conn = setup();
    let (a, addr_a) = verified_user(&conn, "A", "a@example.com", "2");
    let (b, addr_b) = verified_user(&conn, "B", "b@example.com", "0");

    let t1 = send_btc(&conn, a, &addr_a, &addr_b, "0.5").unwrap();
    let t2 = send_btc(&conn, a, &addr_a, &addr_b, "0.7").unwrap();
    transactions::approve(&mut conn, t1.id).unwrap();

    let pending = transactions::get_pending(&conn).unwrap();
    assert_eq!(pending.iter().map(|t| t.id).collect::<Vec<_>>(), vec![t2.id]);

    // Receiver sees both transfers; addresses resolved at creation.
    let for_b = transactions::get_by_user(&conn, b).unwrap();
    assert_eq!(for_b.len(), 2);
    assert!(for_b.iter().any(|t| t.id == t1.id));

    let for_a = transactions::get_by_user(&conn, a).unwrap();
    assert_eq!(for_a.len(), 2);

    let err = transactions::get_by_id(&conn, 9999).unwrap_err();
    assert!(matches!(err, WalletError::NotFound("transaction")));
}
