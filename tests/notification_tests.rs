// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use coinkeep::db;
use coinkeep::models::NotificationKind;
use coinkeep::services::{currencies, kyc, notifications, transactions, users};
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

fn submission() -> kyc::KycSubmission {
    kyc::KycSubmission {
        full_name: "A".to_string(),
        date_of_birth: "1990-01-01".to_string(),
        address: "1 Demo Street".to_string(),
        id_type: "passport".to_string(),
        id_number: "P1".to_string(),
        id_front_image: "f.jpg".to_string(),
        id_back_image: "b.jpg".to_string(),
        selfie_image: "s.jpg".to_string(),
    }
}

fn verified_sender(conn: &Connection) -> (i64, String) {
    let user = users::register(conn, "A", "a@example.com").unwrap();
    let (_, events) = kyc::submit(conn, user.id, &submission()).unwrap();
    notifications::dispatch(conn, &events);
    let (_, events) = kyc::approve(conn, user.id).unwrap();
    notifications::dispatch(conn, &events);
    let addr = users::generate_address(conn, user.id, "btc").unwrap();
    users::update_balance(conn, user.id, "btc", d("1")).unwrap();
    (user.id, addr)
}

#[test]
fn transitions_emit_one_notification_per_actor() {
    let mut conn = setup();
    let (a, addr_a) = verified_sender(&conn);
    let b = users::register(&conn, "B", "b@example.com").unwrap();
    let addr_b = users::generate_address(&conn, b.id, "btc").unwrap();

    // KYC submit + approve already produced two notifications for A.
    assert_eq!(notifications::unread_count(&conn, a).unwrap(), 2);

    let req = transactions::CreateRequest {
        from_address: addr_a,
        to_address: addr_b,
        amount: d("0.4"),
        currency: "btc".to_string(),
        description: None,
        from_user_id: Some(a),
    };
    let (tx, events) = transactions::create(&conn, &req).unwrap();
    notifications::dispatch(&conn, &events);
    assert_eq!(notifications::unread_count(&conn, a).unwrap(), 3);

    let (_, events) = transactions::approve(&mut conn, tx.id).unwrap();
    notifications::dispatch(&conn, &events);
    assert_eq!(notifications::unread_count(&conn, a).unwrap(), 4);
    assert_eq!(notifications::unread_count(&conn, b.id).unwrap(), 1);

    let received = notifications::get_by_user(&conn, b.id).unwrap();
    assert_eq!(received[0].kind, NotificationKind::Transaction);
    assert_eq!(received[0].transaction_id, Some(tx.id));
    assert!(received[0].message.contains("0.4 BTC"));
}

#[test]
fn rejection_notification_carries_reason_verbatim() {
    let mut conn = setup();
    let (a, addr_a) = verified_sender(&conn);
    notifications::mark_all_read(&conn, a).unwrap();

    let req = transactions::CreateRequest {
        from_address: addr_a,
        to_address: "0xdead".to_string(),
        amount: d("0.4"),
        currency: "btc".to_string(),
        description: None,
        from_user_id: Some(a),
    };
    let (tx, _) = transactions::create(&conn, &req).unwrap();
    let (_, events) = transactions::reject(&mut conn, tx.id, "Insufficient funds").unwrap();
    notifications::dispatch(&conn, &events);

    let latest = &notifications::get_by_user(&conn, a).unwrap()[0];
    assert_eq!(latest.title, "Transaction Rejected");
    assert!(latest.message.contains("Reason: Insufficient funds"));
}

#[test]
fn kyc_events_use_kyc_kind() {
    let conn = setup();
    let user = users::register(&conn, "A", "a@example.com").unwrap();
    let (_, events) = kyc::submit(&conn, user.id, &submission()).unwrap();
    notifications::dispatch(&conn, &events);
    let (_, events) = kyc::reject(&conn, user.id, "Blurry selfie").unwrap();
    notifications::dispatch(&conn, &events);

    let all = notifications::get_by_user(&conn, user.id).unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|n| n.kind == NotificationKind::Kyc));
    assert!(all.iter().any(|n| n.message.contains("Blurry selfie")));
}

#[test]
fn mark_read_operations_are_idempotent() {
    let conn = setup();
    let user = users::register(&conn, "A", "a@example.com").unwrap();
    let id = notifications::emit(
        &conn,
        user.id,
        NotificationKind::System,
        "Welcome",
        "Welcome to the wallet.",
        None,
    )
    .unwrap();
    assert_eq!(notifications::unread_count(&conn, user.id).unwrap(), 1);

    notifications::mark_read(&conn, id).unwrap();
    notifications::mark_read(&conn, id).unwrap();
    assert_eq!(notifications::unread_count(&conn, user.id).unwrap(), 0);

    notifications::mark_all_read(&conn, user.id).unwrap();
    notifications::mark_all_read(&conn, user.id).unwrap();
    assert_eq!(notifications::unread_count(&conn, user.id).unwrap(), 0);
}

#[test]
fn dispatch_failure_does_not_propagate() {
    let conn = setup();
    let (a, addr_a) = verified_sender(&conn);
    let req = transactions::CreateRequest {
        from_address: addr_a,
        to_address: "0xdead".to_string(),
        amount: d("0.1"),
        currency: "btc".to_string(),
        description: None,
        from_user_id: Some(a),
    };
    let (tx, events) = transactions::create(&conn, &req).unwrap();

    // Sabotage the sink: dispatch must stay silent and the transition stands.
    conn.execute_batch("DROP TABLE notifications;").unwrap();
    notifications::dispatch(&conn, &events);
    assert_eq!(
        transactions::get_by_id(&conn, tx.id).unwrap().id,
        tx.id
    );
}
