// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Notification emitter.
//!
//! `dispatch` drains the events a state transition returned and persists one
//! notification per event. Emission runs after the transition has committed;
//! a failed insert is logged and never propagated, so a notification problem
//! can never undo a transfer.

use crate::errors::Result;
use crate::models::{Notification, NotificationKind};
use crate::services::WalletEvent;
use crate::store;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use tracing::warn;

pub fn emit(
    conn: &Connection,
    user_id: i64,
    kind: NotificationKind,
    title: &str,
    message: &str,
    transaction_id: Option<i64>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO notifications(user_id, kind, title, message, created_at, read, transaction_id)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
        params![
            user_id,
            kind.as_str(),
            title,
            message,
            store::ts(&store::now()),
            transaction_id
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Symbol for message text; falls back to the uppercased id for unknown
/// currencies rather than failing the dispatch.
fn symbol_for(conn: &Connection, currency: &str) -> String {
    match store::get_currency(conn, currency) {
        Ok(c) => c.symbol,
        Err(_) => currency.to_uppercase(),
    }
}

fn render(conn: &Connection, event: &WalletEvent) -> (i64, NotificationKind, String, String, Option<i64>) {
    let amt = |a: &Decimal, ccy: &str| format!("{} {}", a.normalize(), symbol_for(conn, ccy));
    match event {
        WalletEvent::TransactionPending { user_id, transaction_id, amount, currency } => (
            *user_id,
            NotificationKind::Transaction,
            "Transaction Pending".to_string(),
            format!(
                "Your transaction of {} is pending approval.",
                amt(amount, currency)
            ),
            Some(*transaction_id),
        ),
        WalletEvent::TransactionApproved { user_id, transaction_id, amount, currency } => (
            *user_id,
            NotificationKind::Transaction,
            "Transaction Approved".to_string(),
            format!(
                "Your transaction of {} has been approved.",
                amt(amount, currency)
            ),
            Some(*transaction_id),
        ),
        WalletEvent::TransactionReceived { user_id, transaction_id, amount, currency } => (
            *user_id,
            NotificationKind::Transaction,
            "Funds Received".to_string(),
            format!("You have received {}.", amt(amount, currency)),
            Some(*transaction_id),
        ),
        WalletEvent::TransactionRejected { user_id, transaction_id, amount, currency, reason } => (
            *user_id,
            NotificationKind::Transaction,
            "Transaction Rejected".to_string(),
            format!(
                "Your transaction of {} was rejected. Reason: {}",
                amt(amount, currency),
                reason
            ),
            Some(*transaction_id),
        ),
        WalletEvent::KycSubmitted { user_id } => (
            *user_id,
            NotificationKind::Kyc,
            "KYC Submitted".to_string(),
            "Your identity verification has been submitted and is under review.".to_string(),
            None,
        ),
        WalletEvent::KycApproved { user_id } => (
            *user_id,
            NotificationKind::Kyc,
            "KYC Verified".to_string(),
            "Your identity has been verified. You can now send funds.".to_string(),
            None,
        ),
        WalletEvent::KycRejected { user_id, reason } => (
            *user_id,
            NotificationKind::Kyc,
            "KYC Rejected".to_string(),
            format!("Your identity verification was rejected. Reason: {}", reason),
            None,
        ),
    }
}

/// Fire-and-forget delivery of transition events. Best effort: each failure
/// is logged and the rest of the batch still goes out.
pub fn dispatch(conn: &Connection, events: &[WalletEvent]) {
    for event in events {
        let (user_id, kind, title, message, tx_id) = render(conn, event);
        if let Err(e) = emit(conn, user_id, kind, &title, &message, tx_id) {
            warn!(user_id, ?event, error = %e, "failed to emit notification");
        }
    }
}

pub fn get_by_user(conn: &Connection, user_id: i64) -> Result<Vec<Notification>> {
    store::list_notifications_for_user(conn, user_id)
}

/// Idempotent: marking an already-read notification is a no-op.
pub fn mark_read(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("UPDATE notifications SET read=1 WHERE id=?1", params![id])?;
    Ok(())
}

/// Idempotent: a second call leaves the unread count at zero without error.
pub fn mark_all_read(conn: &Connection, user_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE notifications SET read=1 WHERE user_id=?1",
        params![user_id],
    )?;
    Ok(())
}

pub fn unread_count(conn: &Connection, user_id: i64) -> Result<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM notifications WHERE user_id=?1 AND read=0",
        params![user_id],
        |r| r.get(0),
    )?;
    Ok(n)
}
