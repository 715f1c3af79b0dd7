// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transfer state machine: `pending` -> `approved` | `rejected`.
//!
//! Both terminal states are final; the pending check inside the write
//! transaction is what makes a second decision on the same transfer fail
//! with `InvalidState` instead of double-applying ledger deltas.

use crate::errors::{Result, WalletError};
use crate::models::{KycStatus, Transaction, TxStatus};
use crate::services::{WalletEvent, ledger};
use crate::store;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub from_address: String,
    pub to_address: String,
    pub amount: Decimal,
    pub currency: String,
    pub description: Option<String>,
    /// When absent the sender is resolved by `from_address` lookup.
    pub from_user_id: Option<i64>,
}

/// Create a pending transfer.
///
/// Preconditions: positive amount, known currency, resolvable sender with
/// verified KYC. Balance sufficiency is deliberately NOT checked here; it is
/// enforced at approval (see DESIGN.md).
pub fn create(conn: &Connection, req: &CreateRequest) -> Result<(Transaction, Vec<WalletEvent>)> {
    if req.amount <= Decimal::ZERO {
        return Err(WalletError::InvalidAmount);
    }
    store::get_currency(conn, &req.currency)?;

    let sender_id = match req.from_user_id {
        Some(id) => id,
        None => store::find_user_by_address(conn, &req.from_address, &req.currency)?
            .ok_or(WalletError::NotFound("sender"))?,
    };
    let sender = store::get_user(conn, sender_id)?;
    if sender.kyc_status != KycStatus::Verified {
        return Err(WalletError::KycRequired);
    }

    let to_user_id = store::find_user_by_address(conn, &req.to_address, &req.currency)?;

    conn.execute(
        "INSERT INTO transactions(from_user_id, to_user_id, from_address, to_address, \
         amount, currency, status, created_at, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', ?7, ?8)",
        params![
            sender_id,
            to_user_id,
            req.from_address,
            req.to_address,
            req.amount.to_string(),
            req.currency,
            store::ts(&store::now()),
            req.description,
        ],
    )?;
    let transaction = store::get_transaction(conn, conn.last_insert_rowid())?;

    let events = vec![WalletEvent::TransactionPending {
        user_id: sender_id,
        transaction_id: transaction.id,
        amount: transaction.amount,
        currency: transaction.currency.clone(),
    }];
    Ok((transaction, events))
}

/// Approve a pending transfer, debiting the sender and crediting the
/// receiver atomically with the status write.
///
/// The read-validate-debit-credit-write sequence runs inside one SQLite
/// transaction, so concurrent approvals serialize and at most one sees
/// `pending`. A transfer exceeding the sender's balance fails with
/// `InsufficientBalance` and leaves everything untouched. A `to_address`
/// matching no wallet makes the credit a no-op (address-keyed ledger).
pub fn approve(conn: &mut Connection, id: i64) -> Result<(Transaction, Vec<WalletEvent>)> {
    let tx = conn.transaction()?;

    let transaction = store::get_transaction(&tx, id)?;
    if transaction.status != TxStatus::Pending {
        return Err(WalletError::InvalidState("transaction is not pending"));
    }

    let sender_id = match transaction.from_user_id {
        Some(uid) => uid,
        None => store::find_user_by_address(&tx, &transaction.from_address, &transaction.currency)?
            .ok_or(WalletError::NotFound("sender"))?,
    };
    let available = ledger::balance_of(&tx, sender_id, &transaction.currency)?;
    if available < transaction.amount {
        return Err(WalletError::InsufficientBalance {
            available,
            required: transaction.amount,
        });
    }

    let receiver_id =
        store::find_user_by_address(&tx, &transaction.to_address, &transaction.currency)?;

    ledger::debit(&tx, sender_id, &transaction.currency, transaction.amount)?;
    if let Some(rid) = receiver_id {
        ledger::credit(&tx, rid, &transaction.currency, transaction.amount)?;
    }
    tx.execute(
        "UPDATE transactions SET status='approved', to_user_id=COALESCE(?2, to_user_id) \
         WHERE id=?1",
        params![id, receiver_id],
    )?;
    tx.commit()?;

    let transaction = store::get_transaction(conn, id)?;
    let mut events = vec![WalletEvent::TransactionApproved {
        user_id: sender_id,
        transaction_id: id,
        amount: transaction.amount,
        currency: transaction.currency.clone(),
    }];
    if let Some(rid) = receiver_id {
        events.push(WalletEvent::TransactionReceived {
            user_id: rid,
            transaction_id: id,
            amount: transaction.amount,
            currency: transaction.currency.clone(),
        });
    }
    Ok((transaction, events))
}

/// Reject a pending transfer with a reason. No ledger mutation.
pub fn reject(
    conn: &mut Connection,
    id: i64,
    reason: &str,
) -> Result<(Transaction, Vec<WalletEvent>)> {
    if reason.trim().is_empty() {
        return Err(WalletError::MissingReason);
    }
    let tx = conn.transaction()?;

    let transaction = store::get_transaction(&tx, id)?;
    if transaction.status != TxStatus::Pending {
        return Err(WalletError::InvalidState("transaction is not pending"));
    }
    tx.execute(
        "UPDATE transactions SET status='rejected', rejection_reason=?2 WHERE id=?1",
        params![id, reason],
    )?;
    tx.commit()?;

    let transaction = store::get_transaction(conn, id)?;
    let mut events = Vec::new();
    if let Some(uid) = transaction.from_user_id {
        events.push(WalletEvent::TransactionRejected {
            user_id: uid,
            transaction_id: id,
            amount: transaction.amount,
            currency: transaction.currency.clone(),
            reason: reason.to_string(),
        });
    }
    Ok((transaction, events))
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<Transaction> {
    store::get_transaction(conn, id)
}

pub fn get_by_user(conn: &Connection, user_id: i64) -> Result<Vec<Transaction>> {
    store::list_transactions_for_user(conn, user_id)
}

pub fn get_pending(conn: &Connection) -> Result<Vec<Transaction>> {
    store::list_pending_transactions(conn)
}
