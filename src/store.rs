// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Row mappers and typed lookups over the SQLite schema.
//!
//! Services build on these instead of touching rows directly, so the
//! backing layout can change without touching state-machine logic.

use crate::errors::{Result, WalletError};
use crate::models::{
    Currency, KycRecord, KycStatus, Notification, NotificationKind, SupportTicket, TicketMessage,
    TicketStatus, Transaction, TxStatus, User,
};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn ts(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn conv_err(idx: usize, e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

pub(crate) fn dec_col(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    s.parse::<Decimal>().map_err(|e| conv_err(idx, e))
}

fn opt_dec_col(row: &Row, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let s: Option<String> = row.get(idx)?;
    match s {
        Some(s) => Ok(Some(s.parse::<Decimal>().map_err(|e| conv_err(idx, e))?)),
        None => Ok(None),
    }
}

pub(crate) fn ts_col(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|d| d.with_timezone(&Utc))
        .or_else(|_| {
            // datetime('now') default on seeded rows
            chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
                .map(|n| n.and_utc())
                .map_err(|e| conv_err(idx, e))
        })
}

// ---- currencies ----

fn map_currency(row: &Row) -> rusqlite::Result<Currency> {
    Ok(Currency {
        id: row.get(0)?,
        name: row.get(1)?,
        symbol: row.get(2)?,
        decimals: row.get(3)?,
        exchange_rate: dec_col(row, 4)?,
    })
}

pub fn get_currency(conn: &Connection, id: &str) -> Result<Currency> {
    conn.query_row(
        "SELECT id, name, symbol, decimals, exchange_rate FROM currencies WHERE id=?1",
        params![id],
        map_currency,
    )
    .optional()?
    .ok_or(WalletError::NotFound("currency"))
}

pub fn list_currencies(conn: &Connection) -> Result<Vec<Currency>> {
    let mut stmt =
        conn.prepare("SELECT id, name, symbol, decimals, exchange_rate FROM currencies ORDER BY id")?;
    let rows = stmt.query_map([], map_currency)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---- users ----

fn map_user_base(row: &Row) -> rusqlite::Result<User> {
    let status: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        kyc_status: KycStatus::parse(&status).unwrap_or(KycStatus::Unverified),
        is_admin: row.get::<_, i64>(4)? != 0,
        wallet_addresses: BTreeMap::new(),
        balances: BTreeMap::new(),
        created_at: ts_col(row, 5)?,
    })
}

fn fill_user(conn: &Connection, mut user: User) -> Result<User> {
    let mut stmt =
        conn.prepare("SELECT currency, address FROM wallet_addresses WHERE user_id=?1")?;
    let rows = stmt.query_map(params![user.id], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
    })?;
    for r in rows {
        let (ccy, addr) = r?;
        user.wallet_addresses.insert(ccy, addr);
    }
    let mut stmt = conn.prepare("SELECT currency, amount FROM balances WHERE user_id=?1")?;
    let rows = stmt.query_map(params![user.id], |r| Ok((r.get::<_, String>(0)?, dec_col(r, 1)?)))?;
    for r in rows {
        let (ccy, amt) = r?;
        user.balances.insert(ccy, amt);
    }
    Ok(user)
}

pub fn get_user(conn: &Connection, id: i64) -> Result<User> {
    let user = conn
        .query_row(
            "SELECT id, name, email, kyc_status, is_admin, created_at FROM users WHERE id=?1",
            params![id],
            map_user_base,
        )
        .optional()?
        .ok_or(WalletError::NotFound("user"))?;
    fill_user(conn, user)
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            "SELECT id, name, email, kyc_status, is_admin, created_at FROM users WHERE email=?1",
            params![email],
            map_user_base,
        )
        .optional()?;
    match user {
        Some(u) => Ok(Some(fill_user(conn, u)?)),
        None => Ok(None),
    }
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, kyc_status, is_admin, created_at FROM users ORDER BY id",
    )?;
    let rows = stmt.query_map([], map_user_base)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(fill_user(conn, r?)?);
    }
    Ok(out)
}

/// Resolve a wallet address for a currency to its owner, if any.
pub fn find_user_by_address(conn: &Connection, address: &str, currency: &str) -> Result<Option<i64>> {
    if address.is_empty() {
        return Ok(None);
    }
    let id = conn
        .query_row(
            "SELECT user_id FROM wallet_addresses WHERE address=?1 AND currency=?2",
            params![address, currency],
            |r| r.get::<_, i64>(0),
        )
        .optional()?;
    Ok(id)
}

pub fn set_kyc_status(conn: &Connection, user_id: i64, status: KycStatus) -> Result<()> {
    let n = conn.execute(
        "UPDATE users SET kyc_status=?1 WHERE id=?2",
        params![status.as_str(), user_id],
    )?;
    if n == 0 {
        return Err(WalletError::NotFound("user"));
    }
    Ok(())
}

// ---- transactions ----

pub(crate) fn map_transaction(row: &Row) -> rusqlite::Result<Transaction> {
    let status: String = row.get(7)?;
    Ok(Transaction {
        id: row.get(0)?,
        from_user_id: row.get(1)?,
        to_user_id: row.get(2)?,
        from_address: row.get(3)?,
        to_address: row.get(4)?,
        amount: dec_col(row, 5)?,
        currency: row.get(6)?,
        status: TxStatus::parse(&status).unwrap_or(TxStatus::Pending),
        created_at: ts_col(row, 8)?,
        description: row.get(9)?,
        rejection_reason: row.get(10)?,
        fee: opt_dec_col(row, 11)?,
    })
}

const TX_COLS: &str = "id, from_user_id, to_user_id, from_address, to_address, amount, currency, \
                       status, created_at, description, rejection_reason, fee";

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Transaction> {
    conn.query_row(
        &format!("SELECT {} FROM transactions WHERE id=?1", TX_COLS),
        params![id],
        map_transaction,
    )
    .optional()?
    .ok_or(WalletError::NotFound("transaction"))
}

pub fn list_transactions_for_user(conn: &Connection, user_id: i64) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM transactions WHERE from_user_id=?1 OR to_user_id=?1 \
         ORDER BY created_at DESC, id DESC",
        TX_COLS
    ))?;
    let rows = stmt.query_map(params![user_id], map_transaction)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn list_pending_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM transactions WHERE status='pending' ORDER BY created_at, id",
        TX_COLS
    ))?;
    let rows = stmt.query_map([], map_transaction)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---- notifications ----

fn map_notification(row: &Row) -> rusqlite::Result<Notification> {
    let kind: String = row.get(2)?;
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: NotificationKind::parse(&kind).unwrap_or(NotificationKind::System),
        title: row.get(3)?,
        message: row.get(4)?,
        created_at: ts_col(row, 5)?,
        read: row.get::<_, i64>(6)? != 0,
        transaction_id: row.get(7)?,
    })
}

pub fn list_notifications_for_user(conn: &Connection, user_id: i64) -> Result<Vec<Notification>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, kind, title, message, created_at, read, transaction_id \
         FROM notifications WHERE user_id=?1 ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![user_id], map_notification)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---- KYC records ----

pub fn get_kyc_record(conn: &Connection, user_id: i64) -> Result<Option<KycRecord>> {
    let rec = conn
        .query_row(
            "SELECT user_id, full_name, date_of_birth, address, id_type, id_number, \
             id_front_image, id_back_image, selfie_image, submitted_at, rejection_reason \
             FROM kyc_records WHERE user_id=?1",
            params![user_id],
            |row| {
                Ok(KycRecord {
                    user_id: row.get(0)?,
                    full_name: row.get(1)?,
                    date_of_birth: row.get(2)?,
                    address: row.get(3)?,
                    id_type: row.get(4)?,
                    id_number: row.get(5)?,
                    id_front_image: row.get(6)?,
                    id_back_image: row.get(7)?,
                    selfie_image: row.get(8)?,
                    submitted_at: ts_col(row, 9)?,
                    rejection_reason: row.get(10)?,
                })
            },
        )
        .optional()?;
    Ok(rec)
}

// ---- support tickets ----

fn map_ticket_base(row: &Row) -> rusqlite::Result<SupportTicket> {
    let status: String = row.get(3)?;
    Ok(SupportTicket {
        id: row.get(0)?,
        user_id: row.get(1)?,
        subject: row.get(2)?,
        status: TicketStatus::parse(&status).unwrap_or(TicketStatus::Open),
        created_at: ts_col(row, 4)?,
        messages: Vec::new(),
    })
}

fn fill_ticket(conn: &Connection, mut ticket: SupportTicket) -> Result<SupportTicket> {
    let mut stmt = conn.prepare(
        "SELECT id, ticket_id, sender, content, created_at FROM ticket_messages \
         WHERE ticket_id=?1 ORDER BY created_at, id",
    )?;
    let rows = stmt.query_map(params![ticket.id], |row| {
        Ok(TicketMessage {
            id: row.get(0)?,
            ticket_id: row.get(1)?,
            sender: row.get(2)?,
            content: row.get(3)?,
            created_at: ts_col(row, 4)?,
        })
    })?;
    for r in rows {
        ticket.messages.push(r?);
    }
    Ok(ticket)
}

pub fn get_ticket(conn: &Connection, id: i64) -> Result<SupportTicket> {
    let ticket = conn
        .query_row(
            "SELECT id, user_id, subject, status, created_at FROM support_tickets WHERE id=?1",
            params![id],
            map_ticket_base,
        )
        .optional()?
        .ok_or(WalletError::NotFound("support ticket"))?;
    fill_ticket(conn, ticket)
}

pub fn list_tickets_for_user(conn: &Connection, user_id: i64) -> Result<Vec<SupportTicket>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, subject, status, created_at FROM support_tickets \
         WHERE user_id=?1 ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![user_id], map_ticket_base)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(fill_ticket(conn, r?)?);
    }
    Ok(out)
}
