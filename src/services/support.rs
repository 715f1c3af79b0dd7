// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Support tickets. A thin collaborator: ordered message threads with an
//! open/in_progress/closed status.

use crate::errors::{Result, WalletError};
use crate::models::{SupportTicket, TicketStatus};
use crate::store;
use rusqlite::{Connection, params};

pub fn open(conn: &Connection, user_id: i64, subject: &str, message: &str) -> Result<SupportTicket> {
    store::get_user(conn, user_id)?;
    let now = store::ts(&store::now());
    conn.execute(
        "INSERT INTO support_tickets(user_id, subject, status, created_at)
         VALUES (?1, ?2, 'open', ?3)",
        params![user_id, subject, now],
    )?;
    let ticket_id = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO ticket_messages(ticket_id, sender, content, created_at)
         VALUES (?1, 'user', ?2, ?3)",
        params![ticket_id, message, now],
    )?;
    store::get_ticket(conn, ticket_id)
}

/// Append a message. An admin reply moves an `open` ticket to `in_progress`;
/// replying to a closed ticket is not allowed.
pub fn reply(
    conn: &Connection,
    ticket_id: i64,
    sender: &str,
    content: &str,
) -> Result<SupportTicket> {
    let ticket = store::get_ticket(conn, ticket_id)?;
    if ticket.status == TicketStatus::Closed {
        return Err(WalletError::InvalidState("ticket is closed"));
    }
    conn.execute(
        "INSERT INTO ticket_messages(ticket_id, sender, content, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![ticket_id, sender, content, store::ts(&store::now())],
    )?;
    if sender == "admin" && ticket.status == TicketStatus::Open {
        conn.execute(
            "UPDATE support_tickets SET status='in_progress' WHERE id=?1",
            params![ticket_id],
        )?;
    }
    store::get_ticket(conn, ticket_id)
}

pub fn set_status(conn: &Connection, ticket_id: i64, status: TicketStatus) -> Result<SupportTicket> {
    let n = conn.execute(
        "UPDATE support_tickets SET status=?1 WHERE id=?2",
        params![status.as_str(), ticket_id],
    )?;
    if n == 0 {
        return Err(WalletError::NotFound("support ticket"));
    }
    store::get_ticket(conn, ticket_id)
}

pub fn get_by_id(conn: &Connection, ticket_id: i64) -> Result<SupportTicket> {
    store::get_ticket(conn, ticket_id)
}

pub fn get_by_user(conn: &Connection, user_id: i64) -> Result<Vec<SupportTicket>> {
    store::list_tickets_for_user(conn, user_id)
}
