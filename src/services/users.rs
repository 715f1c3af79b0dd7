// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! User accounts: registration, profile updates, admin balance adjustment,
//! and wallet-address generation. Authentication lives outside the core;
//! callers arrive with identity and admin flag already resolved.

use crate::errors::{Result, WalletError};
use crate::models::User;
use crate::services::ledger;
use crate::store;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn register(conn: &Connection, name: &str, email: &str) -> Result<User> {
    if store::get_user_by_email(conn, email)?.is_some() {
        return Err(WalletError::EmailInUse);
    }
    conn.execute(
        "INSERT INTO users(name, email, kyc_status, is_admin, created_at)
         VALUES (?1, ?2, 'unverified', 0, ?3)",
        params![name, email, store::ts(&store::now())],
    )?;
    let user_id = conn.last_insert_rowid();

    // One empty address slot per catalog currency; generated on demand.
    for currency in store::list_currencies(conn)? {
        conn.execute(
            "INSERT OR IGNORE INTO wallet_addresses(user_id, currency, address) VALUES (?1, ?2, '')",
            params![user_id, currency.id],
        )?;
    }
    store::get_user(conn, user_id)
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<User> {
    store::get_user(conn, id)
}

pub fn get_all(conn: &Connection) -> Result<Vec<User>> {
    store::list_users(conn)
}

pub fn update_profile(
    conn: &Connection,
    user_id: i64,
    name: Option<&str>,
    email: Option<&str>,
) -> Result<User> {
    let user = store::get_user(conn, user_id)?;
    if let Some(new_email) = email {
        if new_email != user.email {
            if let Some(other) = store::get_user_by_email(conn, new_email)? {
                if other.id != user_id {
                    return Err(WalletError::EmailInUse);
                }
            }
            conn.execute(
                "UPDATE users SET email=?1 WHERE id=?2",
                params![new_email, user_id],
            )?;
        }
    }
    if let Some(new_name) = name {
        conn.execute(
            "UPDATE users SET name=?1 WHERE id=?2",
            params![new_name, user_id],
        )?;
    }
    store::get_user(conn, user_id)
}

/// Admin balance adjustment with delta semantics; decreases clamp at zero
/// (see DESIGN.md). Returns the user with the post-adjustment balances.
pub fn update_balance(
    conn: &Connection,
    user_id: i64,
    currency: &str,
    delta: Decimal,
) -> Result<User> {
    store::get_user(conn, user_id)?;
    store::get_currency(conn, currency)?;
    ledger::adjust(conn, user_id, currency, delta)?;
    store::get_user(conn, user_id)
}

pub fn set_admin(conn: &Connection, user_id: i64, is_admin: bool) -> Result<User> {
    let n = conn.execute(
        "UPDATE users SET is_admin=?1 WHERE id=?2",
        params![is_admin as i64, user_id],
    )?;
    if n == 0 {
        return Err(WalletError::NotFound("user"));
    }
    store::get_user(conn, user_id)
}

/// Demo receive address: hex digest of (user, currency, clock), not a real
/// keypair.
fn demo_address(user_id: i64, currency: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use std::time::{SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let mut h1 = DefaultHasher::new();
    (user_id, currency, nanos).hash(&mut h1);
    let a = h1.finish();
    let mut h2 = DefaultHasher::new();
    (nanos, currency, user_id, a).hash(&mut h2);
    let b = h2.finish();
    let mut h3 = DefaultHasher::new();
    (a, b).hash(&mut h3);
    format!("0x{:016x}{:016x}{:08x}", a, b, h3.finish() as u32)
}

/// Generate (or regenerate) the user's receive address for a currency.
pub fn generate_address(conn: &Connection, user_id: i64, currency: &str) -> Result<String> {
    store::get_user(conn, user_id)?;
    store::get_currency(conn, currency)?;
    let address = demo_address(user_id, currency);
    conn.execute(
        "INSERT INTO wallet_addresses(user_id, currency, address) VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id, currency) DO UPDATE SET address=excluded.address",
        params![user_id, currency, address],
    )?;
    Ok(address)
}
