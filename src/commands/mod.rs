// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod currencies;
pub mod kyc;
pub mod notifications;
pub mod support;
pub mod transactions;
pub mod users;

use crate::models::User;
use crate::store;
use anyhow::{Context, Result, bail};
use rusqlite::Connection;

pub(crate) fn parse_id(m: &clap::ArgMatches, name: &str) -> Result<i64> {
    let s = m.get_one::<String>(name).unwrap();
    s.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid id '{}'", s))
}

/// The CLI is the authentication collaborator: it resolves the acting user
/// and enforces the admin flag before calling into the core.
pub(crate) fn require_admin(conn: &Connection, m: &clap::ArgMatches) -> Result<User> {
    let actor_id = parse_id(m, "actor")?;
    let actor = store::get_user(conn, actor_id)?;
    if !actor.is_admin {
        bail!("User {} ({}) is not an admin", actor.id, actor.name);
    }
    Ok(actor)
}
