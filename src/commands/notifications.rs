// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::parse_id;
use crate::services::notifications;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let user_id = parse_id(sub, "user")?;
            let data = notifications::get_by_user(conn, user_id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|n| {
                        vec![
                            n.id.to_string(),
                            n.created_at.format("%Y-%m-%d %H:%M").to_string(),
                            n.kind.as_str().to_string(),
                            n.title.clone(),
                            n.message.clone(),
                            if n.read { "" } else { "*" }.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Created", "Kind", "Title", "Message", "Unread"], rows)
                );
            }
        }
        Some(("read", sub)) => {
            notifications::mark_read(conn, parse_id(sub, "id")?)?;
            println!("Marked as read");
        }
        Some(("read-all", sub)) => {
            notifications::mark_all_read(conn, parse_id(sub, "user")?)?;
            println!("Marked all as read");
        }
        Some(("unread", sub)) => {
            let n = notifications::unread_count(conn, parse_id(sub, "user")?)?;
            println!("{}", n);
        }
        _ => {}
    }
    Ok(())
}
