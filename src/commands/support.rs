// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::parse_id;
use crate::models::TicketStatus;
use crate::services::support;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("open", sub)) => {
            let user_id = parse_id(sub, "user")?;
            let subject = sub.get_one::<String>("subject").unwrap();
            let message = sub.get_one::<String>("message").unwrap();
            let ticket = support::open(conn, user_id, subject, message)?;
            println!("Opened ticket #{}: {}", ticket.id, ticket.subject);
        }
        Some(("reply", sub)) => {
            let id = parse_id(sub, "id")?;
            let sender = sub.get_one::<String>("as").unwrap();
            let message = sub.get_one::<String>("message").unwrap();
            let ticket = support::reply(conn, id, sender, message)?;
            println!("Replied on ticket #{} ({})", ticket.id, ticket.status.as_str());
        }
        Some(("close", sub)) => {
            let id = parse_id(sub, "id")?;
            let ticket = support::set_status(conn, id, TicketStatus::Closed)?;
            println!("Closed ticket #{}", ticket.id);
        }
        Some(("list", sub)) => {
            let user_id = parse_id(sub, "user")?;
            let data = support::get_by_user(conn, user_id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|t| {
                        vec![
                            t.id.to_string(),
                            t.created_at.format("%Y-%m-%d %H:%M").to_string(),
                            t.subject.clone(),
                            t.status.as_str().to_string(),
                            t.messages.len().to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Created", "Subject", "Status", "Messages"], rows)
                );
            }
        }
        Some(("show", sub)) => {
            let ticket = support::get_by_id(conn, parse_id(sub, "id")?)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &ticket)? {
                println!(
                    "Ticket #{} [{}] {}",
                    ticket.id,
                    ticket.status.as_str(),
                    ticket.subject
                );
                for msg in &ticket.messages {
                    println!(
                        "  {} {}: {}",
                        msg.created_at.format("%Y-%m-%d %H:%M"),
                        msg.sender,
                        msg.content
                    );
                }
            }
        }
        _ => {}
    }
    Ok(())
}
