// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{parse_id, require_admin};
use crate::models::Transaction;
use crate::services::{notifications, transactions};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("send", sub)) => send(conn, sub)?,
        Some(("approve", sub)) => approve(conn, sub)?,
        Some(("reject", sub)) => reject(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pending", sub)) => pending(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn send(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let req = transactions::CreateRequest {
        from_address: sub.get_one::<String>("from").unwrap().trim().to_string(),
        to_address: sub.get_one::<String>("to").unwrap().trim().to_string(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?,
        currency: sub.get_one::<String>("currency").unwrap().trim().to_lowercase(),
        description: sub.get_one::<String>("description").map(|s| s.to_string()),
        from_user_id: match sub.get_one::<String>("from-user") {
            Some(_) => Some(parse_id(sub, "from-user")?),
            None => None,
        },
    };
    let (tx, events) = transactions::create(conn, &req)?;
    notifications::dispatch(conn, &events);
    println!(
        "Created transaction #{}: {} to {} (pending approval)",
        tx.id,
        fmt_money(&tx.amount, &tx.currency),
        tx.to_address
    );
    Ok(())
}

fn approve(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    require_admin(conn, sub)?;
    let id = parse_id(sub, "id")?;
    let (tx, events) = transactions::approve(conn, id)?;
    notifications::dispatch(conn, &events);
    println!(
        "Approved transaction #{}: {} debited from sender",
        tx.id,
        fmt_money(&tx.amount, &tx.currency)
    );
    Ok(())
}

fn reject(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    require_admin(conn, sub)?;
    let id = parse_id(sub, "id")?;
    let reason = sub.get_one::<String>("reason").unwrap();
    let (tx, events) = transactions::reject(conn, id, reason)?;
    notifications::dispatch(conn, &events);
    println!("Rejected transaction #{}: {}", tx.id, reason);
    Ok(())
}

fn tx_rows(data: &[Transaction]) -> Vec<Vec<String>> {
    data.iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.created_at.format("%Y-%m-%d %H:%M").to_string(),
                t.from_address.clone(),
                t.to_address.clone(),
                fmt_money(&t.amount, &t.currency),
                t.status.as_str().to_string(),
                t.rejection_reason.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

const TX_HEADERS: [&str; 7] = ["Id", "Created", "From", "To", "Amount", "Status", "Reason"];

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub, "id")?;
    let tx = transactions::get_by_id(conn, id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &tx)? {
        println!("{}", pretty_table(&TX_HEADERS, tx_rows(&[tx])));
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = parse_id(sub, "user")?;
    let data = transactions::get_by_user(conn, user_id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&TX_HEADERS, tx_rows(&data)));
    }
    Ok(())
}

fn pending(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = transactions::get_pending(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&TX_HEADERS, tx_rows(&data)));
    }
    Ok(())
}
