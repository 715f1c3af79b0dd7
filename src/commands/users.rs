// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{parse_id, require_admin};
use crate::models::User;
use crate::services::users;
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("register", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let email = sub.get_one::<String>("email").unwrap().trim();
            let user = users::register(conn, name, email)?;
            println!("Registered user #{} ({})", user.id, user.email);
        }
        Some(("list", sub)) => {
            let data = users::get_all(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                println!("{}", pretty_table(&USER_HEADERS, user_rows(&data)));
            }
        }
        Some(("show", sub)) => {
            let user = users::get_by_id(conn, parse_id(sub, "id")?)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &user)? {
                println!("{}", pretty_table(&USER_HEADERS, user_rows(&[user.clone()])));
                for (ccy, balance) in &user.balances {
                    println!("  {}: {}", ccy.to_uppercase(), balance.normalize());
                }
            }
        }
        Some(("balance", sub)) => {
            require_admin(conn, sub)?;
            let user_id = parse_id(sub, "user")?;
            let ccy = sub.get_one::<String>("currency").unwrap().trim().to_lowercase();
            let delta = parse_decimal(sub.get_one::<String>("delta").unwrap().trim())?;
            let user = users::update_balance(conn, user_id, &ccy, delta)?;
            let balance = user.balances.get(&ccy).copied().unwrap_or_default();
            println!(
                "Adjusted {} balance of user #{} by {}; now {}",
                ccy.to_uppercase(),
                user.id,
                delta.normalize(),
                balance.normalize()
            );
        }
        Some(("gen-address", sub)) => {
            let user_id = parse_id(sub, "user")?;
            let ccy = sub.get_one::<String>("currency").unwrap().trim().to_lowercase();
            let address = users::generate_address(conn, user_id, &ccy)?;
            println!("{}", address);
        }
        Some(("set-admin", sub)) => {
            let user_id = parse_id(sub, "user")?;
            let grant = !sub.get_flag("revoke");
            let user = users::set_admin(conn, user_id, grant)?;
            println!(
                "User #{} is {} an admin",
                user.id,
                if user.is_admin { "now" } else { "no longer" }
            );
        }
        Some(("update", sub)) => {
            let user_id = parse_id(sub, "user")?;
            let name = sub.get_one::<String>("name").map(|s| s.trim());
            let email = sub.get_one::<String>("email").map(|s| s.trim());
            let user = users::update_profile(conn, user_id, name, email)?;
            println!("Updated user #{} ({}, {})", user.id, user.name, user.email);
        }
        _ => {}
    }
    Ok(())
}

const USER_HEADERS: [&str; 5] = ["Id", "Name", "Email", "KYC", "Admin"];

fn user_rows(data: &[User]) -> Vec<Vec<String>> {
    data.iter()
        .map(|u| {
            vec![
                u.id.to_string(),
                u.name.clone(),
                u.email.clone(),
                u.kyc_status.as_str().to_string(),
                if u.is_admin { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect()
}
