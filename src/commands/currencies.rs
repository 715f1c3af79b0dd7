// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::require_admin;
use crate::services::currencies;
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let data = currencies::get_all(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.clone(),
                            c.name.clone(),
                            c.symbol.clone(),
                            c.decimals.to_string(),
                            c.exchange_rate.normalize().to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Name", "Symbol", "Decimals", "USD Rate"], rows)
                );
            }
        }
        Some(("set-rate", sub)) => {
            require_admin(conn, sub)?;
            let id = sub.get_one::<String>("id").unwrap().trim().to_lowercase();
            let rate = parse_decimal(sub.get_one::<String>("rate").unwrap().trim())?;
            let ccy = currencies::update_exchange_rate(conn, &id, rate)?;
            println!(
                "{} rate set to {} USD",
                ccy.symbol,
                ccy.exchange_rate.normalize()
            );
        }
        _ => {}
    }
    Ok(())
}
