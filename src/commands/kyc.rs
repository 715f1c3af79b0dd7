// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{parse_id, require_admin};
use crate::services::{kyc, notifications};
use crate::store;
use crate::utils::maybe_print_json;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("submit", sub)) => {
            let user_id = parse_id(sub, "user")?;
            let data = kyc::KycSubmission {
                full_name: sub.get_one::<String>("full-name").unwrap().clone(),
                date_of_birth: sub.get_one::<String>("dob").unwrap().clone(),
                address: sub.get_one::<String>("address").unwrap().clone(),
                id_type: sub.get_one::<String>("id-type").unwrap().clone(),
                id_number: sub.get_one::<String>("id-number").unwrap().clone(),
                id_front_image: sub.get_one::<String>("front").unwrap().clone(),
                id_back_image: sub.get_one::<String>("back").unwrap().clone(),
                selfie_image: sub.get_one::<String>("selfie").unwrap().clone(),
            };
            let (user, events) = kyc::submit(conn, user_id, &data)?;
            notifications::dispatch(conn, &events);
            println!(
                "KYC submitted for user #{}; status: {}",
                user.id,
                user.kyc_status.as_str()
            );
        }
        Some(("approve", sub)) => {
            require_admin(conn, sub)?;
            let user_id = parse_id(sub, "user")?;
            let (user, events) = kyc::approve(conn, user_id)?;
            notifications::dispatch(conn, &events);
            println!("KYC approved for user #{}", user.id);
        }
        Some(("reject", sub)) => {
            require_admin(conn, sub)?;
            let user_id = parse_id(sub, "user")?;
            let reason = sub.get_one::<String>("reason").unwrap();
            let (user, events) = kyc::reject(conn, user_id, reason)?;
            notifications::dispatch(conn, &events);
            println!("KYC rejected for user #{}: {}", user.id, reason);
        }
        Some(("status", sub)) => {
            let user_id = parse_id(sub, "user")?;
            let user = store::get_user(conn, user_id)?;
            let record = store::get_kyc_record(conn, user_id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &record)? {
                println!("User #{} KYC status: {}", user.id, user.kyc_status.as_str());
                if let Some(rec) = record {
                    println!("  submitted: {}", rec.submitted_at.format("%Y-%m-%d %H:%M"));
                    if let Some(reason) = rec.rejection_reason {
                        println!("  rejected: {}", reason);
                    }
                }
            }
        }
        _ => {}
    }
    Ok(())
}
