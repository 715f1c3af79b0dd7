// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use coinkeep::{cli, commands, db, services};

fn main() -> Result<()> {
    // RUST_LOG controls verbosity; side-effect failures land here as warnings.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            services::currencies::seed_defaults(&conn)?;
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("user", sub)) => commands::users::handle(&conn, sub)?,
        Some(("kyc", sub)) => commands::kyc::handle(&conn, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut conn, sub)?,
        Some(("currency", sub)) => commands::currencies::handle(&conn, sub)?,
        Some(("notify", sub)) => commands::notifications::handle(&conn, sub)?,
        Some(("support", sub)) => commands::support::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
