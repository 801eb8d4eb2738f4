// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use finclip::{cli, commands, db, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("user", sub)) => commands::users::handle(&conn, sub)?,
        Some((name, sub)) => {
            let requested = matches.get_one::<String>("user").map(|s| s.as_str());
            let user = commands::users::resolve(&conn, requested)?;
            match name {
                "category" => commands::categories::handle(&conn, &user, sub)?,
                "tx" => commands::transactions::handle(&conn, &user, sub)?,
                "investment" => commands::investments::handle(&conn, &user, sub)?,
                "budget" => commands::budgets::handle(&conn, &user, sub)?,
                "report" => commands::reports::handle(&conn, &user, sub)?,
                _ => {}
            }
        }
        None => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
