// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{json_flags, today};
use crate::models::{Investment, InvestmentType, RiskLevel, User};
use crate::store::{FinanceStore, SqliteStore};
use crate::utils::{
    fmt_money, fmt_percent, maybe_print_json, parse_amount, parse_date, parse_decimal,
    pretty_table, validate_expected_return,
};
use anyhow::{Result, anyhow, bail};
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, user: &User, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let id = add(conn, user, sub)?;
            println!("Added investment {}", id);
        }
        Some(("list", sub)) => list(conn, user, sub)?,
        Some(("update", sub)) => update(conn, user, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute(
                "DELETE FROM investments WHERE id=?1 AND user_id=?2",
                params![id, user.id],
            )?;
            if n == 0 {
                bail!("Investment {} not found", id);
            }
            tracing::info!(user_id = user.id, investment_id = id, "investment removed");
            println!("Removed investment {}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn add(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<i64> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    if name.is_empty() {
        bail!("Investment name must not be empty");
    }
    let kind: InvestmentType = sub.get_one::<String>("type").unwrap().parse()?;
    let initial = parse_amount(sub.get_one::<String>("initial").unwrap())?;
    let current = parse_amount(sub.get_one::<String>("current").unwrap())?;
    let start_date = match sub.get_one::<String>("start_date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let expected =
        validate_expected_return(parse_decimal(sub.get_one::<String>("expected_return").unwrap())?)?;
    let risk: RiskLevel = sub.get_one::<String>("risk").unwrap().parse()?;
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim())
        .unwrap_or("");
    let active = !sub.get_flag("inactive");

    conn.execute(
        "INSERT INTO investments(user_id, name, investment_type, initial_amount, current_value, description, start_date, expected_return, risk_level, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            user.id,
            name,
            kind,
            initial.to_string(),
            current.to_string(),
            description,
            start_date,
            expected.to_string(),
            risk,
            active
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(user_id = user.id, investment_id = id, "investment created");
    Ok(id)
}

fn update(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut inv = store
        .investment(user.id, id)?
        .ok_or_else(|| anyhow!("Investment {} not found", id))?;
    if let Some(v) = sub.get_one::<String>("current_value") {
        inv.current_value = parse_amount(v)?;
    }
    if let Some(active) = sub.get_one::<bool>("active") {
        inv.is_active = *active;
    }
    conn.execute(
        "UPDATE investments SET current_value=?1, is_active=?2, updated_at=datetime('now')
         WHERE id=?3 AND user_id=?4",
        params![inv.current_value.to_string(), inv.is_active, inv.id, user.id],
    )?;
    tracing::info!(user_id = user.id, investment_id = id, "investment updated");
    println!(
        "Investment '{}' now at {} (ROI {})",
        inv.name,
        fmt_money(&inv.current_value),
        fmt_percent(&inv.roi())
    );
    Ok(())
}

#[derive(Serialize)]
struct InvestmentRow<'a> {
    #[serde(flatten)]
    investment: &'a Investment,
    roi: rust_decimal::Decimal,
}

fn list(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let items = SqliteStore::new(conn).investments(user.id, sub.get_flag("active"))?;
    let rows: Vec<InvestmentRow<'_>> = items
        .iter()
        .map(|i| InvestmentRow {
            investment: i,
            roi: i.roi().round_dp(2),
        })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data = items
            .iter()
            .map(|i| {
                vec![
                    i.id.to_string(),
                    i.name.clone(),
                    i.investment_type.to_string(),
                    fmt_money(&i.initial_amount),
                    fmt_money(&i.current_value),
                    fmt_percent(&i.roi()),
                    fmt_percent(&i.expected_return),
                    i.risk_level.to_string(),
                    if i.is_active { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Name", "Type", "Initial", "Current", "ROI", "Expected", "Risk", "Active"
                ],
                data
            )
        );
    }
    Ok(())
}
