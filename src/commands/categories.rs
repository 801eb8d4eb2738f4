// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::json_flags;
use crate::models::{Category, DEFAULT_COLOR, DEFAULT_ICON, EntryType, User};
use crate::store::{FinanceStore, SqliteStore};
use crate::utils::{
    check_amount_limit, maybe_print_json, parse_decimal, pretty_table, validate_color,
};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, user: &User, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let id = add(conn, user, sub)?;
            println!(
                "Added category '{}' (id {})",
                sub.get_one::<String>("name").unwrap().trim(),
                id
            );
        }
        Some(("list", sub)) => list(conn, user, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute(
                "DELETE FROM categories WHERE id=?1 AND user_id=?2",
                params![id, user.id],
            )?;
            if n == 0 {
                bail!("Category {} not found", id);
            }
            tracing::info!(user_id = user.id, category_id = id, "category removed");
            println!("Removed category {} and its transactions", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn add(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<i64> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    if name.is_empty() {
        bail!("Category name must not be empty");
    }
    let kind: EntryType = sub.get_one::<String>("type").unwrap().parse()?;
    let color = match sub.get_one::<String>("color") {
        Some(c) => validate_color(c)?,
        None => DEFAULT_COLOR.to_string(),
    };
    let icon = sub
        .get_one::<String>("icon")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_ICON);
    let budget_limit = match sub.get_one::<String>("budget_limit") {
        Some(s) => {
            let v = parse_decimal(s)?;
            if v < Decimal::ZERO {
                bail!("Budget limit must not be negative");
            }
            Some(check_amount_limit(v.round_dp(2))?.to_string())
        }
        None => None,
    };
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim())
        .unwrap_or("");

    conn.execute(
        "INSERT INTO categories(user_id, name, description, category_type, color, icon, budget_limit)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![user.id, name, description, kind, color, icon, budget_limit],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(user_id = user.id, category_id = id, kind = %kind, "category created");
    Ok(id)
}

fn list(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<EntryType>())
        .transpose()?;
    let cats: Vec<Category> = SqliteStore::new(conn).categories(user.id, kind)?;
    if !maybe_print_json(json_flag, jsonl_flag, &cats)? {
        let data = cats
            .into_iter()
            .map(|c| {
                vec![
                    c.id.to_string(),
                    c.name,
                    c.category_type.to_string(),
                    c.color,
                    c.icon,
                    c.budget_limit
                        .map(|b| format!("{:.2}", b))
                        .unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Category", "Type", "Color", "Icon", "Limit"], data)
        );
    }
    Ok(())
}
