// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use crate::commands::json_flags;
use crate::models::{EntryType, User};
use crate::report::{MonthWindow, sum_amount_in_category};
use crate::store::{FinanceStore, SqliteStore};
use crate::utils::{
    check_amount_limit, fmt_money, fmt_percent, maybe_print_json, parse_decimal, parse_month,
    pretty_table,
};
use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, user: &User, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, user, sub)?,
        Some(("list", sub)) => list(conn, user, sub)?,
        Some(("refresh", sub)) => {
            let month = parse_month(sub.get_one::<String>("month").unwrap())?;
            let n = refresh_month(conn, user, month)?;
            println!(
                "Refreshed {} budget(s) for {}",
                n,
                MonthWindow::containing(month).label()
            );
        }
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let cat_id = *sub.get_one::<i64>("category_id").unwrap();
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount < Decimal::ZERO {
        bail!("Budget amount must not be negative");
    }
    let amount = check_amount_limit(amount.round_dp(2))?;
    let category = SqliteStore::new(conn)
        .category(user.id, cat_id)?
        .ok_or_else(|| anyhow!("Category {} not found", cat_id))?;
    conn.execute(
        "INSERT INTO budgets(user_id, category_id, month, allocated_amount) VALUES (?1,?2,?3,?4)
         ON CONFLICT(user_id, category_id, month)
         DO UPDATE SET allocated_amount=excluded.allocated_amount, updated_at=datetime('now')",
        params![user.id, category.id, month, amount.to_string()],
    )?;
    tracing::info!(user_id = user.id, category_id = category.id, %month, "budget set");
    println!(
        "Budget set for {} / {} = {}",
        MonthWindow::containing(month).label(),
        category.name,
        fmt_money(&amount)
    );
    Ok(())
}

/// Recomputes `spent_amount` of every budget in `month` from the user's
/// EXPENSE transactions in the budget's category. Returns how many budgets
/// were touched.
pub fn refresh_month(conn: &Connection, user: &User, month: NaiveDate) -> Result<usize> {
    let store = SqliteStore::new(conn);
    let window = MonthWindow::containing(month);
    let mut touched = 0;
    for b in store.budgets(user.id, Some(window.start))? {
        let spent = sum_amount_in_category(
            &store,
            user.id,
            EntryType::Expense,
            b.category_id,
            window.start,
            window.end,
        )?;
        conn.execute(
            "UPDATE budgets SET spent_amount=?1, updated_at=datetime('now') WHERE id=?2",
            params![spent.to_string(), b.id],
        )?;
        touched += 1;
    }
    tracing::info!(user_id = user.id, month = %window.period(), touched, "budgets refreshed");
    Ok(touched)
}

#[derive(Debug, Serialize)]
pub struct BudgetRow {
    pub month: String,
    pub category: String,
    pub allocated: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub spent_percentage: Decimal,
}

pub fn query_rows(
    conn: &Connection,
    user: &User,
    month: Option<NaiveDate>,
) -> Result<Vec<BudgetRow>> {
    let store = SqliteStore::new(conn);
    let names: HashMap<i64, String> = store
        .categories(user.id, None)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let rows = store
        .budgets(user.id, month)?
        .into_iter()
        .map(|b| BudgetRow {
            month: MonthWindow::containing(b.month).period(),
            category: names.get(&b.category_id).cloned().unwrap_or_default(),
            allocated: b.allocated_amount,
            spent: b.spent_amount,
            remaining: b.remaining(),
            spent_percentage: b.spent_percentage().round_dp(2),
        })
        .collect();
    Ok(rows)
}

fn list(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let month = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()?;
    let rows = query_rows(conn, user, month)?;
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data = rows
            .into_iter()
            .map(|r| {
                vec![
                    r.month,
                    r.category,
                    fmt_money(&r.allocated),
                    fmt_money(&r.spent),
                    fmt_money(&r.remaining),
                    fmt_percent(&r.spent_percentage),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Month", "Category", "Allocated", "Spent", "Remaining", "Spent %"],
                data
            )
        );
    }
    Ok(())
}
