// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{json_flags, today};
use crate::models::{EntryType, User};
use crate::report::{
    self, CategoryChartRow, CategoryTotal, MonthlyChartRow, MonthlyPoint, REPORT_LOOKBACK_DAYS,
    SPENDING_LOOKBACK_DAYS, lookback,
};
use crate::store::SqliteStore;
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, parse_date, pretty_table};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use rusqlite::Connection;

pub fn handle(conn: &Connection, user: &User, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("monthly", sub)) => monthly(conn, user, sub)?,
        Some(("by-category", sub)) => by_category(conn, user, sub)?,
        Some(("dashboard", sub)) => dashboard(conn, user, sub)?,
        Some(("chart", sub)) => {
            let data = report::chart_data(&SqliteStore::new(conn), user.id, as_of(sub)?)?;
            println!("{}", serde_json::to_string(&data)?);
        }
        _ => {}
    }
    Ok(())
}

fn as_of(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match sub.get_one::<String>("date") {
        Some(d) => parse_date(d),
        None => Ok(today()),
    }
}

/// `--from`/`--to`, defaulting to `lookback_days` before today and today.
fn date_range(sub: &clap::ArgMatches, lookback_days: u64) -> Result<(NaiveDate, NaiveDate)> {
    let to = match sub.get_one::<String>("to") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let from = match sub.get_one::<String>("from") {
        Some(d) => parse_date(d)?,
        None => lookback(to, lookback_days),
    };
    if from > to {
        bail!("--from {} is after --to {}", from, to);
    }
    Ok((from, to))
}

pub fn monthly_series(
    conn: &Connection,
    user: &User,
    sub: &clap::ArgMatches,
) -> Result<Vec<MonthlyPoint>> {
    let (from, to) = date_range(sub, REPORT_LOOKBACK_DAYS)?;
    Ok(report::build_monthly_series(
        &SqliteStore::new(conn),
        user.id,
        from,
        to,
    )?)
}

fn monthly(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let series = monthly_series(conn, user, sub)?;
    if sub.get_flag("chart") {
        let rows: Vec<MonthlyChartRow> = series.iter().map(MonthlyPoint::to_chart_row).collect();
        if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
            println!("{}", serde_json::to_string(&rows)?);
        }
        return Ok(());
    }
    if !maybe_print_json(json_flag, jsonl_flag, &series)? {
        let data = series
            .into_iter()
            .map(|p| {
                vec![
                    p.label,
                    fmt_money(&p.income),
                    fmt_money(&p.expense),
                    fmt_money(&p.balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Balance"], data)
        );
    }
    Ok(())
}

pub fn category_breakdown(
    conn: &Connection,
    user: &User,
    sub: &clap::ArgMatches,
) -> Result<Vec<CategoryTotal>> {
    let kind = match sub.get_one::<String>("type") {
        Some(s) => s.parse()?,
        None => EntryType::Expense,
    };
    let (from, to) = date_range(sub, SPENDING_LOOKBACK_DAYS)?;
    Ok(report::breakdown_by_category(
        &SqliteStore::new(conn),
        user.id,
        kind,
        from,
        to,
    )?)
}

fn by_category(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let totals = category_breakdown(conn, user, sub)?;
    if sub.get_flag("chart") {
        let rows: Vec<CategoryChartRow> = totals.iter().map(CategoryTotal::to_chart_row).collect();
        if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
            println!("{}", serde_json::to_string(&rows)?);
        }
        return Ok(());
    }
    if !maybe_print_json(json_flag, jsonl_flag, &totals)? {
        let data = totals
            .into_iter()
            .map(|c| vec![c.name, fmt_money(&c.total), c.color])
            .collect();
        println!("{}", pretty_table(&["Category", "Total", "Color"], data));
    }
    Ok(())
}

fn dashboard(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let store = SqliteStore::new(conn);
    let d = report::dashboard(&store, user.id, as_of(sub)?)?;
    if maybe_print_json(json_flag, jsonl_flag, &d)? {
        return Ok(());
    }

    println!("{} for {}", d.month_label, user.username);
    println!(
        "{}",
        pretty_table(
            &["Income", "Expenses", "Investments", "Balance"],
            vec![vec![
                fmt_money(&d.income),
                fmt_money(&d.expense),
                fmt_money(&d.investment),
                fmt_money(&d.balance),
            ]],
        )
    );

    if !d.categories.is_empty() {
        let rows = d
            .categories
            .iter()
            .map(|c| vec![c.name.clone(), fmt_money(&c.total)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }

    if !d.recent.is_empty() {
        let rows = d
            .recent
            .iter()
            .map(|t| {
                vec![
                    t.date.to_string(),
                    t.transaction_type.to_string(),
                    fmt_money(&t.amount),
                    t.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Type", "Amount", "Description"], rows)
        );
    }

    if !d.investments.is_empty() {
        println!(
            "{}",
            pretty_table(
                &["Active investments", "Invested", "Value", "ROI"],
                vec![vec![
                    d.investments.len().to_string(),
                    fmt_money(&d.investment_initial),
                    fmt_money(&d.investment_value),
                    fmt_percent(&d.investment_roi),
                ]],
            )
        );
    }
    Ok(())
}
