// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use crate::commands::{json_flags, today};
use crate::models::{Category, EntryType, RecurrenceInterval, User};
use crate::store::{FinanceStore, SqliteStore, TransactionQuery};
use crate::utils::{maybe_print_json, parse_amount, parse_date, pretty_table};
use anyhow::{Result, anyhow, bail};
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, user: &User, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            add(conn, user, sub)?;
        }
        Some(("list", sub)) => list(conn, user, sub)?,
        Some(("edit", sub)) => edit(conn, user, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute(
                "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
                params![id, user.id],
            )?;
            if n == 0 {
                bail!("Transaction {} not found", id);
            }
            tracing::info!(user_id = user.id, transaction_id = id, "transaction removed");
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Categories can only be used by the user who owns them.
fn owned_category(store: &SqliteStore<'_>, user: &User, id: i64) -> Result<Category> {
    store
        .category(user.id, id)?
        .ok_or_else(|| anyhow!("Category {} not found", id))
}

fn parse_recurrence(sub: &clap::ArgMatches) -> Result<Option<RecurrenceInterval>> {
    Ok(sub
        .get_one::<String>("recurring")
        .map(|s| s.parse::<RecurrenceInterval>())
        .transpose()?)
}

pub fn add(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<i64> {
    let store = SqliteStore::new(conn);
    let category = owned_category(&store, user, *sub.get_one::<i64>("category_id").unwrap())?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let kind: EntryType = sub.get_one::<String>("type").unwrap().parse()?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim())
        .unwrap_or("");
    let recurrence = parse_recurrence(sub)?;

    conn.execute(
        "INSERT INTO transactions(user_id, category_id, amount, description, transaction_type, date, is_recurring, recurrence_interval)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user.id,
            category.id,
            amount.to_string(),
            description,
            kind,
            date,
            recurrence.is_some(),
            recurrence
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(user_id = user.id, transaction_id = id, kind = %kind, "transaction recorded");
    println!(
        "Recorded {} #{}: {:.2} on {} in '{}'",
        kind, id, amount, date, category.name
    );
    Ok(id)
}

fn edit(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut t = store
        .transaction(user.id, id)?
        .ok_or_else(|| anyhow!("Transaction {} not found", id))?;

    if let Some(cat) = sub.get_one::<i64>("category_id") {
        t.category_id = owned_category(&store, user, *cat)?.id;
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        t.amount = parse_amount(a)?;
    }
    if let Some(k) = sub.get_one::<String>("type") {
        t.transaction_type = k.parse()?;
    }
    if let Some(d) = sub.get_one::<String>("date") {
        t.date = parse_date(d)?;
    }
    if let Some(d) = sub.get_one::<String>("description") {
        t.description = d.trim().to_string();
    }
    if let Some(r) = parse_recurrence(sub)? {
        t.recurrence = Some(r);
    }
    if sub.get_flag("no_recurring") {
        t.recurrence = None;
    }

    conn.execute(
        "UPDATE transactions
         SET category_id=?1, amount=?2, description=?3, transaction_type=?4, date=?5,
             is_recurring=?6, recurrence_interval=?7, updated_at=datetime('now')
         WHERE id=?8 AND user_id=?9",
        params![
            t.category_id,
            t.amount.to_string(),
            t.description,
            t.transaction_type,
            t.date,
            t.recurrence.is_some(),
            t.recurrence,
            t.id,
            user.id
        ],
    )?;
    tracing::info!(user_id = user.id, transaction_id = id, "transaction updated");
    println!("Updated transaction {}", id);
    Ok(())
}

fn list(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let data = query_rows(conn, user, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.r#type.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.description.clone(),
                    r.recurring.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Category", "Amount", "Description", "Repeats"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub r#type: String,
    pub category: String,
    pub amount: String,
    pub description: String,
    pub recurring: String,
}

pub fn query_rows(
    conn: &Connection,
    user: &User,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let store = SqliteStore::new(conn);
    let q = TransactionQuery {
        kind: sub
            .get_one::<String>("type")
            .map(|s| s.parse::<EntryType>())
            .transpose()?,
        category_id: sub.get_one::<i64>("category_id").copied(),
        from: sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?,
        to: sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?,
        limit: sub.get_one::<usize>("limit").copied(),
    };
    if let (Some(from), Some(to)) = (q.from, q.to) {
        if from > to {
            bail!("--from {} is after --to {}", from, to);
        }
    }

    let names: HashMap<i64, String> = store
        .categories(user.id, None)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let data = store
        .transactions(user.id, &q)?
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            r#type: t.transaction_type.to_string(),
            category: names.get(&t.category_id).cloned().unwrap_or_default(),
            amount: format!("{:.2}", t.amount),
            description: t.description,
            recurring: t.recurrence.map(|r| r.to_string()).unwrap_or_default(),
        })
        .collect();
    Ok(data)
}
