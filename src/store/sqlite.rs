// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use super::{AmountFilter, FinanceStore, checked_total};
use crate::error::StoreError;
use crate::models::{Budget, Category, EntryType, Investment, Transaction};

const CATEGORY_COLS: &str =
    "id, user_id, name, description, category_type, color, icon, budget_limit";
const TRANSACTION_COLS: &str =
    "id, user_id, category_id, amount, description, transaction_type, date, recurrence_interval";
const INVESTMENT_COLS: &str = "id, user_id, name, investment_type, initial_amount, current_value, description, start_date, expected_return, risk_level, is_active";
const BUDGET_COLS: &str =
    "id, user_id, category_id, month, allocated_amount, spent_amount";

/// Filters for listing transactions; `None` fields do not restrict.
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub kind: Option<EntryType>,
    pub category_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

/// [`FinanceStore`] over the application database. Amounts are kept as TEXT
/// and summed as `Decimal` here rather than with SQL `SUM`, which would go
/// through floating point.
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn category(&self, user_id: i64, id: i64) -> Result<Option<Category>, StoreError> {
        let sql = format!("SELECT {CATEGORY_COLS} FROM categories WHERE user_id=?1 AND id=?2");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![user_id, id])?;
        rows.next()?.map(category_from_row).transpose()
    }

    pub fn transaction(&self, user_id: i64, id: i64) -> Result<Option<Transaction>, StoreError> {
        let sql =
            format!("SELECT {TRANSACTION_COLS} FROM transactions WHERE user_id=?1 AND id=?2");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![user_id, id])?;
        rows.next()?.map(transaction_from_row).transpose()
    }

    pub fn transactions(
        &self,
        user_id: i64,
        q: &TransactionQuery,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut sql = format!("SELECT {TRANSACTION_COLS} FROM transactions WHERE user_id=?");
        let mut params_vec: Vec<Value> = vec![Value::Integer(user_id)];

        if let Some(kind) = q.kind {
            sql.push_str(" AND transaction_type=?");
            params_vec.push(Value::Text(kind.as_str().into()));
        }
        if let Some(cat) = q.category_id {
            sql.push_str(" AND category_id=?");
            params_vec.push(Value::Integer(cat));
        }
        if let Some(from) = q.from {
            sql.push_str(" AND date>=?");
            params_vec.push(Value::Text(from.to_string()));
        }
        if let Some(to) = q.to {
            sql.push_str(" AND date<=?");
            params_vec.push(Value::Text(to.to_string()));
        }
        sql.push_str(" ORDER BY date DESC, created_at DESC, id DESC");
        if let Some(limit) = q.limit {
            sql.push_str(" LIMIT ?");
            params_vec.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            out.push(transaction_from_row(r)?);
        }
        Ok(out)
    }

    pub fn investment(&self, user_id: i64, id: i64) -> Result<Option<Investment>, StoreError> {
        let sql = format!("SELECT {INVESTMENT_COLS} FROM investments WHERE user_id=?1 AND id=?2");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![user_id, id])?;
        rows.next()?.map(investment_from_row).transpose()
    }

    /// Budgets of the user, optionally for a single month, oldest month first.
    pub fn budgets(
        &self,
        user_id: i64,
        month: Option<NaiveDate>,
    ) -> Result<Vec<Budget>, StoreError> {
        let mut out = Vec::new();
        if let Some(month) = month {
            let sql = format!(
                "SELECT {BUDGET_COLS} FROM budgets WHERE user_id=?1 AND month=?2 ORDER BY category_id"
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let mut rows = stmt.query(params![user_id, month])?;
            while let Some(r) = rows.next()? {
                out.push(budget_from_row(r)?);
            }
        } else {
            let sql = format!(
                "SELECT {BUDGET_COLS} FROM budgets WHERE user_id=?1 ORDER BY month, category_id"
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let mut rows = stmt.query(params![user_id])?;
            while let Some(r) = rows.next()? {
                out.push(budget_from_row(r)?);
            }
        }
        Ok(out)
    }

    pub fn setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key=?1",
                params![key],
                |r| r.get(0),
            )
            .optional()?)
    }
}

impl FinanceStore for SqliteStore<'_> {
    fn sum_amount(&self, filter: &AmountFilter) -> Result<Option<Decimal>, StoreError> {
        let mut stmt;
        let mut rows = if let Some(cat) = filter.category_id {
            stmt = self.conn.prepare_cached(
                "SELECT amount FROM transactions
                 WHERE user_id=?1 AND transaction_type=?2 AND date BETWEEN ?3 AND ?4
                   AND category_id=?5",
            )?;
            stmt.query(params![
                filter.user_id,
                filter.kind,
                filter.start,
                filter.end,
                cat
            ])?
        } else {
            stmt = self.conn.prepare_cached(
                "SELECT amount FROM transactions
                 WHERE user_id=?1 AND transaction_type=?2 AND date BETWEEN ?3 AND ?4",
            )?;
            stmt.query(params![filter.user_id, filter.kind, filter.start, filter.end])?
        };

        let mut amounts = Vec::new();
        while let Some(r) = rows.next()? {
            amounts.push(decimal_at(r, 0, "amount")?);
        }
        let total = checked_total(amounts, "amount")?;
        tracing::debug!(
            user_id = filter.user_id,
            kind = %filter.kind,
            category_id = ?filter.category_id,
            start = %filter.start,
            end = %filter.end,
            total = ?total,
            "summed transactions"
        );
        Ok(total)
    }

    fn categories(
        &self,
        user_id: i64,
        kind: Option<EntryType>,
    ) -> Result<Vec<Category>, StoreError> {
        let mut out = Vec::new();
        if let Some(kind) = kind {
            let sql = format!(
                "SELECT {CATEGORY_COLS} FROM categories WHERE user_id=?1 AND category_type=?2 ORDER BY name, id"
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let mut rows = stmt.query(params![user_id, kind])?;
            while let Some(r) = rows.next()? {
                out.push(category_from_row(r)?);
            }
        } else {
            let sql = format!(
                "SELECT {CATEGORY_COLS} FROM categories WHERE user_id=?1 ORDER BY name, id"
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let mut rows = stmt.query(params![user_id])?;
            while let Some(r) = rows.next()? {
                out.push(category_from_row(r)?);
            }
        }
        Ok(out)
    }

    fn recent_transactions(
        &self,
        user_id: i64,
        limit: usize,
    ) -> Result<Vec<Transaction>, StoreError> {
        self.transactions(
            user_id,
            &TransactionQuery {
                limit: Some(limit),
                ..TransactionQuery::default()
            },
        )
    }

    fn investments(&self, user_id: i64, active_only: bool) -> Result<Vec<Investment>, StoreError> {
        let sql = if active_only {
            format!(
                "SELECT {INVESTMENT_COLS} FROM investments WHERE user_id=?1 AND is_active=1 ORDER BY id"
            )
        } else {
            format!("SELECT {INVESTMENT_COLS} FROM investments WHERE user_id=?1 ORDER BY id")
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![user_id])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            out.push(investment_from_row(r)?);
        }
        Ok(out)
    }
}

fn decimal_at(row: &Row<'_>, idx: usize, column: &'static str) -> Result<Decimal, StoreError> {
    let raw: String = row.get(idx)?;
    match raw.trim().parse::<Decimal>() {
        Ok(d) => Ok(d),
        Err(_) => Err(StoreError::Corrupt { column, value: raw }),
    }
}

fn category_from_row(r: &Row<'_>) -> Result<Category, StoreError> {
    let budget_limit = match r.get::<_, Option<String>>(7)? {
        Some(raw) if !raw.trim().is_empty() => Some(decimal_at(r, 7, "budget_limit")?),
        _ => None,
    };
    Ok(Category {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        description: r.get(3)?,
        category_type: r.get(4)?,
        color: r.get(5)?,
        icon: r.get(6)?,
        budget_limit,
    })
}

fn transaction_from_row(r: &Row<'_>) -> Result<Transaction, StoreError> {
    Ok(Transaction {
        id: r.get(0)?,
        user_id: r.get(1)?,
        category_id: r.get(2)?,
        amount: decimal_at(r, 3, "amount")?,
        description: r.get(4)?,
        transaction_type: r.get(5)?,
        date: r.get(6)?,
        recurrence: r.get(7)?,
    })
}

fn investment_from_row(r: &Row<'_>) -> Result<Investment, StoreError> {
    Ok(Investment {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        investment_type: r.get(3)?,
        initial_amount: decimal_at(r, 4, "initial_amount")?,
        current_value: decimal_at(r, 5, "current_value")?,
        description: r.get(6)?,
        start_date: r.get(7)?,
        expected_return: decimal_at(r, 8, "expected_return")?,
        risk_level: r.get(9)?,
        is_active: r.get(10)?,
    })
}

fn budget_from_row(r: &Row<'_>) -> Result<Budget, StoreError> {
    Ok(Budget {
        id: r.get(0)?,
        user_id: r.get(1)?,
        category_id: r.get(2)?,
        month: r.get(3)?,
        allocated_amount: decimal_at(r, 4, "allocated_amount")?,
        spent_amount: decimal_at(r, 5, "spent_amount")?,
    })
}
