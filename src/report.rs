// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period sums, calendar-month windows and the reports built from them.
//!
//! Everything here is a read over a [`FinanceStore`]; amounts stay
//! [`Decimal`] until a chart row is produced.

use std::iter::FusedIterator;

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::StoreError;
use crate::models::{EntryType, Investment, Transaction, percent_change};
use crate::store::{AmountFilter, FinanceStore, checked_total};
use crate::utils::to_f64;

/// Lookback of the monthly income/expense report.
pub const REPORT_LOOKBACK_DAYS: u64 = 365;
/// Lookback of category spending and of the chart payload.
pub const SPENDING_LOOKBACK_DAYS: u64 = 180;
pub const RECENT_TRANSACTIONS: usize = 10;

/// Total amount of the user's `kind` transactions dated within
/// `[start, end]`. Zero when nothing matches.
pub fn sum_amount<S: FinanceStore + ?Sized>(
    store: &S,
    user_id: i64,
    kind: EntryType,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Decimal, StoreError> {
    sum_filtered(
        store,
        &AmountFilter {
            user_id,
            kind,
            category_id: None,
            start,
            end,
        },
    )
}

/// [`sum_amount`] restricted to one category.
pub fn sum_amount_in_category<S: FinanceStore + ?Sized>(
    store: &S,
    user_id: i64,
    kind: EntryType,
    category_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Decimal, StoreError> {
    sum_filtered(
        store,
        &AmountFilter {
            user_id,
            kind,
            category_id: Some(category_id),
            start,
            end,
        },
    )
}

fn sum_filtered<S: FinanceStore + ?Sized>(
    store: &S,
    filter: &AmountFilter,
) -> Result<Decimal, StoreError> {
    Ok(store.sum_amount(filter)?.unwrap_or(Decimal::ZERO))
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        _ => 28,
    }
}

/// One calendar month, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    /// The calendar month `date` falls in.
    pub fn containing(date: NaiveDate) -> Self {
        let last = days_in_month(date.year(), date.month());
        MonthWindow {
            start: date.with_day(1).unwrap_or(date),
            end: date.with_day(last).unwrap_or(date),
        }
    }

    /// `YYYY-MM`
    pub fn period(&self) -> String {
        self.start.format("%Y-%m").to_string()
    }

    /// `Jan 2024`
    pub fn label(&self) -> String {
        self.start.format("%b %Y").to_string()
    }

    pub fn short_label(&self) -> String {
        self.start.format("%b").to_string()
    }
}

/// Calendar months from the month of `anchor_start` through the month of
/// `anchor_end`, oldest first.
///
/// The first window always opens on the 1st, even when `anchor_start` is
/// mid-month, so it can reach back before the anchor. Cloning restarts the
/// sequence from wherever the clone was taken.
#[derive(Debug, Clone)]
pub struct MonthWindows {
    next_start: Option<NaiveDate>,
    anchor_end: NaiveDate,
}

impl MonthWindows {
    pub fn new(anchor_start: NaiveDate, anchor_end: NaiveDate) -> Self {
        MonthWindows {
            next_start: Some(MonthWindow::containing(anchor_start).start),
            anchor_end,
        }
    }
}

impl Iterator for MonthWindows {
    type Item = MonthWindow;

    fn next(&mut self) -> Option<MonthWindow> {
        let start = self.next_start.filter(|s| *s <= self.anchor_end)?;
        let window = MonthWindow::containing(start);
        self.next_start = window.end.succ_opt();
        Some(window)
    }
}

impl FusedIterator for MonthWindows {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub period: String,
    pub label: String,
    pub window: MonthWindow,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

/// Float row for chart rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyChartRow {
    pub period: String,
    pub label: String,
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

impl MonthlyPoint {
    pub fn to_chart_row(&self) -> MonthlyChartRow {
        MonthlyChartRow {
            period: self.period.clone(),
            label: self.label.clone(),
            income: to_f64(self.income),
            expense: to_f64(self.expense),
            balance: to_f64(self.balance),
        }
    }
}

/// Income, expense and balance for every window of
/// [`MonthWindows::new(anchor_start, anchor_end)`](MonthWindows::new).
/// Empty months are kept with zero values.
pub fn build_monthly_series<S: FinanceStore + ?Sized>(
    store: &S,
    user_id: i64,
    anchor_start: NaiveDate,
    anchor_end: NaiveDate,
) -> Result<Vec<MonthlyPoint>, StoreError> {
    let series = MonthWindows::new(anchor_start, anchor_end)
        .map(|w| {
            let income = sum_amount(store, user_id, EntryType::Income, w.start, w.end)?;
            let expense = sum_amount(store, user_id, EntryType::Expense, w.start, w.end)?;
            Ok(MonthlyPoint {
                period: w.period(),
                label: w.label(),
                window: w,
                income,
                expense,
                balance: income.saturating_sub(expense),
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;
    tracing::debug!(user_id, months = series.len(), "built monthly series");
    Ok(series)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category_id: i64,
    pub name: String,
    pub total: Decimal,
    pub color: String,
    pub icon: String,
}

/// Float row for the spending chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryChartRow {
    pub name: String,
    pub total: f64,
    pub color: String,
}

impl CategoryTotal {
    pub fn to_chart_row(&self) -> CategoryChartRow {
        CategoryChartRow {
            name: self.name.clone(),
            total: to_f64(self.total),
            color: self.color.clone(),
        }
    }
}

/// Per-category totals of `kind` transactions in `[start, end]`, over the
/// user's categories of that same kind, in category-name order. Categories
/// with nothing recorded are left out.
pub fn breakdown_by_category<S: FinanceStore + ?Sized>(
    store: &S,
    user_id: i64,
    kind: EntryType,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<CategoryTotal>, StoreError> {
    let mut out = Vec::new();
    for cat in store.categories(user_id, Some(kind))? {
        let total = sum_amount_in_category(store, user_id, kind, cat.id, start, end)?;
        if total > Decimal::ZERO {
            out.push(CategoryTotal {
                category_id: cat.id,
                name: cat.name,
                total,
                color: cat.color,
                icon: cat.icon,
            });
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub month: MonthWindow,
    pub month_label: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub investment: Decimal,
    /// income - expense - investment
    pub balance: Decimal,
    pub categories: Vec<CategoryTotal>,
    pub recent: Vec<Transaction>,
    pub investments: Vec<Investment>,
    pub investment_value: Decimal,
    pub investment_initial: Decimal,
    pub investment_roi: Decimal,
}

/// Figures for the calendar month containing `today`, plus the active
/// investments summary.
pub fn dashboard<S: FinanceStore + ?Sized>(
    store: &S,
    user_id: i64,
    today: NaiveDate,
) -> Result<Dashboard, StoreError> {
    let month = MonthWindow::containing(today);
    let income = sum_amount(store, user_id, EntryType::Income, month.start, month.end)?;
    let expense = sum_amount(store, user_id, EntryType::Expense, month.start, month.end)?;
    let investment = sum_amount(store, user_id, EntryType::Investment, month.start, month.end)?;
    let categories =
        breakdown_by_category(store, user_id, EntryType::Expense, month.start, month.end)?;
    let recent = store.recent_transactions(user_id, RECENT_TRANSACTIONS)?;
    let investments = store.investments(user_id, true)?;

    let investment_value =
        checked_total(investments.iter().map(|i| i.current_value), "current_value")?
            .unwrap_or(Decimal::ZERO);
    let investment_initial =
        checked_total(investments.iter().map(|i| i.initial_amount), "initial_amount")?
            .unwrap_or(Decimal::ZERO);
    let investment_roi = if investment_initial > Decimal::ZERO {
        percent_change(investment_initial, investment_value)
    } else {
        Decimal::ZERO
    };

    Ok(Dashboard {
        month,
        month_label: month.start.format("%B %Y").to_string(),
        income,
        expense,
        investment,
        balance: income.saturating_sub(expense).saturating_sub(investment),
        categories,
        recent,
        investments,
        investment_value,
        investment_initial,
        investment_roi,
    })
}

/// Parallel arrays consumed by the income/expense chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub months: Vec<String>,
    pub income: Vec<f64>,
    pub expense: Vec<f64>,
}

/// Income and expense per month over the last [`SPENDING_LOOKBACK_DAYS`].
pub fn chart_data<S: FinanceStore + ?Sized>(
    store: &S,
    user_id: i64,
    today: NaiveDate,
) -> Result<ChartData, StoreError> {
    let start = lookback(today, SPENDING_LOOKBACK_DAYS);
    let series = build_monthly_series(store, user_id, start, today)?;
    Ok(ChartData {
        months: series.iter().map(|p| p.window.short_label()).collect(),
        income: series.iter().map(|p| to_f64(p.income)).collect(),
        expense: series.iter().map(|p| to_f64(p.expense)).collect(),
    })
}

/// `today - days`, saturating at the earliest representable date.
pub fn lookback(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}
