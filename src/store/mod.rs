// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-side repository used by the report layer.
//!
//! [`SqliteStore`] backs the CLI; [`MemoryStore`] is a plain in-memory fake
//! with the same filtering rules, handy for exercising reports without a
//! database.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, TransactionQuery};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::StoreError;
use crate::models::{Category, EntryType, Investment, Transaction};

/// Conjunctive transaction filter: user AND kind AND `start <= date <= end`,
/// optionally narrowed to one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountFilter {
    pub user_id: i64,
    pub kind: EntryType,
    pub category_id: Option<i64>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AmountFilter {
    pub fn matches(&self, t: &Transaction) -> bool {
        t.user_id == self.user_id
            && t.transaction_type == self.kind
            && self.category_id.is_none_or(|c| c == t.category_id)
            && t.date >= self.start
            && t.date <= self.end
    }
}

/// Adds up `amounts` without wrapping; `None` when there is nothing to add.
pub fn checked_total<I>(amounts: I, column: &'static str) -> Result<Option<Decimal>, StoreError>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(None, |acc: Option<Decimal>, amount| {
        match acc {
            None => Ok(Some(amount)),
            Some(total) => total
                .checked_add(amount)
                .map(Some)
                .ok_or(StoreError::Overflow { column }),
        }
    })
}

pub trait FinanceStore {
    /// Sum of `amount` over the matching transactions, `None` when nothing
    /// matches.
    fn sum_amount(&self, filter: &AmountFilter) -> Result<Option<Decimal>, StoreError>;

    /// The user's categories ordered by name, optionally of one kind.
    fn categories(
        &self,
        user_id: i64,
        kind: Option<EntryType>,
    ) -> Result<Vec<Category>, StoreError>;

    /// Newest first: date descending, then insertion order descending.
    fn recent_transactions(
        &self,
        user_id: i64,
        limit: usize,
    ) -> Result<Vec<Transaction>, StoreError>;

    fn investments(&self, user_id: i64, active_only: bool) -> Result<Vec<Investment>, StoreError>;
}
