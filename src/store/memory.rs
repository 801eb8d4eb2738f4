// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{AmountFilter, FinanceStore, checked_total};
use crate::error::StoreError;
use crate::models::{Category, DEFAULT_ICON, EntryType, Investment, Transaction};

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    investments: Vec<Investment>,
    last_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    pub fn add_category(&mut self, user_id: i64, name: &str, kind: EntryType, color: &str) -> i64 {
        let id = self.next_id();
        self.categories.push(Category {
            id,
            user_id,
            name: name.to_string(),
            description: String::new(),
            category_type: kind,
            color: color.to_string(),
            icon: DEFAULT_ICON.to_string(),
            budget_limit: None,
        });
        id
    }

    pub fn add_transaction(
        &mut self,
        user_id: i64,
        category_id: i64,
        kind: EntryType,
        amount: Decimal,
        date: NaiveDate,
    ) -> i64 {
        let id = self.next_id();
        self.transactions.push(Transaction {
            id,
            user_id,
            category_id,
            amount,
            description: String::new(),
            transaction_type: kind,
            date,
            recurrence: None,
        });
        id
    }

    /// Stores `investment` under a fresh id and returns it.
    pub fn add_investment(&mut self, mut investment: Investment) -> i64 {
        investment.id = self.next_id();
        let id = investment.id;
        self.investments.push(investment);
        id
    }
}

impl FinanceStore for MemoryStore {
    fn sum_amount(&self, filter: &AmountFilter) -> Result<Option<Decimal>, StoreError> {
        checked_total(
            self.transactions
                .iter()
                .filter(|t| filter.matches(t))
                .map(|t| t.amount),
            "amount",
        )
    }

    fn categories(
        &self,
        user_id: i64,
        kind: Option<EntryType>,
    ) -> Result<Vec<Category>, StoreError> {
        let mut out: Vec<Category> = self
            .categories
            .iter()
            .filter(|c| c.user_id == user_id && kind.is_none_or(|k| k == c.category_type))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    fn recent_transactions(
        &self,
        user_id: i64,
        limit: usize,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut out: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        out.truncate(limit);
        Ok(out)
    }

    fn investments(&self, user_id: i64, active_only: bool) -> Result<Vec<Investment>, StoreError> {
        Ok(self
            .investments
            .iter()
            .filter(|i| i.user_id == user_id && (i.is_active || !active_only))
            .cloned()
            .collect())
    }
}
