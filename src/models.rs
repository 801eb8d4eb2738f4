// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Closed set of upper-case labels persisted as TEXT.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let t = s.trim();
                $(
                    if t.eq_ignore_ascii_case($text) {
                        return Ok($name::$variant);
                    }
                )+
                Err(ValidationError::UnknownVariant {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: ValidationError| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

text_enum!(
    /// Kind shared by categories and transactions. A transaction's kind is
    /// not tied to the kind of its category.
    EntryType, "entry type" {
        Income => "INCOME",
        Expense => "EXPENSE",
        Investment => "INVESTMENT",
    }
);

text_enum!(
    RecurrenceInterval, "recurrence interval" {
        Daily => "DAILY",
        Weekly => "WEEKLY",
        Monthly => "MONTHLY",
        Yearly => "YEARLY",
    }
);

text_enum!(
    InvestmentType, "investment type" {
        Stock => "STOCK",
        Bond => "BOND",
        RealEstate => "REAL_ESTATE",
        Crypto => "CRYPTO",
        Savings => "SAVINGS",
        Other => "OTHER",
    }
);

text_enum!(
    RiskLevel, "risk level" {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
    }
);

pub const DEFAULT_COLOR: &str = "#007bff";
pub const DEFAULT_ICON: &str = "fas fa-wallet";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub category_type: EntryType,
    pub color: String, // #RRGGBB
    pub icon: String,
    pub budget_limit: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub amount: Decimal,
    pub description: String,
    pub transaction_type: EntryType,
    pub date: NaiveDate,
    pub recurrence: Option<RecurrenceInterval>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub investment_type: InvestmentType,
    pub initial_amount: Decimal,
    pub current_value: Decimal,
    pub description: String,
    pub start_date: NaiveDate,
    pub expected_return: Decimal, // percent
    pub risk_level: RiskLevel,
    pub is_active: bool,
}

impl Investment {
    /// Return on investment in percent; 0 when nothing was invested.
    pub fn roi(&self) -> Decimal {
        percent_change(self.initial_amount, self.current_value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub month: NaiveDate, // first day of the month
    pub allocated_amount: Decimal,
    pub spent_amount: Decimal,
}

impl Budget {
    pub fn remaining(&self) -> Decimal {
        self.allocated_amount.saturating_sub(self.spent_amount)
    }

    /// Share of the allocation already spent, in percent; 0 for an empty
    /// allocation.
    pub fn spent_percentage(&self) -> Decimal {
        ratio_percent(self.spent_amount, self.allocated_amount)
    }
}

/// `(current - initial) / initial * 100`, or 0 when `initial` is zero or
/// the result does not fit.
pub fn percent_change(initial: Decimal, current: Decimal) -> Decimal {
    current
        .checked_sub(initial)
        .map(|delta| ratio_percent(delta, initial))
        .unwrap_or(Decimal::ZERO)
}

fn ratio_percent(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator
        .checked_div(denominator)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}
