// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failure reading from or writing to the backing store.
///
/// Report operations never retry; whatever the store raises reaches the
/// caller as-is.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid {column} '{value}' in stored row")]
    Corrupt { column: &'static str, value: String },
    #[error("sum of {column} overflowed")]
    Overflow { column: &'static str },
}

/// Rejected user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid amount '{0}', expected a number like 450000.00")]
    InvalidAmount(String),
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,
    #[error("Amount {0} is too large, expected less than 100000000")]
    AmountTooLarge(Decimal),
    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
    #[error("Expected return {0} must be between -100 and 1000")]
    ExpectedReturnOutOfRange(Decimal),
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}
