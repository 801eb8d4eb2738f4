// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Once;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::ValidationError;

static TRACING_INIT: Once = Once::new();

/// Installs the stderr subscriber once. `RUST_LOG` replaces the default
/// `finclip=warn` filter when set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("finclip=warn"));
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_month(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidMonth(s.to_string()))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

static AMOUNT_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[$,\s]").expect("static regex"));
static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("static regex"));

/// Exclusive upper bound of any stored amount: ten digits, two of them
/// after the point.
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Money input as typed by a person: `$`, thousands separators and blanks
/// are dropped, the rest must be a positive decimal. Rounded to cents.
pub fn parse_amount(s: &str) -> Result<Decimal, ValidationError> {
    let cleaned = AMOUNT_NOISE.replace_all(s, "");
    let amount = cleaned
        .parse::<Decimal>()
        .map_err(|_| ValidationError::InvalidAmount(s.to_string()))?;
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    check_amount_limit(amount.round_dp(2))
}

/// Rejects amounts at or above [`AMOUNT_LIMIT`].
pub fn check_amount_limit(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount.abs() >= AMOUNT_LIMIT {
        return Err(ValidationError::AmountTooLarge(amount));
    }
    Ok(amount)
}

pub fn validate_color(s: &str) -> Result<String, ValidationError> {
    let t = s.trim();
    if HEX_COLOR.is_match(t) {
        Ok(t.to_lowercase())
    } else {
        Err(ValidationError::InvalidColor(s.to_string()))
    }
}

pub fn validate_expected_return(v: Decimal) -> Result<Decimal, ValidationError> {
    if v < Decimal::from(-100) || v > Decimal::from(1000) {
        return Err(ValidationError::ExpectedReturnOutOfRange(v));
    }
    Ok(v.round_dp(2))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("${:.2}", d.round_dp(2))
}

pub fn fmt_percent(d: &Decimal) -> String {
    format!("{:.2}%", d.round_dp(2))
}

/// Float view of an amount; only for chart payloads.
pub fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // arrays go out one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
