// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finclip::models::User;
use finclip::report::CategoryTotal;
use finclip::{cli, commands::reports, commands::users, db};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> (Connection, User) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let user = users::add_user(&conn, "alice", None).unwrap();
    (conn, user)
}

fn category(conn: &Connection, user: &User, name: &str, kind: &str) -> i64 {
    conn.execute(
        "INSERT INTO categories(user_id, name, category_type) VALUES (?1, ?2, ?3)",
        params![user.id, name, kind],
    )
    .unwrap();
    conn.last_insert_rowid()
}

fn txn(conn: &Connection, user: &User, cat: i64, kind: &str, amount: &str, date: &str) {
    conn.execute(
        "INSERT INTO transactions(user_id, category_id, amount, transaction_type, date) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![user.id, cat, amount, kind, date],
    )
    .unwrap();
}

/// Parses `finclip report <args..>` and hands the report subcommand to `f`.
fn with_report<T>(
    args: &[&str],
    f: impl FnOnce(&str, &clap::ArgMatches) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    let mut argv = vec!["finclip", "report"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().try_get_matches_from(argv)?;
    let Some(("report", m)) = matches.subcommand() else {
        panic!("report command not parsed");
    };
    let Some((name, sub)) = m.subcommand() else {
        panic!("no report subcommand");
    };
    f(name, sub)
}

#[test]
fn monthly_defaults_to_a_year_back_from_to() {
    let (conn, user) = setup();
    let pay = category(&conn, &user, "Salary", "INCOME");
    txn(&conn, &user, pay, "INCOME", "100", "2024-06-01");
    txn(&conn, &user, pay, "INCOME", "250", "2025-06-15");

    let series = with_report(&["monthly", "--to", "2025-06-15"], |_, sub| {
        reports::monthly_series(&conn, &user, sub)
    })
    .unwrap();
    // 2024-06-15 .. 2025-06-15, first window opens on the 1st
    assert_eq!(series.len(), 13);
    assert_eq!(series[0].period, "2024-06");
    assert_eq!(series[0].income, Decimal::from(100));
    assert_eq!(series[12].period, "2025-06");
    assert_eq!(series[12].income, Decimal::from(250));
}

#[test]
fn monthly_honours_explicit_range() {
    let (conn, user) = setup();
    let series = with_report(
        &["monthly", "--from", "2024-01-20", "--to", "2024-03-01"],
        |_, sub| reports::monthly_series(&conn, &user, sub),
    )
    .unwrap();
    let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, ["Jan 2024", "Feb 2024", "Mar 2024"]);
}

#[test]
fn from_after_to_is_rejected() {
    let (conn, user) = setup();
    let err = with_report(
        &["monthly", "--from", "2024-05-02", "--to", "2024-05-01"],
        |_, sub| reports::monthly_series(&conn, &user, sub),
    )
    .unwrap_err();
    assert!(err.to_string().contains("is after"));

    let err = with_report(
        &["by-category", "--from", "2024-05-02", "--to", "2024-05-01"],
        |_, sub| reports::category_breakdown(&conn, &user, sub),
    )
    .unwrap_err();
    assert!(err.to_string().contains("is after"));
}

#[test]
fn by_category_defaults_to_expense_over_180_days() {
    let (conn, user) = setup();
    let food = category(&conn, &user, "Food", "EXPENSE");
    let pay = category(&conn, &user, "Salary", "INCOME");
    // 2025-06-15 minus 180 days is 2024-12-17
    txn(&conn, &user, food, "EXPENSE", "1.00", "2024-12-16");
    txn(&conn, &user, food, "EXPENSE", "20.00", "2024-12-17");
    txn(&conn, &user, food, "EXPENSE", "5.50", "2025-06-15");
    txn(&conn, &user, pay, "INCOME", "900", "2025-06-01");

    let totals = with_report(&["by-category", "--to", "2025-06-15"], |_, sub| {
        reports::category_breakdown(&conn, &user, sub)
    })
    .unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].name, "Food");
    assert_eq!(totals[0].total, Decimal::from_str_exact("25.50").unwrap());

    let income = with_report(
        &["by-category", "--type", "income", "--to", "2025-06-15"],
        |_, sub| reports::category_breakdown(&conn, &user, sub),
    )
    .unwrap();
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].name, "Salary");
    assert_eq!(income[0].total, Decimal::from(900));
}

#[test]
fn category_chart_rows_carry_numeric_totals() {
    let (conn, user) = setup();
    let food = category(&conn, &user, "Food", "EXPENSE");
    txn(&conn, &user, food, "EXPENSE", "100.00", "2024-01-10");

    let totals = with_report(
        &["by-category", "--from", "2024-01-01", "--to", "2024-01-31", "--chart"],
        |_, sub| {
            assert!(sub.get_flag("chart"));
            reports::category_breakdown(&conn, &user, sub)
        },
    )
    .unwrap();
    let rows: Vec<_> = totals.iter().map(CategoryTotal::to_chart_row).collect();
    let json = serde_json::to_value(&rows).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{ "name": "Food", "total": 100.0, "color": "#007bff" }])
    );
}

#[test]
fn chart_flags_run_through_the_handler() {
    let (conn, user) = setup();
    let food = category(&conn, &user, "Food", "EXPENSE");
    txn(&conn, &user, food, "EXPENSE", "12.50", "2024-02-10");

    for args in [
        ["monthly", "--from", "2024-01-01", "--to", "2024-02-29", "--chart"],
        ["by-category", "--from", "2024-01-01", "--to", "2024-02-29", "--chart"],
    ] {
        let mut argv = vec!["finclip", "report"];
        argv.extend_from_slice(&args);
        let matches = cli::build_cli().get_matches_from(argv);
        let Some(("report", m)) = matches.subcommand() else {
            panic!("report command not parsed");
        };
        reports::handle(&conn, &user, m).unwrap();
    }

    let series = with_report(
        &["monthly", "--from", "2024-01-01", "--to", "2024-02-29", "--chart"],
        |_, sub| reports::monthly_series(&conn, &user, sub),
    )
    .unwrap();
    let chart = series[1].to_chart_row();
    assert_eq!(chart.expense, 12.5);
    assert_eq!(chart.balance, -12.5);
}
