// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finclip::error::StoreError;
use finclip::models::{EntryType, Investment, InvestmentType, RiskLevel, percent_change};
use finclip::report::{
    MonthWindow, MonthWindows, breakdown_by_category, build_monthly_series, chart_data,
    dashboard, days_in_month, sum_amount,
};
use finclip::store::MemoryStore;
use rust_decimal::Decimal;

const ALICE: i64 = 1;
const BOB: i64 = 2;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn setup() -> MemoryStore {
    let mut store = MemoryStore::new();
    let salary = store.add_category(ALICE, "Salary", EntryType::Income, "#82e0aa");
    let food = store.add_category(ALICE, "Food", EntryType::Expense, "#ff6b6b");
    let rent = store.add_category(ALICE, "Rent", EntryType::Expense, "#45b7d1");
    let bob_food = store.add_category(BOB, "Food", EntryType::Expense, "#ff6b6b");

    store.add_transaction(ALICE, salary, EntryType::Income, dec("3000.00"), d(2024, 1, 31));
    store.add_transaction(ALICE, salary, EntryType::Income, dec("3000.00"), d(2024, 2, 29));
    store.add_transaction(ALICE, food, EntryType::Expense, dec("40.10"), d(2024, 1, 1));
    store.add_transaction(ALICE, food, EntryType::Expense, dec("59.90"), d(2024, 1, 20));
    store.add_transaction(ALICE, rent, EntryType::Expense, dec("1200.00"), d(2024, 2, 1));
    store.add_transaction(BOB, bob_food, EntryType::Expense, dec("999.99"), d(2024, 1, 10));
    store
}

#[test]
fn sum_is_zero_when_nothing_matches() {
    let store = setup();
    let total = sum_amount(&store, ALICE, EntryType::Investment, d(2024, 1, 1), d(2024, 12, 31))
        .unwrap();
    assert_eq!(total, Decimal::ZERO);

    let empty = MemoryStore::new();
    let total = sum_amount(&empty, ALICE, EntryType::Expense, d(2024, 1, 1), d(2024, 1, 31))
        .unwrap();
    assert_eq!(total, Decimal::ZERO);
}

#[test]
fn sum_is_inclusive_and_scoped_to_user() {
    let store = setup();
    let jan = sum_amount(&store, ALICE, EntryType::Expense, d(2024, 1, 1), d(2024, 1, 20)).unwrap();
    assert_eq!(jan, dec("100.00"));

    let bob = sum_amount(&store, BOB, EntryType::Expense, d(2024, 1, 1), d(2024, 1, 31)).unwrap();
    assert_eq!(bob, dec("999.99"));
}

#[test]
fn sum_is_additive_over_adjacent_ranges() {
    let store = setup();
    let split = d(2024, 1, 20);
    let left = sum_amount(&store, ALICE, EntryType::Expense, d(2024, 1, 1), split).unwrap();
    let right = sum_amount(
        &store,
        ALICE,
        EntryType::Expense,
        split.succ_opt().unwrap(),
        d(2024, 3, 31),
    )
    .unwrap();
    let whole = sum_amount(&store, ALICE, EntryType::Expense, d(2024, 1, 1), d(2024, 3, 31)).unwrap();
    assert_eq!(left + right, whole);
    assert_eq!(whole, dec("1300.00"));
}

#[test]
fn windows_normalize_to_month_boundaries() {
    let windows: Vec<MonthWindow> = MonthWindows::new(d(2024, 1, 15), d(2024, 3, 10)).collect();
    assert_eq!(
        windows,
        vec![
            MonthWindow { start: d(2024, 1, 1), end: d(2024, 1, 31) },
            MonthWindow { start: d(2024, 2, 1), end: d(2024, 2, 29) },
            MonthWindow { start: d(2024, 3, 1), end: d(2024, 3, 31) },
        ]
    );
}

#[test]
fn windows_roll_over_years_and_restart() {
    let windows = MonthWindows::new(d(2022, 11, 30), d(2023, 2, 1));
    let first: Vec<_> = windows.clone().map(|w| (w.start, w.end)).collect();
    assert_eq!(
        first,
        vec![
            (d(2022, 11, 1), d(2022, 11, 30)),
            (d(2022, 12, 1), d(2022, 12, 31)),
            (d(2023, 1, 1), d(2023, 1, 31)),
            (d(2023, 2, 1), d(2023, 2, 28)),
        ]
    );
    let again: Vec<_> = windows.map(|w| (w.start, w.end)).collect();
    assert_eq!(first, again);
}

#[test]
fn windows_empty_when_start_after_end() {
    assert_eq!(MonthWindows::new(d(2024, 5, 1), d(2024, 4, 30)).count(), 0);
    // same month, start day after end day still yields that month
    assert_eq!(MonthWindows::new(d(2024, 4, 20), d(2024, 4, 10)).count(), 1);
}

#[test]
fn month_lengths() {
    assert_eq!(days_in_month(2024, 2), 29);
    assert_eq!(days_in_month(2023, 2), 28);
    assert_eq!(days_in_month(1900, 2), 28);
    assert_eq!(days_in_month(2000, 2), 29);
    assert_eq!(days_in_month(2024, 4), 30);
    assert_eq!(days_in_month(2024, 12), 31);
}

#[test]
fn monthly_series_matches_windows_and_balances() {
    let store = setup();
    let (start, end) = (d(2023, 12, 5), d(2024, 3, 10));
    let series = build_monthly_series(&store, ALICE, start, end).unwrap();
    assert_eq!(series.len(), MonthWindows::new(start, end).count());
    for p in &series {
        assert_eq!(p.balance, p.income - p.expense);
    }

    let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, ["Dec 2023", "Jan 2024", "Feb 2024", "Mar 2024"]);
    assert_eq!(series[0].period, "2023-12");
    assert_eq!(series[0].income, Decimal::ZERO);
    assert_eq!(series[1].expense, dec("100.00"));
    assert_eq!(series[1].balance, dec("2900.00"));
    assert_eq!(series[2].balance, dec("1800.00"));
    assert_eq!(series[3].balance, Decimal::ZERO);

    let chart = series[1].to_chart_row();
    assert_eq!(chart.income, 3000.0);
    assert_eq!(chart.expense, 100.0);
}

#[test]
fn breakdown_skips_zero_totals() {
    let store = setup();
    let jan = breakdown_by_category(&store, ALICE, EntryType::Expense, d(2024, 1, 1), d(2024, 1, 31))
        .unwrap();
    assert_eq!(jan.len(), 1);
    assert_eq!(jan[0].name, "Food");
    assert_eq!(jan[0].total, dec("100.00"));
    assert_eq!(jan[0].color, "#ff6b6b");
}

#[test]
fn breakdown_follows_category_name_order() {
    let mut store = setup();
    let bills = store.add_category(ALICE, "Bills", EntryType::Expense, "#ffeaa7");
    store.add_transaction(ALICE, bills, EntryType::Expense, dec("10"), d(2024, 2, 3));
    let all = breakdown_by_category(&store, ALICE, EntryType::Expense, d(2024, 1, 1), d(2024, 2, 29))
        .unwrap();
    let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Bills", "Food", "Rent"]);
}

#[test]
fn breakdown_uses_kind_for_categories_and_transactions() {
    let mut store = setup();
    let snacks = store.add_category(ALICE, "Snacks", EntryType::Expense, "#dda0dd");
    // income booked against an expense category is not expense spending
    store.add_transaction(ALICE, snacks, EntryType::Income, dec("25"), d(2024, 1, 2));
    let exp = breakdown_by_category(&store, ALICE, EntryType::Expense, d(2024, 1, 1), d(2024, 1, 31))
        .unwrap();
    assert!(exp.iter().all(|c| c.name != "Snacks"));

    let inc = breakdown_by_category(&store, ALICE, EntryType::Income, d(2024, 1, 1), d(2024, 1, 31))
        .unwrap();
    assert_eq!(inc.len(), 1);
    assert_eq!(inc[0].name, "Salary");
}

fn investment(initial: &str, current: &str, active: bool) -> Investment {
    Investment {
        id: 0,
        user_id: ALICE,
        name: "Index fund".into(),
        investment_type: InvestmentType::Stock,
        initial_amount: dec(initial),
        current_value: dec(current),
        description: String::new(),
        start_date: d(2023, 1, 1),
        expected_return: dec("7"),
        risk_level: RiskLevel::Medium,
        is_active: active,
    }
}

#[test]
fn dashboard_current_month() {
    let mut store = setup();
    let broker = store.add_category(ALICE, "Broker", EntryType::Investment, "#bb8fce");
    store.add_transaction(ALICE, broker, EntryType::Investment, dec("500"), d(2024, 1, 5));
    store.add_investment(investment("1000", "1100", true));
    store.add_investment(investment("1000", "1300", true));
    store.add_investment(investment("5000", "0.01", false));

    let dash = dashboard(&store, ALICE, d(2024, 1, 17)).unwrap();
    assert_eq!(dash.month_label, "January 2024");
    assert_eq!(dash.income, dec("3000"));
    assert_eq!(dash.expense, dec("100"));
    assert_eq!(dash.investment, dec("500"));
    assert_eq!(dash.balance, dec("2400"));
    assert_eq!(dash.categories.len(), 1);
    assert_eq!(dash.recent.len(), 6);
    assert_eq!(dash.recent[0].date, d(2024, 2, 29));
    assert_eq!(dash.investments.len(), 2);
    assert_eq!(dash.investment_initial, dec("2000"));
    assert_eq!(dash.investment_value, dec("2400"));
    assert_eq!(dash.investment_roi, dec("20"));
}

#[test]
fn dashboard_without_investments_has_zero_roi() {
    let store = MemoryStore::new();
    let dash = dashboard(&store, ALICE, d(2024, 6, 1)).unwrap();
    assert_eq!(dash.investment_roi, Decimal::ZERO);
    assert_eq!(dash.balance, Decimal::ZERO);
    assert!(dash.recent.is_empty());
}

#[test]
fn chart_payload_covers_six_months() {
    let store = setup();
    let data = chart_data(&store, ALICE, d(2024, 3, 15)).unwrap();
    // 2023-09-17 .. 2024-03-15
    assert_eq!(data.months, ["Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar"]);
    assert_eq!(data.income.len(), data.months.len());
    assert_eq!(data.expense[5], 1200.0);
}

#[test]
fn roi_and_spent_percentage_guard_zero() {
    assert_eq!(investment("0", "100", true).roi(), Decimal::ZERO);
    assert_eq!(investment("200", "250", true).roi(), dec("25"));

    let b = finclip::models::Budget {
        id: 1,
        user_id: ALICE,
        category_id: 1,
        month: d(2024, 1, 1),
        allocated_amount: Decimal::ZERO,
        spent_amount: dec("10"),
    };
    assert_eq!(b.spent_percentage(), Decimal::ZERO);
    assert_eq!(b.remaining(), dec("-10"));
}

#[test]
fn overflowing_sum_is_an_error() {
    let mut store = MemoryStore::new();
    let food = store.add_category(ALICE, "Food", EntryType::Expense, "#ff6b6b");
    store.add_transaction(ALICE, food, EntryType::Expense, Decimal::MAX, d(2024, 1, 2));
    store.add_transaction(ALICE, food, EntryType::Expense, Decimal::MAX, d(2024, 1, 3));

    let err = sum_amount(&store, ALICE, EntryType::Expense, d(2024, 1, 1), d(2024, 1, 31))
        .unwrap_err();
    assert!(matches!(err, StoreError::Overflow { column: "amount" }));
    assert!(build_monthly_series(&store, ALICE, d(2024, 1, 1), d(2024, 1, 31)).is_err());

    // a single huge row still sums
    let one = sum_amount(&store, ALICE, EntryType::Expense, d(2024, 1, 1), d(2024, 1, 2)).unwrap();
    assert_eq!(one, Decimal::MAX);
}

#[test]
fn percent_change_that_does_not_fit_is_zero() {
    assert_eq!(percent_change(Decimal::ONE, Decimal::MAX), Decimal::ZERO);
    assert_eq!(percent_change(Decimal::new(1, 28), Decimal::MAX), Decimal::ZERO);
    assert_eq!(percent_change(Decimal::MAX, Decimal::MIN), Decimal::ZERO);
    assert_eq!(percent_change(dec("50"), dec("75")), dec("50"));
}
