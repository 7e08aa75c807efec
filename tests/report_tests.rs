// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use kakeibo::db;
use kakeibo::models::CategoryKind;
use kakeibo::reports::{budget_progress, category_usage, monthly_balances};
use kakeibo::store::categories::add_category;
use kakeibo::store::transactions::add_transaction;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn monthly_balances_groups_by_calendar_month() {
    let conn = setup();
    let salary = add_category(&conn, "給与", CategoryKind::Income, None).unwrap();
    let food = add_category(&conn, "食費", CategoryKind::Expense, None).unwrap();

    add_transaction(
        &conn,
        date("2024-01-15"),
        Decimal::from(300000),
        CategoryKind::Income,
        salary.id,
        None,
    )
    .unwrap();
    add_transaction(
        &conn,
        date("2024-01-20"),
        Decimal::from(50000),
        CategoryKind::Expense,
        food.id,
        None,
    )
    .unwrap();
    add_transaction(
        &conn,
        date("2024-02-01"),
        Decimal::from(20000),
        CategoryKind::Expense,
        food.id,
        None,
    )
    .unwrap();

    let months = monthly_balances(&conn).unwrap();
    assert_eq!(months.len(), 2);

    assert_eq!(months[0].month, "2024-01");
    assert_eq!(months[0].income, Decimal::from(300000));
    assert_eq!(months[0].expense, Decimal::from(50000));
    assert_eq!(months[0].balance(), Decimal::from(250000));

    assert_eq!(months[1].month, "2024-02");
    assert_eq!(months[1].income, Decimal::ZERO);
    assert_eq!(months[1].expense, Decimal::from(20000));
    assert_eq!(months[1].balance(), Decimal::from(-20000));
}

#[test]
fn monthly_balances_is_empty_without_transactions() {
    let conn = setup();
    assert!(monthly_balances(&conn).unwrap().is_empty());
}

#[test]
fn category_usage_includes_idle_categories() {
    let conn = setup();
    let food = add_category(&conn, "食費", CategoryKind::Expense, None).unwrap();
    let hobby = add_category(&conn, "娯楽費", CategoryKind::Expense, None).unwrap();

    add_transaction(
        &conn,
        date("2024-01-10"),
        Decimal::from(3000),
        CategoryKind::Expense,
        food.id,
        None,
    )
    .unwrap();
    add_transaction(
        &conn,
        date("2024-01-25"),
        Decimal::from(1500),
        CategoryKind::Expense,
        food.id,
        None,
    )
    .unwrap();

    let usage = category_usage(&conn, CategoryKind::Expense, date("2024-01-15")).unwrap();
    assert_eq!(usage.len(), 2);

    assert_eq!(usage[0].category_id, food.id);
    assert_eq!(usage[0].amount, Decimal::from(4500));
    assert_eq!(usage[0].count, 2);

    assert_eq!(usage[1].category_id, hobby.id);
    assert_eq!(usage[1].amount, Decimal::ZERO);
    assert_eq!(usage[1].count, 0);
}

#[test]
fn category_usage_only_counts_the_reference_month() {
    let conn = setup();
    let food = add_category(&conn, "食費", CategoryKind::Expense, None).unwrap();
    add_transaction(
        &conn,
        date("2024-01-10"),
        Decimal::from(3000),
        CategoryKind::Expense,
        food.id,
        None,
    )
    .unwrap();
    add_transaction(
        &conn,
        date("2024-02-10"),
        Decimal::from(7000),
        CategoryKind::Expense,
        food.id,
        None,
    )
    .unwrap();

    let january = category_usage(&conn, CategoryKind::Expense, date("2024-01-31")).unwrap();
    assert_eq!(january[0].amount, Decimal::from(3000));

    let february = category_usage(&conn, CategoryKind::Expense, date("2024-02-01")).unwrap();
    assert_eq!(february[0].amount, Decimal::from(7000));
}

#[test]
fn category_usage_filters_by_kind() {
    let conn = setup();
    add_category(&conn, "食費", CategoryKind::Expense, None).unwrap();
    add_category(&conn, "給与", CategoryKind::Income, None).unwrap();

    let usage = category_usage(&conn, CategoryKind::Income, date("2024-01-15")).unwrap();
    assert_eq!(usage.len(), 1);
    assert_eq!(usage[0].name, "給与");
}

#[test]
fn budget_progress_is_spend_over_budget() {
    let conn = setup();
    let food = add_category(
        &conn,
        "食費",
        CategoryKind::Expense,
        Some(Decimal::from(10000)),
    )
    .unwrap();
    add_transaction(
        &conn,
        date("2024-01-10"),
        Decimal::from(4500),
        CategoryKind::Expense,
        food.id,
        None,
    )
    .unwrap();

    let usage = category_usage(&conn, CategoryKind::Expense, date("2024-01-15")).unwrap();
    assert_eq!(budget_progress(&usage[0]), Some(Decimal::from(45)));
}

#[test]
fn budget_progress_caps_at_one_hundred() {
    let conn = setup();
    let food = add_category(
        &conn,
        "食費",
        CategoryKind::Expense,
        Some(Decimal::from(1000)),
    )
    .unwrap();
    add_transaction(
        &conn,
        date("2024-01-10"),
        Decimal::from(2500),
        CategoryKind::Expense,
        food.id,
        None,
    )
    .unwrap();

    let usage = category_usage(&conn, CategoryKind::Expense, date("2024-01-15")).unwrap();
    assert_eq!(budget_progress(&usage[0]), Some(Decimal::from(100)));
}

#[test]
fn budget_progress_is_undefined_without_a_budget() {
    let conn = setup();
    add_category(&conn, "食費", CategoryKind::Expense, None).unwrap();
    let usage = category_usage(&conn, CategoryKind::Expense, date("2024-01-15")).unwrap();
    assert_eq!(budget_progress(&usage[0]), None);
}
