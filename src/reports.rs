// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Result;
use crate::models::{AssetSnapshot, CategoryKind};
use crate::store::{self, parse_stored_decimal, parse_stored_kind};
use crate::utils::month_key;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyBalance {
    /// `YYYY-MM`
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
}

impl MonthlyBalance {
    pub fn balance(&self) -> Decimal {
        self.income - self.expense
    }
}

/// Per-month income/expense sums over all transactions, one row per month
/// that has at least one transaction, oldest month first. Amounts are
/// accumulated as decimals rather than summed in SQL over the text column.
pub fn monthly_balances(conn: &Connection) -> Result<Vec<MonthlyBalance>> {
    let mut stmt =
        conn.prepare("SELECT substr(date,1,7) AS month, amount, kind FROM transactions")?;
    let mut rows = stmt.query([])?;

    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    while let Some(r) = rows.next()? {
        let month: String = r.get(0)?;
        let amount_s: String = r.get(1)?;
        let kind_s: String = r.get(2)?;
        let amount = parse_stored_decimal(&amount_s, "amount")?;
        let entry = map.entry(month).or_insert((Decimal::ZERO, Decimal::ZERO));
        match parse_stored_kind(&kind_s)? {
            CategoryKind::Income => entry.0 += amount,
            CategoryKind::Expense => entry.1 += amount,
        }
    }
    Ok(map
        .into_iter()
        .map(|(month, (income, expense))| MonthlyBalance {
            month,
            income,
            expense,
        })
        .collect())
}

/// A category's activity within one month. Categories without transactions
/// appear with a zero amount and count.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryUsage {
    pub category_id: i64,
    pub name: String,
    pub kind: CategoryKind,
    pub is_active: bool,
    pub budget: Option<Decimal>,
    pub amount: Decimal,
    pub count: i64,
}

/// Usage of every category of `kind` in the month containing `as_of`,
/// ordered by sort_order. The reference date is a parameter so callers (and
/// tests) decide what "now" means.
pub fn category_usage(
    conn: &Connection,
    kind: CategoryKind,
    as_of: NaiveDate,
) -> Result<Vec<CategoryUsage>> {
    let month = month_key(as_of);
    let categories = store::categories::list_categories(conn, Some(kind), false)?;

    let mut tx_stmt = conn
        .prepare("SELECT amount FROM transactions WHERE category_id=?1 AND substr(date,1,7)=?2")?;
    let mut data = Vec::new();
    for cat in categories {
        let mut rows = tx_stmt.query(params![cat.id, month])?;
        let mut amount = Decimal::ZERO;
        let mut count = 0i64;
        while let Some(r) = rows.next()? {
            let amount_s: String = r.get(0)?;
            amount += parse_stored_decimal(&amount_s, "amount")?;
            count += 1;
        }
        data.push(CategoryUsage {
            category_id: cat.id,
            name: cat.name,
            kind: cat.kind,
            is_active: cat.is_active,
            budget: cat.budget,
            amount,
            count,
        });
    }
    Ok(data)
}

/// Share of the monthly budget consumed, as a percentage capped at 100.
/// `None` when the category has no budget (or a zero budget, which would
/// otherwise divide by zero).
pub fn budget_progress(usage: &CategoryUsage) -> Option<Decimal> {
    let budget = usage.budget?;
    if budget <= Decimal::ZERO {
        return None;
    }
    let pct = usage.amount / budget * Decimal::ONE_HUNDRED;
    Some(pct.min(Decimal::ONE_HUNDRED))
}

/// Snapshot series for the trend chart, oldest first, with the change
/// between the earliest and latest balance.
#[derive(Debug, Clone, Serialize)]
pub struct AssetTrend {
    pub points: Vec<AssetSnapshot>,
    pub delta: Decimal,
}

pub fn asset_trend(conn: &Connection) -> Result<AssetTrend> {
    let points = store::assets::list_asset_snapshots(conn)?;
    let delta = match (points.first(), points.last()) {
        (Some(first), Some(last)) => last.balance - first.balance,
        _ => Decimal::ZERO,
    };
    Ok(AssetTrend { points, delta })
}
