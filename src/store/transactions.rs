// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{parse_stored_decimal, parse_stored_kind};
use crate::error::{Error, Result};
use crate::models::{CategoryKind, Transaction};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

pub const MAX_MEMO_LEN: usize = 200;

/// Records one dated income or expense row. The amount must be positive, the
/// category must exist, and the transaction kind must agree with the
/// category's kind.
pub fn add_transaction(
    conn: &Connection,
    date: NaiveDate,
    amount: Decimal,
    kind: CategoryKind,
    category_id: i64,
    memo: Option<&str>,
) -> Result<Transaction> {
    if amount <= Decimal::ZERO {
        return Err(Error::Validation("amount must be positive".into()));
    }
    if let Some(m) = memo {
        if m.chars().count() > MAX_MEMO_LEN {
            return Err(Error::Validation(format!(
                "memo must be at most {} characters",
                MAX_MEMO_LEN
            )));
        }
    }
    let cat_kind: Option<String> = conn
        .query_row(
            "SELECT kind FROM categories WHERE id=?1",
            params![category_id],
            |r| r.get(0),
        )
        .optional()?;
    let Some(cat_kind) = cat_kind else {
        return Err(Error::Validation(format!(
            "unknown category {}",
            category_id
        )));
    };
    if parse_stored_kind(&cat_kind)? != kind {
        return Err(Error::Validation(format!(
            "transaction kind '{}' does not match category kind '{}'",
            kind.as_str(),
            cat_kind
        )));
    }

    conn.execute(
        "INSERT INTO transactions(date, amount, kind, category_id, memo)
         VALUES (?1,?2,?3,?4,?5)",
        params![date, amount.to_string(), kind.as_str(), category_id, memo],
    )?;
    let id = conn.last_insert_rowid();
    info!(id, %date, %amount, kind = kind.as_str(), category_id, "transaction recorded");
    get_transaction(conn, id)
}

fn get_transaction(conn: &Connection, id: i64) -> Result<Transaction> {
    let (tid, date, amount_s, kind_s, category_id, memo, created_at) = conn.query_row(
        "SELECT id, date, amount, kind, category_id, memo, created_at
         FROM transactions WHERE id=?1",
        params![id],
        |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, NaiveDate>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, i64>(4)?,
                r.get::<_, Option<String>>(5)?,
                r.get::<_, NaiveDateTime>(6)?,
            ))
        },
    )?;
    Ok(Transaction {
        id: tid,
        date,
        amount: parse_stored_decimal(&amount_s, "amount")?,
        kind: parse_stored_kind(&kind_s)?,
        category_id,
        memo,
        created_at,
    })
}

/// One row of the recent-activity panel: a transaction joined with its
/// category name.
#[derive(Debug, Clone, Serialize)]
pub struct RecentTransaction {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub kind: CategoryKind,
    pub category: String,
    pub memo: Option<String>,
}

/// The most recently created transactions, newest first, up to `limit` rows.
pub fn recent_transactions(conn: &Connection, limit: usize) -> Result<Vec<RecentTransaction>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.date, t.amount, t.kind, c.name, t.memo
         FROM transactions t JOIN categories c ON t.category_id=c.id
         ORDER BY t.id DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit as i64], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, NaiveDate>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, Option<String>>(5)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (id, date, amount_s, kind_s, category, memo) = row?;
        data.push(RecentTransaction {
            id,
            date,
            amount: parse_stored_decimal(&amount_s, "amount")?,
            kind: parse_stored_kind(&kind_s)?,
            category,
            memo,
        });
    }
    Ok(data)
}
