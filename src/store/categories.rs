// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{parse_stored_decimal, parse_stored_kind};
use crate::db;
use crate::error::{Error, Result};
use crate::models::{Category, CategoryKind};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use tracing::{debug, info};

pub const MAX_NAME_LEN: usize = 50;

const SEED_EXPENSE: [&str; 9] = [
    "食費",
    "住居費",
    "光熱費",
    "通信費",
    "交通費",
    "教育費",
    "娯楽費",
    "医療費",
    "その他",
];
const SEED_INCOME: [&str; 4] = ["給与", "賞与", "副収入", "その他収入"];

/// Idempotently installs the default category set, creating the schema first
/// if needed. Existing (name, kind) pairs are left untouched, so repeated
/// calls are no-ops.
pub fn ensure_seed_categories(conn: &Connection) -> Result<()> {
    db::init_schema(conn)?;
    let mut stmt =
        conn.prepare("INSERT OR IGNORE INTO categories(name, kind, sort_order) VALUES (?1,?2,?3)")?;
    for (i, name) in SEED_EXPENSE.iter().enumerate() {
        stmt.execute(params![name, CategoryKind::Expense.as_str(), i as i64])?;
    }
    for (i, name) in SEED_INCOME.iter().enumerate() {
        stmt.execute(params![name, CategoryKind::Income.as_str(), i as i64])?;
    }
    debug!("seed categories ensured");
    Ok(())
}

pub fn get_category(conn: &Connection, id: i64) -> Result<Category> {
    let row = conn
        .query_row(
            "SELECT id, name, kind, sort_order, budget, is_active, created_at, updated_at
             FROM categories WHERE id=?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, i64>(3)?,
                    r.get::<_, Option<String>>(4)?,
                    r.get::<_, bool>(5)?,
                    r.get::<_, NaiveDateTime>(6)?,
                    r.get::<_, NaiveDateTime>(7)?,
                ))
            },
        )
        .optional()?;
    match row {
        Some((cid, name, kind_s, sort_order, budget_s, is_active, created_at, updated_at)) => {
            Ok(Category {
                id: cid,
                name,
                kind: parse_stored_kind(&kind_s)?,
                sort_order,
                budget: match budget_s {
                    Some(raw) => Some(parse_stored_decimal(&raw, "budget")?),
                    None => None,
                },
                is_active,
                created_at,
                updated_at,
            })
        }
        None => Err(Error::NotFound(format!("category {}", id))),
    }
}

/// Categories ordered by (kind, sort_order), optionally filtered to one kind
/// and/or to active rows only.
pub fn list_categories(
    conn: &Connection,
    kind: Option<CategoryKind>,
    active_only: bool,
) -> Result<Vec<Category>> {
    let mut sql = String::from(
        "SELECT id, name, kind, sort_order, budget, is_active, created_at, updated_at
         FROM categories WHERE 1=1",
    );
    if kind.is_some() {
        sql.push_str(" AND kind=?1");
    }
    if active_only {
        sql.push_str(" AND is_active=1");
    }
    sql.push_str(" ORDER BY kind, sort_order");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if let Some(k) = kind {
        stmt.query(params![k.as_str()])?
    } else {
        stmt.query([])?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let kind_s: String = r.get(2)?;
        let budget_s: Option<String> = r.get(4)?;
        data.push(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            kind: parse_stored_kind(&kind_s)?,
            sort_order: r.get(3)?,
            budget: match budget_s {
                Some(raw) => Some(parse_stored_decimal(&raw, "budget")?),
                None => None,
            },
            is_active: r.get(5)?,
            created_at: r.get(6)?,
            updated_at: r.get(7)?,
        });
    }
    Ok(data)
}

/// Inserts a new category at the end of its kind's ordering.
pub fn add_category(
    conn: &Connection,
    name: &str,
    kind: CategoryKind,
    budget: Option<Decimal>,
) -> Result<Category> {
    let name = validate_name(name)?;
    let budget = validate_budget(kind, budget)?;
    if find_by_name(conn, name, kind)?.is_some() {
        return Err(Error::Conflict(format!(
            "category '{}' already exists for kind '{}'",
            name,
            kind.as_str()
        )));
    }
    let next_order: i64 = conn.query_row(
        "SELECT IFNULL(MAX(sort_order) + 1, 0) FROM categories WHERE kind=?1",
        params![kind.as_str()],
        |r| r.get(0),
    )?;
    conn.execute(
        "INSERT INTO categories(name, kind, sort_order, budget) VALUES (?1,?2,?3,?4)",
        params![
            name,
            kind.as_str(),
            next_order,
            budget.map(|b| b.to_string())
        ],
    )?;
    let id = conn.last_insert_rowid();
    info!(id, name, kind = kind.as_str(), "category added");
    get_category(conn, id)
}

/// Renames a category and, for expense categories, replaces its budget.
pub fn update_category(
    conn: &Connection,
    id: i64,
    name: &str,
    budget: Option<Decimal>,
) -> Result<Category> {
    let current = get_category(conn, id)?;
    let name = validate_name(name)?;
    let budget = validate_budget(current.kind, budget)?;
    if let Some(other) = find_by_name(conn, name, current.kind)? {
        if other != id {
            return Err(Error::Conflict(format!(
                "category '{}' already exists for kind '{}'",
                name,
                current.kind.as_str()
            )));
        }
    }
    conn.execute(
        "UPDATE categories SET name=?1, budget=?2, updated_at=datetime('now') WHERE id=?3",
        params![name, budget.map(|b| b.to_string()), id],
    )?;
    info!(id, name, "category updated");
    get_category(conn, id)
}

/// Soft-delete toggle. A category that still has transactions must stay
/// visible, so deactivation is refused for it; reactivation is always
/// allowed.
pub fn set_category_active(conn: &Connection, id: i64, active: bool) -> Result<Category> {
    get_category(conn, id)?;
    if !active {
        let in_use: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE category_id=?1",
            params![id],
            |r| r.get(0),
        )?;
        if in_use > 0 {
            return Err(Error::Conflict(format!(
                "category {} has {} transactions and cannot be deactivated",
                id, in_use
            )));
        }
    }
    conn.execute(
        "UPDATE categories SET is_active=?1, updated_at=datetime('now') WHERE id=?2",
        params![active, id],
    )?;
    info!(id, active, "category active flag set");
    get_category(conn, id)
}

fn find_by_name(conn: &Connection, name: &str, kind: CategoryKind) -> Result<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM categories WHERE name=?1 AND kind=?2",
            params![name, kind.as_str()],
            |r| r.get(0),
        )
        .optional()?;
    Ok(id)
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("category name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(Error::Validation(format!(
            "category name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name)
}

// A budget only means something for expense categories; income budgets are
// dropped rather than stored.
fn validate_budget(kind: CategoryKind, budget: Option<Decimal>) -> Result<Option<Decimal>> {
    match budget {
        Some(b) if b < Decimal::ZERO => {
            Err(Error::Validation("budget must not be negative".into()))
        }
        Some(b) if kind == CategoryKind::Expense => Ok(Some(b)),
        _ => Ok(None),
    }
}
