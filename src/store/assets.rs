// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::parse_stored_decimal;
use crate::error::{Error, Result};
use crate::models::AssetSnapshot;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use tracing::info;

/// Records the total balance observed on `date`. A second write for the same
/// date replaces the earlier balance; there is never more than one row per
/// date.
pub fn upsert_asset_snapshot(
    conn: &Connection,
    date: NaiveDate,
    balance: Decimal,
) -> Result<AssetSnapshot> {
    if balance < Decimal::ZERO {
        return Err(Error::Validation("balance must not be negative".into()));
    }
    conn.execute(
        "INSERT INTO asset_snapshots(date, balance) VALUES (?1, ?2)
         ON CONFLICT(date) DO UPDATE SET balance=excluded.balance",
        params![date, balance.to_string()],
    )?;
    info!(%date, %balance, "asset snapshot recorded");
    get_snapshot(conn, date)
}

fn get_snapshot(conn: &Connection, date: NaiveDate) -> Result<AssetSnapshot> {
    let (id, date, balance_s, created_at) = conn.query_row(
        "SELECT id, date, balance, created_at FROM asset_snapshots WHERE date=?1",
        params![date],
        |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, NaiveDate>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, NaiveDateTime>(3)?,
            ))
        },
    )?;
    Ok(AssetSnapshot {
        id,
        date,
        balance: parse_stored_decimal(&balance_s, "balance")?,
        created_at,
    })
}

/// All snapshots, oldest first.
pub fn list_asset_snapshots(conn: &Connection) -> Result<Vec<AssetSnapshot>> {
    let mut stmt =
        conn.prepare("SELECT id, date, balance, created_at FROM asset_snapshots ORDER BY date")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, NaiveDate>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, NaiveDateTime>(3)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (id, date, balance_s, created_at) = row?;
        data.push(AssetSnapshot {
            id,
            date,
            balance: parse_stored_decimal(&balance_s, "balance")?,
            created_at,
        });
    }
    Ok(data)
}
