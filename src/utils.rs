// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result};
use chrono::NaiveDate;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| Error::Validation(format!("invalid date '{}', expected YYYY-MM-DD", s)))
}

pub fn parse_month(s: &str) -> Result<String> {
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .map_err(|_| Error::Validation(format!("invalid month '{}', expected YYYY-MM", s)))?;
    Ok(s.to_string())
}

/// The `YYYY-MM` key of the month containing `date`, matching how dates are
/// stored (`substr(date,1,7)`).
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}
