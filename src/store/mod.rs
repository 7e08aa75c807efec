// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod assets;
pub mod categories;
pub mod transactions;

use crate::error::{Error, Result};
use crate::models::CategoryKind;
use rust_decimal::Decimal;

pub(crate) fn parse_stored_decimal(raw: &str, what: &str) -> Result<Decimal> {
    raw.parse()
        .map_err(|_| Error::Storage(format!("invalid {} '{}' in database", what, raw)))
}

pub(crate) fn parse_stored_kind(raw: &str) -> Result<CategoryKind> {
    CategoryKind::parse(raw)
        .ok_or_else(|| Error::Storage(format!("invalid kind '{}' in database", raw)))
}
