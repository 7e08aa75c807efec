// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Errors surfaced by the store and report layers. The caller owns all
/// user-facing messaging; nothing here is retried or suppressed.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-range input: empty name, non-positive amount,
    /// unknown category reference, kind mismatch.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The operation targets an id that does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The operation clashes with existing state: duplicate (name, kind),
    /// or deactivating a category that still has transactions.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage-engine failure. Fatal to the current operation only.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
