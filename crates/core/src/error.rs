// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parse-level errors for the small grammars this crate owns (cron schedule
//! strings, templates). IO and lock errors are owned by `mcab-bus`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid cron schedule {0:?}")]
    InvalidSchedule(String),
    #[error("invalid duration {0:?}")]
    InvalidDuration(String),
}
