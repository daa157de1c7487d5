// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CRUD over `cron.jsonl` plus an append-only `cron-history.jsonl`.

use crate::error::BusError;
use crate::table;
use mcab_core::{CronEntry, CronHistoryEntry};
use std::path::Path;

pub fn list(path: &Path) -> Result<Vec<CronEntry>, BusError> {
    table::read_all(path)
}

pub fn add(path: &Path, entry: CronEntry) -> Result<(), BusError> {
    table::append_one(path, &entry)
}

pub fn remove(path: &Path, id: &str) -> Result<bool, BusError> {
    let mut all = list(path)?;
    let before = all.len();
    all.retain(|e| e.id != id);
    let removed = all.len() != before;
    if removed {
        table::write_all(path, &all)?;
    }
    Ok(removed)
}

pub fn set_enabled(path: &Path, id: &str, enabled: bool) -> Result<bool, BusError> {
    let mut all = list(path)?;
    let mut found = false;
    for e in all.iter_mut() {
        if e.id == id {
            e.enabled = enabled;
            found = true;
        }
    }
    if found {
        table::write_all(path, &all)?;
    }
    Ok(found)
}

/// All entries currently due, per [`CronEntry::due`].
pub fn due_entries(path: &Path, now_unix: i64) -> Result<Vec<CronEntry>, BusError> {
    Ok(list(path)?.into_iter().filter(|e| e.due(now_unix)).collect())
}

/// Record a firing and bump `last_run_ts` — monotonically, and only on a
/// successful firing (spec.md §3 invariant 5: a firing that fails to
/// execute does not update it, so callers should only call this after the
/// send succeeded).
pub fn record_firing(
    cron_path: &Path,
    history_path: &Path,
    id: &str,
    now_unix: i64,
    history_entry: &CronHistoryEntry,
) -> Result<(), BusError> {
    let mut all = list(cron_path)?;
    for e in all.iter_mut() {
        if e.id == id {
            e.last_run_ts = now_unix;
        }
    }
    table::write_all(cron_path, &all)?;
    table::append_one(history_path, history_entry)
}

pub fn history(path: &Path) -> Result<Vec<CronHistoryEntry>, BusError> {
    table::read_all(path)
}

#[cfg(test)]
#[path = "cron_store_tests.rs"]
mod tests;
