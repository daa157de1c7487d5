// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CRUD over `proc.jsonl`: detached background processes spawned via
//! `run --detach`.

use crate::error::BusError;
use crate::table;
use mcab_core::ProcEntry;
use std::path::Path;

pub fn list(path: &Path) -> Result<Vec<ProcEntry>, BusError> {
    table::read_all(path)
}

pub fn add(path: &Path, entry: ProcEntry) -> Result<(), BusError> {
    table::append_one(path, &entry)
}

pub fn get(path: &Path, id: &str) -> Result<Option<ProcEntry>, BusError> {
    Ok(list(path)?.into_iter().find(|e| e.id == id))
}

/// Mark `id` complete (idempotent, see [`ProcEntry::complete`]).
pub fn complete(path: &Path, id: &str, exit_code: i32, finished_ts: i64) -> Result<bool, BusError> {
    let mut all = list(path)?;
    let mut found = false;
    for e in all.iter_mut() {
        if e.id == id {
            e.complete(exit_code, finished_ts);
            found = true;
        }
    }
    if found {
        table::write_all(path, &all)?;
    }
    Ok(found)
}

/// Mark `id` as notified, so [`ProcEntry::needs_notification`] stops firing.
pub fn mark_notified(path: &Path, id: &str) -> Result<bool, BusError> {
    let mut all = list(path)?;
    let mut found = false;
    for e in all.iter_mut() {
        if e.id == id {
            e.notified = true;
            found = true;
        }
    }
    if found {
        table::write_all(path, &all)?;
    }
    Ok(found)
}

/// All entries finished but not yet reported to their owner.
pub fn needing_notification(path: &Path) -> Result<Vec<ProcEntry>, BusError> {
    Ok(list(path)?.into_iter().filter(|e| e.needs_notification()).collect())
}

#[cfg(test)]
#[path = "proc_store_tests.rs"]
mod tests;
