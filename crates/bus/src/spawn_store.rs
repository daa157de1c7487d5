// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CRUD over `spawn.jsonl`: short-lived spawned-agent tracking.

use crate::error::BusError;
use crate::table;
use mcab_core::SpawnEntry;
use std::path::Path;

pub fn list(path: &Path) -> Result<Vec<SpawnEntry>, BusError> {
    table::read_all(path)
}

pub fn add(path: &Path, entry: SpawnEntry) -> Result<(), BusError> {
    table::append_one(path, &entry)
}

pub fn get(path: &Path, id: &str) -> Result<Option<SpawnEntry>, BusError> {
    Ok(list(path)?.into_iter().find(|e| e.id == id))
}

/// Mark `id` complete (idempotent, see [`SpawnEntry::complete`]).
pub fn complete(path: &Path, id: &str, result: Option<String>, finished_ts: i64) -> Result<bool, BusError> {
    let mut all = list(path)?;
    let mut found = false;
    for e in all.iter_mut() {
        if e.id == id {
            e.complete(result.clone(), finished_ts);
            found = true;
        }
    }
    if found {
        table::write_all(path, &all)?;
    }
    Ok(found)
}

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

pub fn needing_notification(path: &Path) -> Result<Vec<SpawnEntry>, BusError> {
    Ok(list(path)?.into_iter().filter(|e| e.needs_notification()).collect())
}

/// Entries currently running under `owner`, used to enforce a spawn-depth
/// cap (spec.md §4.6: spawned agents may not themselves spawn).
pub fn running_for_owner(path: &Path, owner: &str) -> Result<Vec<SpawnEntry>, BusError> {
    use mcab_core::SpawnStatus;
    Ok(list(path)?
        .into_iter()
        .filter(|e| e.owner == owner && matches!(e.status, SpawnStatus::Running))
        .collect())
}

#[cfg(test)]
#[path = "spawn_store_tests.rs"]
mod tests;
