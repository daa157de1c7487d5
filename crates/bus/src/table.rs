// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generic JSONL-backed CRUD table, shared by the subscription/cron/proc/
//! spawn stores (teacher precedent: `oj-daemon::listener::{crons, workers,
//! queues, decisions}` — each a small CRUD-over-a-log type).

use crate::error::BusError;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Read every well-formed line of `path` as a `T`. Malformed lines are
/// skipped (Parse errors, spec.md §7) rather than propagated.
pub fn read_all<T>(path: &Path) -> Result<Vec<T>, BusError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(trimmed) {
            Ok(v) => out.push(v),
            Err(e) => tracing::debug!(error = %e, "skipping malformed table line"),
        }
    }
    Ok(out)
}

/// Rewrite `path` with exactly `rows`, one JSON object per line. Used for
/// updates (enable/disable, mutate-in-place) since these tables are small
/// (dozens of entries, not a high-throughput log).
pub fn write_all<T>(path: &Path, rows: &[T]) -> Result<(), BusError>
where
    T: serde::Serialize,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp)?;
        for row in rows {
            let mut line = serde_json::to_string(row)?;
            line.push('\n');
            file.write_all(line.as_bytes())?;
        }
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Append a single row without rewriting the whole file.
pub fn append_one<T>(path: &Path, row: &T) -> Result<(), BusError>
where
    T: serde::Serialize,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    let mut line = serde_json::to_string(row)?;
    line.push('\n');
    file.write_all(line.as_bytes())?;
    Ok(())
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
