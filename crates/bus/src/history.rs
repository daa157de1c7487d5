// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-role history: `<role>-history.jsonl`, bounded to the last
//! [`HISTORY_LIMIT`] entries by rotation on every append.
//!
//! REDESIGN FLAG / Open Question #2 (kept as designed): rotation is a
//! read-rewrite-replace that does *not* hold the advisory lock across the
//! replace. A concurrent append during rotation can be lost. Acceptable
//! for a 100-entry bound — the next successful rotation catches up — so
//! this is documented behavior, not "fixed" with a stronger lock.

use crate::error::BusError;
use crate::filelock;
use mcab_core::message::HistoryEntry;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

pub const HISTORY_LIMIT: usize = 100;

/// Append `entry`, then rotate so the file never exceeds [`HISTORY_LIMIT`]
/// lines. The lock covers the append; rotation (read-rewrite-replace) runs
/// best-effort afterwards and is skipped outright on lock contention.
pub fn append(history_path: &Path, lock_path: &Path, entry: &HistoryEntry) -> Result<(), BusError> {
    {
        let _guard = filelock::acquire_exclusive(lock_path).map_err(|_| BusError::Locked)?;
        if let Some(parent) = history_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(history_path)?;
        file.write_all(entry.to_line()?.as_bytes())?;
    }
    rotate_if_needed(history_path, lock_path);
    Ok(())
}

/// Trim `history_path` to its last [`HISTORY_LIMIT}] lines, if it has more.
/// Any failure (including losing the lock race) is swallowed: rotation is
/// a housekeeping best-effort, not a correctness requirement per call.
fn rotate_if_needed(history_path: &Path, lock_path: &Path) {
    let guard = match filelock::acquire_exclusive(lock_path) {
        Ok(g) => g,
        Err(_) => return, // contention: skip, next successful rotation catches up
    };

    let Ok(lines) = read_lines(history_path) else {
        drop(guard);
        return;
    };
    if lines.len() <= HISTORY_LIMIT {
        drop(guard);
        return;
    }
    let kept = &lines[lines.len() - HISTORY_LIMIT..];
    let tmp_path = history_path.with_extension("tmp");
    if write_lines(&tmp_path, kept).is_ok() {
        let _ = fs::rename(&tmp_path, history_path);
    }
    drop(guard);
}

fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    reader.lines().collect()
}

fn write_lines(path: &Path, lines: &[String]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    for line in lines {
        writeln!(file, "{line}")?;
    }
    Ok(())
}

/// Read all entries currently in the history file, most-recent-last.
/// Malformed lines are skipped (Parse errors, spec.md §7).
pub fn read_all(history_path: &Path) -> std::io::Result<Vec<HistoryEntry>> {
    Ok(read_lines(history_path)?
        .into_iter()
        .filter_map(|l| HistoryEntry::from_line(&l).ok())
        .collect())
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
