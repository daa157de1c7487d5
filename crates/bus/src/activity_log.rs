// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `log.jsonl`: single process-wide append-only log of
//! `{ts, from, to, type, action}` tuples, one per sent message. No
//! rotation (REDESIGN FLAG / Open Question #3: left unbounded, callers
//! must expect unbounded growth across a long session).

use crate::error::BusError;
use mcab_core::message::ActivityRecord;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Append one record. Failure is reported via the returned `Result` but,
/// per spec.md §4.1, a failed log append must never fail the send that
/// triggered it — callers should `tracing::warn!` and continue.
pub fn append(log_path: &Path, record: &ActivityRecord) -> Result<(), BusError> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(log_path)?;
    file.write_all(record.to_line()?.as_bytes())?;
    Ok(())
}

/// Read all well-formed records. Malformed lines are skipped (Parse
/// errors, spec.md §7).
pub fn read_all(log_path: &Path) -> std::io::Result<Vec<ActivityRecord>> {
    if !log_path.exists() {
        return Ok(Vec::new());
    }
    let file = std::fs::File::open(log_path)?;
    let reader = BufReader::new(file);
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if let Ok(record) = ActivityRecord::from_line(&line) {
            out.push(record);
        }
    }
    Ok(out)
}

/// Current size of `log.jsonl` in bytes (0 if absent). Exposed so the
/// supervisor's compaction-recommendation step has a real number to
/// compare against, per SPEC_FULL.md §9.
pub fn log_len_bytes(log_path: &Path) -> u64 {
    fs::metadata(log_path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
#[path = "activity_log_tests.rs"]
mod tests;
