// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Send/Receive/Peek on a role's inbox file, all guarded by `bus.lock`.
//!
//! Send appends one line; Receive reads the whole file then truncates it
//! to zero length under the same lock (at-most-once delivery, spec.md §4.1,
//! testable property 1). Peek reads without truncation and without taking
//! the lock (readers tolerate a torn tail by skipping unparseable lines,
//! per spec.md §5).

use crate::error::BusError;
use crate::filelock;
use mcab_core::Message;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Append one message to `inbox_path`, exclusive-locked on `lock_path`.
pub fn send(inbox_path: &Path, lock_path: &Path, message: &Message) -> Result<(), BusError> {
    let _guard = filelock::acquire_exclusive(lock_path).map_err(|_| BusError::Locked)?;
    if let Some(parent) = inbox_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let line = message.to_line()?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(inbox_path)?;
    file.write_all(line.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Result of a receive/peek scan: the parsed messages plus a count of
/// lines that failed to parse (Parse errors are counted and logged, never
/// propagated — spec.md §7).
pub struct ScanResult {
    pub messages: Vec<Message>,
    pub skipped: usize,
}

/// Read the entire inbox, then truncate it to zero length, both under the
/// same lock. Messages consumed here are gone from the inbox forever
/// (they live on only in the activity log / history).
pub fn receive(inbox_path: &Path, lock_path: &Path) -> Result<ScanResult, BusError> {
    let _guard = filelock::acquire_exclusive(lock_path).map_err(|_| BusError::Locked)?;
    let result = scan_file(inbox_path)?;
    if inbox_path.exists() {
        let file = OpenOptions::new().write(true).open(inbox_path)?;
        file.set_len(0)?;
    }
    Ok(result)
}

/// Read the inbox without truncating or locking.
pub fn peek(inbox_path: &Path) -> Result<ScanResult, BusError> {
    scan_file(inbox_path)
}

fn scan_file(path: &Path) -> Result<ScanResult, BusError> {
    if !path.exists() {
        return Ok(ScanResult {
            messages: Vec::new(),
            skipped: 0,
        });
    }
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut messages = Vec::new();
    let mut skipped = 0;
    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match Message::from_line(trimmed) {
            Ok(msg) => messages.push(msg),
            Err(e) => {
                tracing::debug!(error = %e, line = %trimmed, "skipping malformed inbox line");
                skipped += 1;
            }
        }
    }
    Ok(ScanResult { messages, skipped })
}

/// The size in bytes of an inbox file (0 if it does not exist). Used by
/// the supervisor's inbox-growth-detection step.
pub fn size_bytes(inbox_path: &Path) -> u64 {
    fs::metadata(inbox_path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
#[path = "inbox_tests.rs"]
mod tests;
