// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory exclusive file lock with a short bounded retry, used to guard
//! `bus.lock` (send/receive) and history rotation. Not used for the
//! per-role busy marker (`lock/<role>.lock`), which is a plain
//! create/remove marker file per spec.md §4.1.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

const RETRY_ATTEMPTS: u32 = 5;
const RETRY_DELAY: Duration = Duration::from_millis(10);

/// A held exclusive lock on a sibling lock file. Unlocked on drop.
pub struct FileLockGuard {
    file: File,
}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

/// Acquire an exclusive lock on `path`, creating it if needed, retrying
/// `RETRY_ATTEMPTS` times at `RETRY_DELAY` apart (non-blocking acquire with
/// small retry, per spec.md §4.1).
pub fn acquire_exclusive(path: &Path) -> std::io::Result<FileLockGuard> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)?;

    let mut last_err = None;
    for attempt in 0..RETRY_ATTEMPTS {
        match file.try_lock_exclusive() {
            Ok(()) => return Ok(FileLockGuard { file }),
            Err(e) => {
                last_err = Some(e);
                if attempt + 1 < RETRY_ATTEMPTS {
                    sleep(RETRY_DELAY);
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| std::io::Error::other("lock acquisition failed")))
}

#[cfg(test)]
#[path = "filelock_tests.rs"]
mod tests;
