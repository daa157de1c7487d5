// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-role "busy" marker file `lock/<role>.lock`: presence = busy,
//! absence = idle. Advisory only — does not use `bus.lock` (spec.md §4.1:
//! "a separate shared resource from `bus.lock`").

use std::path::Path;

/// Create the role's lock marker. Idempotent.
pub fn lock(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, b"")
}

/// Remove the role's lock marker. Removing a non-existent lock is not an
/// error (spec.md §4.1).
pub fn unlock(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

pub fn is_locked(path: &Path) -> bool {
    path.exists()
}

/// RAII guard that unlocks on drop — used by the harness to scope a lock
/// to the duration of a batch even if processing returns early.
pub struct RoleLockGuard {
    path: std::path::PathBuf,
}

impl RoleLockGuard {
    pub fn acquire(path: &Path) -> std::io::Result<Self> {
        lock(path)?;
        Ok(Self {
            path: path.to_owned(),
        })
    }
}

impl Drop for RoleLockGuard {
    fn drop(&mut self) {
        let _ = unlock(&self.path);
    }
}

#[cfg(test)]
#[path = "rolelock_tests.rs"]
mod tests;
