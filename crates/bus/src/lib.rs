// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! File-backed message bus: on-disk layout resolution, locking, JSONL
//! inboxes, the process-wide activity log, per-role history, and the
//! small CRUD tables (subscriptions, cron, proc, spawn) that sit on top
//! of them.

pub mod activity_log;
pub mod config;
pub mod cron_store;
pub mod error;
pub mod filelock;
pub mod history;
pub mod inbox;
pub mod paths;
pub mod proc_store;
pub mod rolelock;
pub mod spawn_store;
pub mod subscription_store;
pub mod table;

pub use error::BusError;
pub use paths::BusPaths;

use mcab_core::message::{ActivityRecord, HistoryEntry};
use mcab_core::{ChainTable, Message};

/// A thin facade over [`BusPaths`] bundling the operations most callers
/// need (send/receive/log/history) so `mcab-cli`/`mcab-harness`/
/// `mcab-engine` don't each re-derive the lock/log paths by hand.
#[derive(Debug, Clone)]
pub struct Bus {
    paths: BusPaths,
}

impl Bus {
    pub fn new(paths: BusPaths) -> Self {
        Self { paths }
    }

    pub fn resolve() -> Self {
        Self::new(BusPaths::resolve())
    }

    pub fn paths(&self) -> &BusPaths {
        &self.paths
    }

    /// Send `message` to `to`'s inbox, then append an activity record.
    /// The activity-log append failing does not undo the send (spec.md
    /// §4.1): it is logged via `tracing::warn!` and otherwise ignored.
    pub fn send(&self, to: &str, message: &Message) -> Result<(), BusError> {
        inbox::send(&self.paths.inbox(to), &self.paths.bus_lock(), message)?;
        let record = ActivityRecord::from(message);
        if let Err(e) = activity_log::append(&self.paths.log(), &record) {
            tracing::warn!(error = %e, "failed to append activity log entry");
        }
        Ok(())
    }

    pub fn receive(&self, role: &str) -> Result<inbox::ScanResult, BusError> {
        inbox::receive(&self.paths.inbox(role), &self.paths.bus_lock())
    }

    pub fn peek(&self, role: &str) -> Result<inbox::ScanResult, BusError> {
        inbox::peek(&self.paths.inbox(role))
    }

    pub fn inbox_size_bytes(&self, role: &str) -> u64 {
        inbox::size_bytes(&self.paths.inbox(role))
    }

    pub fn lock_role(&self, role: &str) -> std::io::Result<()> {
        rolelock::lock(&self.paths.role_lock(role))
    }

    pub fn unlock_role(&self, role: &str) -> std::io::Result<()> {
        rolelock::unlock(&self.paths.role_lock(role))
    }

    pub fn role_is_locked(&self, role: &str) -> bool {
        rolelock::is_locked(&self.paths.role_lock(role))
    }

    pub fn record_history(&self, role: &str, entry: &HistoryEntry) -> Result<(), BusError> {
        history::append(&self.paths.history(role), &self.paths.bus_lock(), entry)
    }

    pub fn history(&self, role: &str) -> std::io::Result<Vec<HistoryEntry>> {
        history::read_all(&self.paths.history(role))
    }

    pub fn load_chain_table(&self) -> Result<ChainTable, BusError> {
        config::load_chain_table(&self.paths.chain_config())
    }
}
