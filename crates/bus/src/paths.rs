// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolve the session/role identity and the on-disk bus layout from the
//! environment, mirroring `oj-daemon`'s project/session env resolution.
//!
//! ```text
//! bus.lock
//! inbox/<role>.jsonl
//! lock/<role>.lock
//! log.jsonl
//! trigger.log
//! <role>-history.jsonl
//! cron.jsonl
//! cron-history.jsonl
//! subs.jsonl
//! proc.jsonl
//! spawn.jsonl
//! harness-<role>.pid
//! agents/<role>.md
//! memory/{shared,<role>}.md
//! chain.toml
//! profiles.toml
//! supervisor.toml
//! ```

use std::path::{Path, PathBuf};

pub const SESSION_ENV: &str = "BUS_SESSION";
pub const ROLE_ENV: &str = "AGENT_ROLE";
pub const BUS_DIR_ENV: &str = "MCAB_BUS_DIR";
const DEFAULT_PREFIX: &str = "muxcode-agent-bus";

/// Resolved bus directory plus the caller's own role, if known.
#[derive(Debug, Clone)]
pub struct BusPaths {
    root: PathBuf,
}

impl BusPaths {
    /// Resolve from `MCAB_BUS_DIR` if set (test/override escape hatch),
    /// else `/tmp/<prefix>-bus-<session>` where `<session>` comes from
    /// `BUS_SESSION` (defaulting to `"default"`).
    pub fn resolve() -> Self {
        if let Ok(dir) = std::env::var(BUS_DIR_ENV) {
            return Self::at(PathBuf::from(dir));
        }
        let session = std::env::var(SESSION_ENV).unwrap_or_else(|_| "default".to_string());
        let dir = std::env::temp_dir().join(format!("{DEFAULT_PREFIX}-bus-{session}"));
        Self::at(dir)
    }

    pub fn at(root: PathBuf) -> Self {
        Self { root }
    }

    /// The caller's own role from `AGENT_ROLE`, if set.
    pub fn own_role() -> Option<String> {
        std::env::var(ROLE_ENV).ok()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bus_lock(&self) -> PathBuf {
        self.root.join("bus.lock")
    }

    pub fn inbox(&self, role: &str) -> PathBuf {
        self.root.join("inbox").join(format!("{role}.jsonl"))
    }

    pub fn role_lock(&self, role: &str) -> PathBuf {
        self.root.join("lock").join(format!("{role}.lock"))
    }

    pub fn log(&self) -> PathBuf {
        self.root.join("log.jsonl")
    }

    pub fn trigger_log(&self) -> PathBuf {
        self.root.join("trigger.log")
    }

    pub fn history(&self, role: &str) -> PathBuf {
        self.root.join(format!("{role}-history.jsonl"))
    }

    pub fn cron(&self) -> PathBuf {
        self.root.join("cron.jsonl")
    }

    pub fn cron_history(&self) -> PathBuf {
        self.root.join("cron-history.jsonl")
    }

    pub fn subscriptions(&self) -> PathBuf {
        self.root.join("subs.jsonl")
    }

    pub fn proc(&self) -> PathBuf {
        self.root.join("proc.jsonl")
    }

    pub fn spawn(&self) -> PathBuf {
        self.root.join("spawn.jsonl")
    }

    pub fn harness_marker(&self, role: &str) -> PathBuf {
        self.root.join(format!("harness-{role}.pid"))
    }

    pub fn agent_definition(&self, role: &str) -> PathBuf {
        self.root.join("agents").join(format!("{role}.md"))
    }

    pub fn memory(&self, role: &str) -> PathBuf {
        self.root.join("memory").join(format!("{role}.md"))
    }

    pub fn memory_shared(&self) -> PathBuf {
        self.root.join("memory").join("shared.md")
    }

    pub fn memory_dir(&self) -> PathBuf {
        self.root.join("memory")
    }

    pub fn chain_config(&self) -> PathBuf {
        self.root.join("chain.toml")
    }

    pub fn profiles_config(&self) -> PathBuf {
        self.root.join("profiles.toml")
    }

    pub fn supervisor_config(&self) -> PathBuf {
        self.root.join("supervisor.toml")
    }

    /// Every role with a non-empty or previously-existing inbox file,
    /// discovered by scanning `inbox/*.jsonl`. A role only becomes known
    /// once something has been sent to it at least once (there is no
    /// separate role-registration step, spec.md §3).
    pub fn known_roles(&self) -> Vec<String> {
        let dir = self.root.join("inbox");
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut roles: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let path = e.path();
                if path.extension().and_then(|s| s.to_str()) != Some("jsonl") {
                    return None;
                }
                path.file_stem().map(|s| s.to_string_lossy().into_owned())
            })
            .collect();
        roles.sort();
        roles
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
