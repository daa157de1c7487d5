// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Short-lived spawned-agent tracking: `{id, role, spawn_role, owner,
//! window, task, status, notified, started_ts, finished_ts}`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnStatus {
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for SpawnStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SpawnStatus::Running => "running",
            SpawnStatus::Completed => "completed",
            SpawnStatus::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub id: String,
    /// Agent-definition role (tools/skills/examples identity).
    pub role: String,
    /// Bus identity inside the spawned pane (inbox/lock/send identity);
    /// may differ from `role`.
    pub spawn_role: String,
    pub owner: String,
    pub window: String,
    pub task: String,
    pub status: SpawnStatus,
    #[serde(default)]
    pub notified: bool,
    pub started_ts: i64,
    #[serde(default)]
    pub finished_ts: Option<i64>,
    /// The last message produced by `spawn_role`'s bus identity, truncated
    /// to 200 bytes, captured when the spawn is detected complete.
    #[serde(default)]
    pub result: Option<String>,
}

/// Spawn results are truncated to this many bytes (spec.md §4.3 step 5).
pub const RESULT_TRUNCATE_BYTES: usize = 200;

impl SpawnEntry {
    pub fn complete(&mut self, result: Option<String>, finished_ts: i64) {
        if matches!(self.status, SpawnStatus::Running) {
            self.status = SpawnStatus::Completed;
            self.result = result.map(|r| truncate_bytes(&r, RESULT_TRUNCATE_BYTES));
            self.finished_ts = Some(finished_ts);
        }
    }

    pub fn needs_notification(&self) -> bool {
        !matches!(self.status, SpawnStatus::Running) && !self.notified
    }

    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut s = serde_json::to_string(self)?;
        s.push('\n');
        Ok(s)
    }

    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim_end())
    }
}

/// Truncate `s` to at most `max` bytes on a UTF-8 char boundary.
pub fn truncate_bytes(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
