// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Detached background process tracking.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcStatus {
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for ProcStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProcStatus::Running => "running",
            ProcStatus::Completed => "completed",
            ProcStatus::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcEntry {
    pub id: String,
    pub pid: u32,
    pub command: String,
    pub dir: String,
    pub owner: String,
    pub log_file: String,
    pub status: ProcStatus,
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub notified: bool,
    pub started_ts: i64,
    #[serde(default)]
    pub finished_ts: Option<i64>,
}

impl ProcEntry {
    /// Mark completion exactly once; a repeat call is a no-op (a proc/spawn
    /// entry is reported complete to its owner at most once, invariant 6).
    pub fn complete(&mut self, exit_code: i32, finished_ts: i64) {
        if matches!(self.status, ProcStatus::Running) {
            self.status = if exit_code == 0 {
                ProcStatus::Completed
            } else {
                ProcStatus::Failed
            };
            self.exit_code = Some(exit_code);
            self.finished_ts = Some(finished_ts);
        }
    }

    /// Whether this entry is finished and has not yet been reported to its owner.
    pub fn needs_notification(&self) -> bool {
        !matches!(self.status, ProcStatus::Running) && !self.notified
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

#[cfg(test)]
#[path = "proc_tests.rs"]
mod tests;
