// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `LoopAlert`: `{role, type, key, count, first_ts, last_ts, message}`.
//! Identity is `(role, type, key)`; the dedup/cooldown policy itself lives
//! in `mcab-engine::loop_detect` (this type is the pure record).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopAlertKind {
    Command,
    Message,
}

impl std::fmt::Display for LoopAlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LoopAlertKind::Command => "command",
            LoopAlertKind::Message => "message",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopAlert {
    pub role: String,
    #[serde(rename = "type")]
    pub kind: LoopAlertKind,
    pub key: String,
    pub count: u32,
    pub first_ts: i64,
    pub last_ts: i64,
    pub message: String,
}

impl LoopAlert {
    /// The dedup identity of this alert: `(role, type, key)`.
    pub fn identity(&self) -> (&str, LoopAlertKind, &str) {
        (&self.role, self.kind, &self.key)
    }
}

#[cfg(test)]
#[path = "loop_alert_tests.rs"]
mod tests;
