// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dynamic fan-out rules: `{id, event, outcome, notify, message, enabled}`.
//! `event`/`outcome` each support a literal value or `*` (wildcard).

use serde::{Deserialize, Serialize};

pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub event: String,
    pub outcome: String,
    /// Role to notify (pane-controller keystroke) on match; empty = none.
    #[serde(default)]
    pub notify: String,
    /// Role to send the expanded message to.
    pub target: String,
    pub message: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Does `pattern` match `value`, where `pattern` may be the literal `*`?
pub fn matches(pattern: &str, value: &str) -> bool {
    pattern == WILDCARD || pattern == value
}

impl Subscription {
    /// Whether this (enabled) subscription fires for the given event/outcome.
    pub fn matches(&self, event: &str, outcome: &str) -> bool {
        self.enabled && matches(&self.event, event) && matches(&self.outcome, outcome)
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
#[path = "subscription_tests.rs"]
mod tests;
