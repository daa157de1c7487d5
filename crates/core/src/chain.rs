// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chain rules: a static `(event_type, outcome) -> follow-up message`
//! mapping, loaded once from `chain.toml` at start (see `mcab-bus::config`).

use crate::message::MessageType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One configured follow-up action for a reported `(event, outcome)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRule {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub action: String,
    pub send_to: String,
    pub message: String,
    #[serde(default)]
    pub notify_analyst: bool,
}

/// The full chain table, keyed by `(event_type, outcome)`. `event_type`/
/// `outcome` support the same `*` wildcard as subscriptions, but lookup
/// prefers an exact match over a wildcard one (chains are meant to be
/// deterministic per pair; wildcards are a fallback "catch-all" row).
#[derive(Debug, Clone, Default)]
pub struct ChainTable {
    rules: HashMap<(String, String), ChainRule>,
}

impl ChainTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, event: impl Into<String>, outcome: impl Into<String>, rule: ChainRule) {
        self.rules.insert((event.into(), outcome.into()), rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve the rule for `(event, outcome)`: exact match first, then
    /// `(event, *)`, then `(*, outcome)`, then `(*, *)`.
    pub fn resolve(&self, event: &str, outcome: &str) -> Option<&ChainRule> {
        self.rules
            .get(&(event.to_string(), outcome.to_string()))
            .or_else(|| self.rules.get(&(event.to_string(), "*".to_string())))
            .or_else(|| self.rules.get(&("*".to_string(), outcome.to_string())))
            .or_else(|| self.rules.get(&("*".to_string(), "*".to_string())))
    }
}

#[cfg(test)]
#[path = "chain_tests.rs"]
mod tests;
