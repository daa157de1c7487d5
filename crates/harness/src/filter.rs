// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stateful per-batch safety filter: blocks inbox-read recursion,
//! self-addressed sends, and repeated commands. Rules apply only to `bash`
//! tool calls; other tools are the executor's allow-list's job.

use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Default repeat threshold before a command is blocked (spec.md §4.5).
pub const DEFAULT_MAX_REPEAT: u32 = 3;

/// Outcome of filtering one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    Allow,
    /// Blocked with the corrective message to hand back to the model as
    /// the tool's output.
    Block(String),
}

/// Per-batch repetition tracker, reset at the start of every batch
/// ([`SafetyFilter::reset`]).
pub struct SafetyFilter {
    own_role: String,
    max_repeat: u32,
    command_counts: HashMap<String, u32>,
}

impl SafetyFilter {
    pub fn new(own_role: impl Into<String>) -> Self {
        Self {
            own_role: own_role.into(),
            max_repeat: DEFAULT_MAX_REPEAT,
            command_counts: HashMap::new(),
        }
    }

    pub fn with_max_repeat(mut self, max_repeat: u32) -> Self {
        self.max_repeat = max_repeat;
        self
    }

    /// Clear repetition state for a new batch. Filter idempotence
    /// (testable property 5): `reset()` then the same call sequence yields
    /// the same decisions.
    pub fn reset(&mut self) {
        self.command_counts.clear();
    }

    /// Evaluate a `bash` tool call's command. Rules run in order:
    /// inbox-read, self-send, repetition.
    pub fn check_bash(&mut self, command: &str) -> FilterDecision {
        let normalized = normalize(command);

        if is_inbox_read(&normalized) {
            return FilterDecision::Block(
                "messages are already delivered in this turn's task list; do not run the inbox \
                 command — read the task list above instead"
                    .to_string(),
            );
        }

        if is_self_send(&normalized, &self.own_role) {
            return FilterDecision::Block(format!(
                "you cannot send a message to yourself ({}); send your reply to the agent that \
                 asked for it instead",
                self.own_role
            ));
        }

        let hash = command_hash(&normalized);
        let count = self.command_counts.entry(hash).or_insert(0);
        *count += 1;
        if *count >= self.max_repeat {
            return FilterDecision::Block(
                "you are stuck repeating the same command; stop and provide a final response \
                 with what you have observed so far"
                    .to_string(),
            );
        }

        FilterDecision::Allow
    }
}

fn normalize(command: &str) -> String {
    command.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Matches `muxcode-agent-bus inbox` with or without flags, with or
/// without a path prefix (e.g. `./muxcode-agent-bus inbox --peek`).
fn is_inbox_read(normalized: &str) -> bool {
    normalized
        .split(char::is_whitespace)
        .collect::<Vec<_>>()
        .windows(2)
        .any(|w| binary_matches(w[0]) && w[1] == "inbox")
}

/// Matches `muxcode-agent-bus send <own_role> …`.
fn is_self_send(normalized: &str, own_role: &str) -> bool {
    let tokens: Vec<&str> = normalized.split(char::is_whitespace).collect();
    tokens
        .windows(3)
        .any(|w| binary_matches(w[0]) && w[1] == "send" && w[2] == own_role)
}

fn binary_matches(token: &str) -> bool {
    let name = token.rsplit('/').next().unwrap_or(token);
    name == "muxcode-agent-bus"
}

fn command_hash(normalized: &str) -> String {
    let digest = Sha256::digest(normalized.as_bytes());
    format!("{:x}", digest)
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
