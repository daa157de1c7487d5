// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The bus [`Message`] envelope and its JSONL codec.
//!
//! Wire format: one compact JSON object per line, fields exactly as
//! documented in spec.md §3/§6. Unknown fields are ignored on read for
//! forward compatibility (`#[serde(default)]` fields plus serde's default
//! "ignore extras" behavior).

use crate::id::IdGen;
use serde::{Deserialize, Serialize};

/// Messages are either a one-shot ask, a reply to one, or a fire-and-forget
/// notice. Closed set — unlike `action`, which is an open, role-scoped verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Request,
    Response,
    Event,
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MessageType::Request => "request",
            MessageType::Response => "response",
            MessageType::Event => "event",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "request" => Ok(MessageType::Request),
            "response" => Ok(MessageType::Response),
            "event" => Ok(MessageType::Event),
            other => Err(format!("unknown message type {other:?}")),
        }
    }
}

/// One line of a role's inbox: `{id, ts, from, to, type, action, payload,
/// reply_to}`. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub ts: i64,
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub action: String,
    #[serde(default)]
    pub payload: String,
    #[serde(default, rename = "reply_to", skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// Payload longer than this is still accepted (Capacity errors are
/// warning-only per spec.md §7), but callers should `tracing::warn!`.
pub const RECOMMENDED_PAYLOAD_LIMIT: usize = 500;

impl Message {
    /// Build a new message, assigning a fresh id as
    /// `{unix_seconds}-{from}-{8 hex of CSPRNG}`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id_gen: &dyn IdGen,
        now_unix: i64,
        from: impl Into<String>,
        to: impl Into<String>,
        kind: MessageType,
        action: impl Into<String>,
        payload: impl Into<String>,
        reply_to: Option<String>,
    ) -> Self {
        let from = from.into();
        let suffix = id_gen.next();
        let id = format!("{now_unix}-{from}-{suffix}");
        Self {
            id,
            ts: now_unix,
            from,
            to: to.into(),
            kind,
            action: action.into(),
            payload: payload.into(),
            reply_to,
        }
    }

    /// Whether the payload exceeds the recommended (non-enforced) limit.
    pub fn payload_over_limit(&self) -> bool {
        self.payload.len() > RECOMMENDED_PAYLOAD_LIMIT
    }

    /// Encode as a single JSONL line, including the trailing newline.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut s = serde_json::to_string(self)?;
        s.push('\n');
        Ok(s)
    }

    /// Parse a single JSONL line (without its trailing newline, though a
    /// trailing newline is tolerated).
    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim_end())
    }
}

/// One line of `log.jsonl`: the activity-log projection of a sent message
/// (no `payload`/`reply_to` — those stay in the inbox/history, the log is
/// for the dashboard and loop detector only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub ts: i64,
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub action: String,
}

impl From<&Message> for ActivityRecord {
    fn from(m: &Message) -> Self {
        Self {
            ts: m.ts,
            from: m.from.clone(),
            to: m.to.clone(),
            kind: m.kind,
            action: m.action.clone(),
        }
    }
}

impl ActivityRecord {
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut s = serde_json::to_string(self)?;
        s.push('\n');
        Ok(s)
    }

    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim_end())
    }
}

/// Outcome of a reported event/action, used across history/chain/subscription
/// matching. `Unknown` is the default when a caller doesn't report one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
    Unknown,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
            Outcome::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Outcome::Success),
            "failure" => Ok(Outcome::Failure),
            "unknown" => Ok(Outcome::Unknown),
            other => Err(format!("unknown outcome {other:?}")),
        }
    }
}

/// One line of `<role>-history.jsonl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub ts: i64,
    pub summary: String,
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub output: String,
    pub outcome: Outcome,
}

impl HistoryEntry {
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
#[path = "message_tests.rs"]
mod tests;
