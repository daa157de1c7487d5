// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Transport/semantic failures talking to the local model endpoint.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model endpoint returned {status}: {body}")]
    Semantic { status: u16, body: String },
    #[error("response had no choices")]
    NoChoices,
    #[error("malformed tool call: {0}")]
    MalformedToolCall(String),
}

/// Tool-execution failures, distinct from filter blocks (which are policy,
/// not errors — see [`crate::filter`]).
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("tool not permitted by role profile: {0}")]
    NotPermitted(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("command timed out after {0}s")]
    Timeout(u64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("replacement string not unique in file (found {0} occurrences)")]
    NotUnique(usize),
}

/// Safety-filter configuration/parse failures (not block decisions).
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid repeat threshold: {0}")]
    InvalidThreshold(String),
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Exec(#[from] ExecError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Bus(#[from] mcab_bus::BusError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("batch had no inbound messages to reply to")]
    EmptyBatch,
}
