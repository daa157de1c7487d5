// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `supervisor.toml`: every tunable of the poll tick (spec.md §4.3),
//! collected into one `Default`-backed struct per SPEC_FULL.md §4.3.

use crate::error::EngineError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// One role whose agent process should be relaunched after a model
/// restart (spec.md §4.7: "relaunch each affected role's agent process").
/// `command` is an argv vector run detached, the same convention
/// `mcab-cli`'s `proc start` uses for launching a tracked background
/// process.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentRelaunchSpec {
    pub role: String,
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    pub poll_interval_secs: u64,
    pub debounce_secs: u64,
    pub cron_reload_secs: i64,
    pub loop_detect_interval_secs: u64,
    pub loop_window_secs: i64,
    pub loop_cmd_threshold: u32,
    pub loop_msg_threshold: u32,
    pub loop_cooldown_secs: i64,
    pub compaction_interval_secs: u64,
    pub compaction_threshold_bytes: u64,
    pub compaction_cooldown_secs: i64,
    pub health_probe_secs: u64,
    pub model_base_url: String,
    pub model_name: String,
    /// Argv run to restart the unresponsive local-model endpoint (e.g.
    /// `["systemctl", "--user", "restart", "ollama"]`), bounded by
    /// `model_restart_timeout_secs` (spec.md §4.7: "attempt restart with
    /// 30 s timeout"). Empty means no restart command is configured, in
    /// which case the restart attempt is skipped but the affected roles'
    /// agent processes are still relaunched.
    pub model_restart_command: Vec<String>,
    pub model_restart_timeout_secs: u64,
    /// Roles backed by the local model, each with the command that
    /// relaunches its agent process. Run after the restart attempt
    /// regardless of whether the restart command succeeded, since a
    /// stuck harness process may be the actual problem.
    pub agent_relaunch: Vec<AgentRelaunchSpec>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 3,
            debounce_secs: 8,
            cron_reload_secs: 10,
            loop_detect_interval_secs: 60,
            loop_window_secs: 300,
            loop_cmd_threshold: 3,
            loop_msg_threshold: 4,
            loop_cooldown_secs: 600,
            compaction_interval_secs: 120,
            compaction_threshold_bytes: 10 * 1024 * 1024,
            compaction_cooldown_secs: 600,
            health_probe_secs: 30,
            model_base_url: "http://localhost:11434".to_string(),
            model_name: "qwen2.5".to_string(),
            model_restart_command: Vec::new(),
            model_restart_timeout_secs: 30,
            agent_relaunch: Vec::new(),
        }
    }
}

impl SupervisorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_secs(self.debounce_secs)
    }

    pub fn model_restart_timeout(&self) -> Duration {
        Duration::from_secs(self.model_restart_timeout_secs)
    }

    /// Load from `path`, falling back to [`Default`] when the file is
    /// absent (spec.md §4.3 tunables all ship with working defaults).
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
