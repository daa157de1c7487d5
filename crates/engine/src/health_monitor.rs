// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local-model health monitor (spec.md §4.7), grounded on the sibling pack
//! repo's `mux::upstream::health::spawn_health_checker` fail-count/cap
//! state machine, adapted to poll a single configured chat endpoint via
//! [`mcab_harness::ChatClient::probe_healthy`] instead of per-session
//! upstreams.

use crate::config::SupervisorConfig;
use std::path::PathBuf;
use tokio::process::Command;

/// Fires once a sentinel file the harness writes on catastrophic failure
/// is observed, or after 3 consecutive failed probes (~90s down).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthTransition {
    /// Previously down, now healthy again: clear state, notify recovery.
    Recovered,
    /// Just crossed the "down" threshold (fail_count == 2): notify once,
    /// deduped by the caller's cooldown.
    WentDown,
    /// Crossed the restart threshold (fail_count == 3) and restarts are
    /// still available: notify + attempt a restart.
    Restarting,
    /// Crossed the restart threshold but `restarts` is already at the cap:
    /// a periodic reminder only, no restart attempted.
    PeriodicAlert,
    /// Nothing notable this tick.
    Unchanged,
}

const DOWN_THRESHOLD: u32 = 2;
const RESTART_THRESHOLD: u32 = 3;
const MAX_RESTARTS: u32 = 3;

/// `{fail_count, was_down, restarts}` from spec.md §4.7.
#[derive(Debug, Clone, Default)]
pub struct HealthMonitor {
    fail_count: u32,
    was_down: bool,
    restarts: u32,
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    /// Evaluate one tick. `healthy` is the probe result; `sentinel_present`
    /// is whether any configured sentinel file currently exists (presence
    /// always counts as unhealthy, independent of the probe).
    pub fn tick(&mut self, healthy: bool, sentinel_present: bool) -> HealthTransition {
        let unhealthy = !healthy || sentinel_present;

        if !unhealthy {
            if self.was_down {
                self.was_down = false;
                self.fail_count = 0;
                return HealthTransition::Recovered;
            }
            self.fail_count = 0;
            return HealthTransition::Unchanged;
        }

        self.fail_count += 1;

        if self.fail_count == DOWN_THRESHOLD && !self.was_down {
            self.was_down = true;
            return HealthTransition::WentDown;
        }

        if self.fail_count == RESTART_THRESHOLD {
            self.fail_count = 0;
            if self.restarts >= MAX_RESTARTS {
                return HealthTransition::PeriodicAlert;
            }
            self.restarts += 1;
            return HealthTransition::Restarting;
        }

        HealthTransition::Unchanged
    }
}

/// Any configured sentinel path that currently exists.
pub fn any_sentinel_present(sentinels: &[PathBuf]) -> bool {
    sentinels.iter().any(|p| p.exists())
}

/// The self-healing action spec.md §4.7 requires on `HealthTransition::Restarting`:
/// attempt `config.model_restart_command` under `config.model_restart_timeout()`,
/// then relaunch every configured `agent_relaunch` entry regardless of whether
/// the restart command succeeded (a stuck harness, not just the model, may be
/// the reason the endpoint looks dead). Every step is best-effort: a failure
/// here is logged and never propagated, the same policy the supervisor's other
/// external-process steps follow (pane notify, `kill -0` pid checks).
pub async fn restart_and_relaunch(config: &SupervisorConfig) {
    if config.model_restart_command.is_empty() {
        tracing::warn!("no model_restart_command configured; skipping restart attempt");
    } else {
        run_restart_command(&config.model_restart_command, config.model_restart_timeout()).await;
    }

    for spec in &config.agent_relaunch {
        relaunch_agent(&spec.role, &spec.command);
    }
}

async fn run_restart_command(argv: &[String], timeout: std::time::Duration) {
    let Some((program, args)) = argv.split_first() else {
        return;
    };
    let mut cmd = Command::new(program);
    cmd.args(args);

    match tokio::time::timeout(timeout, cmd.status()).await {
        Ok(Ok(status)) if status.success() => {
            tracing::info!(command = ?argv, "model restart command succeeded");
        }
        Ok(Ok(status)) => {
            tracing::warn!(command = ?argv, code = ?status.code(), "model restart command exited non-zero");
        }
        Ok(Err(e)) => {
            tracing::warn!(command = ?argv, error = %e, "model restart command failed to spawn");
        }
        Err(_) => {
            tracing::warn!(command = ?argv, timeout_secs = timeout.as_secs(), "model restart command timed out");
        }
    }
}

/// Launch `command` detached (no `wait()`, same fire-and-forget idiom as
/// `mcab-cli`'s `proc start`) so a stuck harness process for `role` is
/// replaced with a fresh one.
fn relaunch_agent(role: &str, command: &[String]) {
    let Some((program, args)) = command.split_first() else {
        tracing::warn!(role, "agent_relaunch entry has no command");
        return;
    };
    match Command::new(program).args(args).spawn() {
        Ok(child) => {
            tracing::info!(role, pid = ?child.id(), "relaunched agent process");
        }
        Err(e) => {
            tracing::warn!(role, error = %e, "failed to relaunch agent process");
        }
    }
}

#[cfg(test)]
#[path = "health_monitor_tests.rs"]
mod tests;
