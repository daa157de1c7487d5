// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loop detection (spec.md §4.3 step 6): scan per-role history and the
//! activity log for a command or message pattern repeating past
//! threshold within a sliding window, grounded on `oj-engine::executor`'s
//! sha2-hashing-for-dedup idiom.

use mcab_core::message::{ActivityRecord, HistoryEntry};
use mcab_core::{LoopAlert, LoopAlertKind};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

fn normalize(command: &str) -> String {
    command.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn command_hash(command: &str) -> String {
    format!("{:x}", Sha256::digest(normalize(command).as_bytes()))
}

/// Scan `role`'s history for a command hash repeating `>= threshold` times
/// within the last `window_secs` seconds ending at `now`.
pub fn detect_command_loop(
    role: &str,
    history: &[HistoryEntry],
    now: i64,
    window_secs: i64,
    threshold: u32,
) -> Vec<LoopAlert> {
    let mut counts: HashMap<String, (u32, i64, i64)> = HashMap::new();
    for entry in history {
        let Some(command) = &entry.command else {
            continue;
        };
        if now - entry.ts > window_secs {
            continue;
        }
        let hash = command_hash(command);
        let slot = counts.entry(hash).or_insert((0, entry.ts, entry.ts));
        slot.0 += 1;
        slot.1 = slot.1.min(entry.ts);
        slot.2 = slot.2.max(entry.ts);
    }
    counts
        .into_iter()
        .filter(|(_, (count, _, _))| *count >= threshold)
        .map(|(hash, (count, first_ts, last_ts))| LoopAlert {
            role: role.to_string(),
            kind: LoopAlertKind::Command,
            key: hash,
            count,
            first_ts,
            last_ts,
            message: format!("role {role} repeated the same command {count} times"),
        })
        .collect()
}

/// Scan the activity log for a `(from, to, action)` triple repeating
/// `>= threshold` times within the window.
pub fn detect_message_loop(
    log: &[ActivityRecord],
    now: i64,
    window_secs: i64,
    threshold: u32,
) -> Vec<LoopAlert> {
    let mut counts: HashMap<(String, String, String), (u32, i64, i64)> = HashMap::new();
    for record in log {
        if now - record.ts > window_secs {
            continue;
        }
        let key = (record.from.clone(), record.to.clone(), record.action.clone());
        let slot = counts.entry(key).or_insert((0, record.ts, record.ts));
        slot.0 += 1;
        slot.1 = slot.1.min(record.ts);
        slot.2 = slot.2.max(record.ts);
    }
    counts
        .into_iter()
        .filter(|(_, (count, _, _))| *count >= threshold)
        .map(|((from, to, action), (count, first_ts, last_ts))| {
            let key = format!("{from}:{to}:{action}");
            LoopAlert {
                role: to.clone(),
                kind: LoopAlertKind::Message,
                key,
                count,
                first_ts,
                last_ts,
                message: format!(
                    "{from} -> {to} action={action} repeated {count} times in the last {window_secs}s"
                ),
            }
        })
        .collect()
}

/// Per-alert-identity cooldown tracker: the same `(role, kind, key)` alert
/// is suppressed for [`cooldown_secs`] after it last fired. `cooldown_secs`
/// must exceed the detection window or an alert would re-trigger itself on
/// the very next tick (spec.md §4.3 step 6).
#[derive(Debug, Default)]
pub struct LoopCooldown {
    last_fired: HashMap<(String, LoopAlertKind, String), i64>,
}

impl LoopCooldown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter `alerts` down to those not currently in cooldown, recording a
    /// firing for each one that survives.
    pub fn filter_due(&mut self, alerts: Vec<LoopAlert>, now: i64, cooldown_secs: i64) -> Vec<LoopAlert> {
        let mut due = Vec::new();
        for alert in alerts {
            let identity = (
                alert.role.clone(),
                alert.kind,
                alert.key.clone(),
            );
            let on_cooldown = self
                .last_fired
                .get(&identity)
                .is_some_and(|last| now - last < cooldown_secs);
            if on_cooldown {
                continue;
            }
            self.last_fired.insert(identity, now);
            due.push(alert);
        }
        due
    }
}

#[cfg(test)]
#[path = "loop_detect_tests.rs"]
mod tests;
