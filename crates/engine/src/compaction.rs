// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compaction recommendation (spec.md §4.3 step 7): estimate each role's
//! total bytes written (history + inbox + a slice of the shared log) and
//! recommend compaction once a role crosses a configured threshold,
//! subject to the same cooldown idiom as [`crate::loop_detect`].

use mcab_bus::Bus;
use std::collections::HashMap;

/// Estimate `role`'s total on-disk footprint: its history file, its
/// current inbox, and a fair share of the shared activity log (divided
/// evenly across every known role, since the log itself is not
/// per-role).
pub fn estimate_bytes(bus: &Bus, role: &str, role_count: usize) -> u64 {
    let history_len = std::fs::metadata(bus.paths().history(role))
        .map(|m| m.len())
        .unwrap_or(0);
    let inbox_len = bus.inbox_size_bytes(role);
    let log_len = mcab_bus::activity_log::log_len_bytes(&bus.paths().log());
    let log_share = if role_count == 0 {
        log_len
    } else {
        log_len / role_count as u64
    };
    history_len + inbox_len + log_share
}

/// Cooldown tracker, identical shape to [`crate::loop_detect::LoopCooldown`]
/// but keyed on role alone (one compaction recommendation per role).
#[derive(Debug, Default)]
pub struct CompactionCooldown {
    last_fired: HashMap<String, i64>,
}

impl CompactionCooldown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `role` should be recommended for compaction right now:
    /// over threshold and not within cooldown of its last recommendation.
    pub fn should_recommend(&mut self, role: &str, bytes: u64, threshold: u64, now: i64, cooldown_secs: i64) -> bool {
        if bytes < threshold {
            return false;
        }
        let on_cooldown = self
            .last_fired
            .get(role)
            .is_some_and(|last| now - last < cooldown_secs);
        if on_cooldown {
            return false;
        }
        self.last_fired.insert(role.to_string(), now);
        true
    }
}

#[cfg(test)]
#[path = "compaction_tests.rs"]
mod tests;
