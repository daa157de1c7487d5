// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron entries and the pure `due()` predicate.
//!
//! `schedule` grammar: `@every <duration>` (duration like `5m`, `30s`, `2h`),
//! `@hourly` (60m), `@half-hourly` (30m), `@daily` (24h).

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A parsed cron schedule, reduced to its firing interval in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    interval_secs: i64,
    raw: ScheduleKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScheduleKind {
    Every,
    Hourly,
    HalfHourly,
    Daily,
}

impl Schedule {
    pub fn interval_secs(&self) -> i64 {
        self.interval_secs
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.raw {
            ScheduleKind::Hourly => write!(f, "@hourly"),
            ScheduleKind::HalfHourly => write!(f, "@half-hourly"),
            ScheduleKind::Daily => write!(f, "@daily"),
            ScheduleKind::Every => write!(f, "@every {}s", self.interval_secs),
        }
    }
}

impl FromStr for Schedule {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "@hourly" => Ok(Schedule {
                interval_secs: 3600,
                raw: ScheduleKind::Hourly,
            }),
            "@half-hourly" => Ok(Schedule {
                interval_secs: 1800,
                raw: ScheduleKind::HalfHourly,
            }),
            "@daily" => Ok(Schedule {
                interval_secs: 86400,
                raw: ScheduleKind::Daily,
            }),
            _ => {
                let rest = s
                    .strip_prefix("@every ")
                    .ok_or_else(|| CoreError::InvalidSchedule(s.to_string()))?;
                let secs = parse_duration_secs(rest)
                    .ok_or_else(|| CoreError::InvalidSchedule(s.to_string()))?;
                Ok(Schedule {
                    interval_secs: secs,
                    raw: ScheduleKind::Every,
                })
            }
        }
    }
}

/// Parse a short duration like `30s`, `5m`, `2h`, `1d` into seconds.
fn parse_duration_secs(s: &str) -> Option<i64> {
    let s = s.trim();
    let (num, unit) = s.split_at(s.len().checked_sub(1)?);
    let n: i64 = num.parse().ok()?;
    let mult = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 3600,
        "d" => 86400,
        _ => return None,
    };
    Some(n * mult)
}

impl Serialize for Schedule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronEntry {
    pub id: String,
    pub schedule: Schedule,
    pub target: String,
    pub action: String,
    pub message: String,
    #[serde(default = "super_default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub last_run_ts: i64,
}

fn super_default_true() -> bool {
    true
}

impl CronEntry {
    /// `due(entry, now) ≡ enabled ∧ (now − last_run_ts ≥ interval(schedule))`.
    pub fn due(&self, now_unix: i64) -> bool {
        self.enabled && now_unix - self.last_run_ts >= self.schedule.interval_secs()
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

/// A firing recorded in `cron-history.jsonl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronHistoryEntry {
    pub cron_id: String,
    pub ts: i64,
    pub message_id: String,
    pub target: String,
    pub action: String,
}

impl CronHistoryEntry {
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
#[path = "cron_tests.rs"]
mod tests;
