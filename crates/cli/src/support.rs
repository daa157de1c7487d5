// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Small pieces every command module needs: role/bus resolution, the
//! production clock/id-gen pair, and a short-id helper for CRUD tables
//! that don't have a natural message-style id.

use mcab_bus::{Bus, BusPaths};
use mcab_core::{Clock, IdGen, OsRngIdGen, SystemClock};

/// Resolve the acting role: an explicit `--role`/positional override first,
/// else `AGENT_ROLE`. Most commands that touch an inbox/lock need one.
pub fn resolve_role(explicit: Option<String>) -> anyhow::Result<String> {
    explicit
        .or_else(BusPaths::own_role)
        .ok_or_else(|| anyhow::anyhow!("no role given: pass it explicitly or set AGENT_ROLE"))
}

pub fn bus() -> Bus {
    Bus::resolve()
}

pub fn now() -> i64 {
    SystemClock.now_unix()
}

pub fn id_gen() -> OsRngIdGen {
    OsRngIdGen
}

/// A short id for CRUD records (subscriptions, cron entries, proc/spawn
/// entries) that aren't addressed messages: `{prefix}-{8 hex}`.
pub fn short_id(prefix: &str) -> String {
    format!("{prefix}-{}", id_gen().next())
}

/// If `session` is given, point `BUS_SESSION` at it for the remainder of
/// the process before any [`bus()`]/[`BusPaths::resolve`] call. Used by
/// commands (`watch`, `cleanup`) whose spec signature takes an optional
/// session override rather than relying solely on the environment.
pub fn apply_session_override(session: Option<&str>) {
    if let Some(session) = session {
        // SAFETY-by-convention: single-threaded CLI startup, before any
        // other code reads BUS_SESSION.
        std::env::set_var(mcab_bus::paths::SESSION_ENV, session);
    }
}
