// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `muxcode-agent-bus lock|unlock|is-locked [role]` — the advisory busy
//! marker, `lock/<role>.lock` (spec.md §4.1).

use crate::support;

#[derive(clap::Args)]
pub struct LockArgs {
    pub role: Option<String>,
}

#[derive(clap::Args)]
pub struct UnlockArgs {
    pub role: Option<String>,
}

#[derive(clap::Args)]
pub struct IsLockedArgs {
    pub role: Option<String>,
}

pub fn run_lock(args: LockArgs) -> anyhow::Result<()> {
    let role = support::resolve_role(args.role)?;
    support::bus().lock_role(&role)?;
    Ok(())
}

pub fn run_unlock(args: UnlockArgs) -> anyhow::Result<()> {
    let role = support::resolve_role(args.role)?;
    support::bus().unlock_role(&role)?;
    Ok(())
}

/// Prints `locked`/`unlocked` and exits 0 iff the role is locked, so the
/// command composes with shell `if muxcode-agent-bus is-locked build; then …`.
pub fn run_is_locked(args: IsLockedArgs) -> anyhow::Result<std::process::ExitCode> {
    let role = support::resolve_role(args.role)?;
    let locked = support::bus().role_is_locked(&role);
    println!("{}", if locked { "locked" } else { "unlocked" });
    Ok(if locked {
        std::process::ExitCode::SUCCESS
    } else {
        std::process::ExitCode::FAILURE
    })
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
