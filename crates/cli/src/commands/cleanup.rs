// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `muxcode-agent-bus cleanup [session]` — tear down a session's bus
//! directory. Not durable across reboots by design (spec.md §1 Non-goals);
//! this just deletes the scratch directory outright.

use crate::support;

#[derive(clap::Args)]
pub struct Args {
    pub session: Option<String>,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    support::apply_session_override(args.session.as_deref());
    let bus = support::bus();
    let root = bus.paths().root();
    if root.exists() {
        std::fs::remove_dir_all(root)?;
    }
    Ok(())
}
