// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `muxcode-agent-bus init` — lay out the bus directory skeleton so the
//! first `send`/`inbox` against a fresh session doesn't have to discover
//! missing parent directories on its own.

use crate::support;

#[derive(clap::Args)]
pub struct Args {}

pub fn run(_args: Args) -> anyhow::Result<()> {
    let bus = support::bus();
    let paths = bus.paths();
    for dir in [
        paths.root().join("inbox"),
        paths.root().join("lock"),
        paths.root().join("agents"),
        paths.memory_dir(),
    ] {
        std::fs::create_dir_all(&dir)?;
    }
    println!("{}", paths.root().display());
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
