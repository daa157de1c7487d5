// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `muxcode-agent-bus inbox [--peek] [--raw] [--role R]`.

use crate::output;
use crate::support;

#[derive(clap::Args)]
pub struct Args {
    /// Read without consuming.
    #[arg(long)]
    pub peek: bool,
    /// Print each message as a raw JSON line instead of a formatted summary.
    #[arg(long)]
    pub raw: bool,
    #[arg(long)]
    pub role: Option<String>,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let role = support::resolve_role(args.role)?;
    let bus = support::bus();
    let scan = if args.peek { bus.peek(&role)? } else { bus.receive(&role)? };

    for msg in &scan.messages {
        if args.raw {
            println!("{}", serde_json::to_string(msg)?);
        } else {
            println!(
                "[{}] {} -> {} {} {}: {}",
                output::format_time_ago(msg.ts),
                msg.from,
                msg.to,
                msg.kind,
                msg.action,
                msg.payload,
            );
        }
    }
    if scan.skipped > 0 {
        eprintln!("skipped {} malformed line(s)", scan.skipped);
    }
    Ok(())
}

#[cfg(test)]
#[path = "inbox_tests.rs"]
mod tests;
