// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `muxcode-agent-bus chain <event> <outcome>` — resolve the chain table
//! and fire subscriptions for a reported `(event, outcome)` pair. Exits 2
//! (not 1) when no chain rule matched, per spec.md §6/§8 testable
//! property 6, independent of whether subscriptions fired.

use crate::support;
use std::process::ExitCode;

#[derive(clap::Args)]
pub struct Args {
    pub event: String,
    pub outcome: String,
    #[arg(long = "exit-code")]
    pub exit_code: Option<i32>,
    #[arg(long)]
    pub command: Option<String>,
    /// Resolve and print what would fire, without sending anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

pub fn run(args: Args) -> ExitCode {
    match run_inner(&args) {
        Ok(matched) => {
            if matched {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_inner(args: &Args) -> anyhow::Result<bool> {
    let bus = support::bus();
    let command = args.command.clone().unwrap_or_default();

    if args.dry_run {
        let table = bus.load_chain_table()?;
        let matched = table.resolve(&args.event, &args.outcome).is_some();
        if matched {
            println!("rule matched for {}/{}", args.event, args.outcome);
        } else {
            println!("no rule configured for {}/{}", args.event, args.outcome);
        }
        return Ok(matched);
    }

    let id_gen = support::id_gen();
    let now = support::now();
    let table = bus.load_chain_table()?;
    let outcome = mcab_engine::resolve_and_fire(&bus, &table, &id_gen, now, &args.event, &args.outcome, args.exit_code, &command)?;

    if let Some(primary) = &outcome.primary {
        println!("sent {} to {}", primary.message_id, primary.target);
    }
    if let Some(cc) = &outcome.analyst_cc {
        println!("sent {} to {} (analyst cc)", cc.message_id, cc.target);
    }
    for firing in &outcome.fanout {
        println!("sent {} to {} (subscription)", firing.message_id, firing.target);
    }
    if !outcome.rule_matched {
        eprintln!("no chain rule configured for {}/{}", args.event, args.outcome);
    }
    Ok(outcome.rule_matched)
}

#[cfg(test)]
#[path = "chain_tests.rs"]
mod tests;
