// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `muxcode-agent-bus cron add|list|remove|enable|disable|history` — CRUD
//! over `cron.jsonl` plus the append-only `cron-history.jsonl`.

use crate::output;
use crate::support;
use crate::table::{Column, Table};
use mcab_bus::cron_store;
use mcab_core::CronEntry;

#[derive(clap::Args)]
pub struct Args {
    #[command(subcommand)]
    pub action: Action,
}

#[derive(clap::Subcommand)]
pub enum Action {
    /// `schedule` is `@every <dur>`, `@hourly`, `@half-hourly`, or `@daily`.
    Add {
        schedule: String,
        target: String,
        action: String,
        message: String,
        #[arg(long)]
        disabled: bool,
    },
    List,
    Remove {
        id: String,
    },
    Enable {
        id: String,
    },
    Disable {
        id: String,
    },
    History,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let bus = support::bus();
    let path = bus.paths().cron();

    match args.action {
        Action::Add { schedule, target, action, message, disabled } => {
            let schedule = schedule.parse().map_err(|e: mcab_core::CoreError| anyhow::anyhow!(e))?;
            let entry = CronEntry {
                id: support::short_id("cron"),
                schedule,
                target,
                action,
                message,
                enabled: !disabled,
                last_run_ts: 0,
            };
            cron_store::add(&path, entry.clone())?;
            println!("{}", entry.id);
        }
        Action::List => {
            let entries = cron_store::list(&path)?;
            let mut table = Table::new(vec![
                Column::left("ID"),
                Column::left("SCHEDULE"),
                Column::left("TARGET"),
                Column::left("ACTION"),
                Column::status("ENABLED"),
                Column::muted("LAST RUN"),
            ]);
            for entry in entries {
                table.row(vec![
                    entry.id,
                    entry.schedule.to_string(),
                    entry.target,
                    entry.action,
                    if entry.enabled { "enabled".to_string() } else { "disabled".to_string() },
                    output::format_time_ago(entry.last_run_ts),
                ]);
            }
            table.render(&mut std::io::stdout());
        }
        Action::Remove { id } => {
            if !cron_store::remove(&path, &id)? {
                anyhow::bail!("no cron entry {id}");
            }
        }
        Action::Enable { id } => {
            if !cron_store::set_enabled(&path, &id, true)? {
                anyhow::bail!("no cron entry {id}");
            }
        }
        Action::Disable { id } => {
            if !cron_store::set_enabled(&path, &id, false)? {
                anyhow::bail!("no cron entry {id}");
            }
        }
        Action::History => {
            let history = cron_store::history(&bus.paths().cron_history())?;
            let mut table = Table::new(vec![
                Column::muted("WHEN"),
                Column::left("CRON ID"),
                Column::left("TARGET"),
                Column::left("ACTION"),
                Column::left("MESSAGE ID"),
            ]);
            for entry in history {
                table.row(vec![
                    output::format_time_ago(entry.ts),
                    entry.cron_id,
                    entry.target,
                    entry.action,
                    entry.message_id,
                ]);
            }
            table.render(&mut std::io::stdout());
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
