// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `muxcode-agent-bus subscribe add|list|remove|enable|disable` — CRUD
//! over `subs.jsonl`.

use crate::support;
use crate::table::{Align, Column, Table};
use mcab_bus::subscription_store;
use mcab_core::Subscription;

#[derive(clap::Args)]
pub struct Args {
    #[command(subcommand)]
    pub action: Action,
}

#[derive(clap::Subcommand)]
pub enum Action {
    /// Fire `message` to `target` whenever `event`/`outcome` match (each may be `*`).
    Add {
        event: String,
        outcome: String,
        target: String,
        message: String,
        /// Also send a pane-notify keystroke to this role on match.
        #[arg(long)]
        notify: Option<String>,
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
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let bus = support::bus();
    let path = bus.paths().subscriptions();

    match args.action {
        Action::Add { event, outcome, target, message, notify, disabled } => {
            let sub = Subscription {
                id: support::short_id("sub"),
                event,
                outcome,
                notify: notify.unwrap_or_default(),
                target,
                message,
                enabled: !disabled,
            };
            subscription_store::add(&path, sub.clone())?;
            println!("{}", sub.id);
        }
        Action::List => {
            let subs = subscription_store::list(&path)?;
            let mut table = Table::new(vec![
                Column::left("ID"),
                Column::left("EVENT"),
                Column::left("OUTCOME"),
                Column::left("TARGET"),
                Column { name: "ENABLED", align: Align::Left, style: crate::table::CellStyle::Status, min_width: None, max_width: None },
            ]);
            for sub in subs {
                table.row(vec![
                    sub.id,
                    sub.event,
                    sub.outcome,
                    sub.target,
                    if sub.enabled { "enabled".to_string() } else { "disabled".to_string() },
                ]);
            }
            table.render(&mut std::io::stdout());
        }
        Action::Remove { id } => {
            if !subscription_store::remove(&path, &id)? {
                anyhow::bail!("no subscription {id}");
            }
        }
        Action::Enable { id } => {
            if !subscription_store::set_enabled(&path, &id, true)? {
                anyhow::bail!("no subscription {id}");
            }
        }
        Action::Disable { id } => {
            if !subscription_store::set_enabled(&path, &id, false)? {
                anyhow::bail!("no subscription {id}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "subscribe_tests.rs"]
mod tests;
