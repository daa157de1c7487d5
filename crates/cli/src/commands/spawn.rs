// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `muxcode-agent-bus spawn start|list|status|result|stop|clean` — track a
//! short-lived spawned agent. Actually creating the tmux window is outside
//! `PaneController`'s contract (it only notifies/checks existing panes), so
//! `start` registers the metadata; the caller is expected to have already
//! created `window` (e.g. via its own `tmux new-window`) before calling this.

use crate::output;
use crate::support;
use crate::table::{Column, Table};
use mcab_core::{SpawnEntry, SpawnStatus};

#[derive(clap::Args)]
pub struct Args {
    #[command(subcommand)]
    pub action: Action,
}

#[derive(clap::Subcommand)]
pub enum Action {
    Start {
        /// Agent-definition role (tools/skills/examples identity).
        role: String,
        /// Bus identity inside the spawned pane.
        spawn_role: String,
        window: String,
        task: String,
        #[arg(long)]
        owner: Option<String>,
    },
    List,
    Status {
        id: String,
    },
    Result {
        id: String,
    },
    Stop {
        id: String,
    },
    /// Drop completed/failed entries from `spawn.jsonl`.
    Clean,
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    let bus = support::bus();
    let path = bus.paths().spawn();

    match args.action {
        Action::Start { role, spawn_role, window, task, owner } => {
            let owner = support::resolve_role(owner)?;
            let running = mcab_bus::spawn_store::running_for_owner(&path, &owner)?;
            if !running.is_empty() {
                anyhow::bail!("{owner} already owns {} running spawn(s); spawned agents may not themselves spawn", running.len());
            }
            let id = support::short_id("spawn");
            let entry = SpawnEntry {
                id: id.clone(),
                role,
                spawn_role,
                owner,
                window,
                task,
                status: SpawnStatus::Running,
                notified: false,
                started_ts: support::now(),
                finished_ts: None,
                result: None,
            };
            mcab_bus::spawn_store::add(&path, entry)?;
            println!("{id}");
        }
        Action::List => {
            let entries = mcab_bus::spawn_store::list(&path)?;
            let mut table = Table::new(vec![
                Column::left("ID"),
                Column::left("ROLE"),
                Column::left("OWNER"),
                Column::status("STATUS"),
                Column::muted("STARTED"),
            ]);
            for entry in entries {
                table.row(vec![
                    entry.id,
                    entry.role,
                    entry.owner,
                    entry.status.to_string(),
                    output::format_time_ago(entry.started_ts),
                ]);
            }
            table.render(&mut std::io::stdout());
        }
        Action::Status { id } => {
            let entry = mcab_bus::spawn_store::get(&path, &id)?.ok_or_else(|| anyhow::anyhow!("no spawn {id}"))?;
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        Action::Result { id } => {
            let entry = mcab_bus::spawn_store::get(&path, &id)?.ok_or_else(|| anyhow::anyhow!("no spawn {id}"))?;
            println!("{}", entry.result.unwrap_or_default());
        }
        Action::Stop { id } => {
            let entry = mcab_bus::spawn_store::get(&path, &id)?.ok_or_else(|| anyhow::anyhow!("no spawn {id}"))?;
            let status = tokio::process::Command::new("tmux").args(["kill-window", "-t", &entry.window]).status().await?;
            if !status.success() {
                tracing::warn!(id = %id, window = %entry.window, "tmux kill-window did not report success");
            }
            mcab_bus::spawn_store::complete(&path, &id, None, support::now())?;
        }
        Action::Clean => {
            let entries = mcab_bus::spawn_store::list(&path)?;
            let kept: Vec<SpawnEntry> = entries.into_iter().filter(|e| matches!(e.status, SpawnStatus::Running)).collect();
            mcab_bus::table::write_all(&path, &kept)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
