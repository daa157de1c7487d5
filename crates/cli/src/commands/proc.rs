// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `muxcode-agent-bus proc start|list|status|log|stop|clean` — detached
//! background processes, tracked in `proc.jsonl` and reaped by the
//! supervisor's step 4 once their pid goes away.

use crate::output;
use crate::support;
use crate::table::{Column, Table};
use mcab_core::{ProcEntry, ProcStatus};
use std::io::Write as _;
use std::process::Stdio;

#[derive(clap::Args)]
pub struct Args {
    #[command(subcommand)]
    pub action: Action,
}

#[derive(clap::Subcommand)]
pub enum Action {
    /// Launch `command` (via `sh -c`) detached, logging its output to
    /// `proc-logs/<id>.log` under the bus directory.
    Start {
        command: String,
        #[arg(long)]
        dir: Option<String>,
        #[arg(long)]
        owner: Option<String>,
    },
    List,
    Status {
        id: String,
    },
    Log {
        id: String,
    },
    Stop {
        id: String,
    },
    /// Drop completed/failed entries from `proc.jsonl`.
    Clean,
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    let bus = support::bus();
    let path = bus.paths().proc();

    match args.action {
        Action::Start { command, dir, owner } => {
            let owner = support::resolve_role(owner)?;
            let id = support::short_id("proc");
            let dir = dir.unwrap_or_else(|| ".".to_string());
            let log_dir = bus.paths().root().join("proc-logs");
            std::fs::create_dir_all(&log_dir)?;
            let log_file = log_dir.join(format!("{id}.log"));

            let log = std::fs::File::create(&log_file)?;
            let child = tokio::process::Command::new("sh")
                .arg("-c")
                .arg(&command)
                .current_dir(&dir)
                .stdin(Stdio::null())
                .stdout(Stdio::from(log.try_clone()?))
                .stderr(Stdio::from(log))
                .spawn()?;
            let pid = child.id().ok_or_else(|| anyhow::anyhow!("process exited before its pid could be read"))?;
            // Detach: the supervisor reaps completion via `kill -0`, not `wait()`.
            std::mem::drop(child);

            let entry = ProcEntry {
                id: id.clone(),
                pid,
                command,
                dir,
                owner,
                log_file: log_file.display().to_string(),
                status: ProcStatus::Running,
                exit_code: None,
                notified: false,
                started_ts: support::now(),
                finished_ts: None,
            };
            mcab_bus::proc_store::add(&path, entry)?;
            println!("{id}");
        }
        Action::List => {
            let entries = mcab_bus::proc_store::list(&path)?;
            let mut table = Table::new(vec![
                Column::left("ID"),
                Column::left("OWNER"),
                Column::status("STATUS"),
                Column::left("COMMAND").with_max(60),
                Column::muted("STARTED"),
            ]);
            for entry in entries {
                table.row(vec![
                    entry.id,
                    entry.owner,
                    entry.status.to_string(),
                    entry.command,
                    output::format_time_ago(entry.started_ts),
                ]);
            }
            table.render(&mut std::io::stdout());
        }
        Action::Status { id } => {
            let entry = mcab_bus::proc_store::get(&path, &id)?.ok_or_else(|| anyhow::anyhow!("no proc {id}"))?;
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        Action::Log { id } => {
            let entry = mcab_bus::proc_store::get(&path, &id)?.ok_or_else(|| anyhow::anyhow!("no proc {id}"))?;
            let content = std::fs::read_to_string(&entry.log_file).unwrap_or_default();
            std::io::stdout().write_all(content.as_bytes())?;
        }
        Action::Stop { id } => {
            let entry = mcab_bus::proc_store::get(&path, &id)?.ok_or_else(|| anyhow::anyhow!("no proc {id}"))?;
            let status = tokio::process::Command::new("kill").arg(entry.pid.to_string()).status().await?;
            if !status.success() {
                tracing::warn!(id = %id, pid = entry.pid, "kill did not report success");
            }
            mcab_bus::proc_store::complete(&path, &id, 143, support::now())?;
        }
        Action::Clean => {
            let entries = mcab_bus::proc_store::list(&path)?;
            let kept: Vec<ProcEntry> = entries.into_iter().filter(|e| matches!(e.status, ProcStatus::Running)).collect();
            mcab_bus::table::write_all(&path, &kept)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "proc_tests.rs"]
mod tests;
