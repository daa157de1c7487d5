// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `muxcode-agent-bus` — the CLI surface of spec.md §6: everything an
//! agent or operator needs to talk to the file-backed bus without
//! depending on `mcab-engine`/`mcab-harness` directly.

mod color;
mod commands;
mod output;
mod support;
mod table;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "muxcode-agent-bus",
    version,
    about = "File-backed message bus for a fleet of coordinating coding agents",
    styles = color::styles()
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the bus directory layout for a session.
    Init(commands::init::Args),
    /// Append a message to a role's inbox and notify its pane.
    Send(commands::send::Args),
    /// Peek or consume a role's inbox.
    Inbox(commands::inbox::Args),
    /// Create the role's busy marker.
    Lock(commands::lock::LockArgs),
    /// Remove the role's busy marker.
    Unlock(commands::lock::UnlockArgs),
    /// Print whether a role is currently locked.
    IsLocked(commands::lock::IsLockedArgs),
    /// Send a pane-notification keystroke to a role.
    Notify(commands::notify::Args),
    /// Resolve and fire the chain rule (plus subscriptions) for an event/outcome.
    Chain(commands::chain::Args),
    /// Manage dynamic fan-out subscriptions.
    Subscribe(commands::subscribe::Args),
    /// Manage scheduled (cron-style) message injection.
    Cron(commands::cron::Args),
    /// Manage detached background processes.
    Proc(commands::proc::Args),
    /// Manage short-lived spawned-agent tracking.
    Spawn(commands::spawn::Args),
    /// Read/write the memory/context collaborator files.
    Memory(commands::memory::Args),
    /// Run loop detection once and report alerts.
    Guard(commands::guard::Args),
    /// Run the supervisor loop in the foreground.
    Watch(commands::watch::Args),
    /// Tear down a session's bus directory.
    Cleanup(commands::cleanup::Args),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("MUXCODE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => report(commands::init::run(args)),
        Commands::Send(args) => report(commands::send::run(args).await),
        Commands::Inbox(args) => report(commands::inbox::run(args)),
        Commands::Lock(args) => report(commands::lock::run_lock(args)),
        Commands::Unlock(args) => report(commands::lock::run_unlock(args)),
        Commands::IsLocked(args) => match commands::lock::run_is_locked(args) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("error: {e:#}");
                ExitCode::FAILURE
            }
        },
        Commands::Notify(args) => report(commands::notify::run(args).await),
        Commands::Chain(args) => commands::chain::run(args),
        Commands::Subscribe(args) => report(commands::subscribe::run(args)),
        Commands::Cron(args) => report(commands::cron::run(args)),
        Commands::Proc(args) => report(commands::proc::run(args).await),
        Commands::Spawn(args) => report(commands::spawn::run(args).await),
        Commands::Memory(args) => report(commands::memory::run(args)),
        Commands::Guard(args) => commands::guard::run(args),
        Commands::Watch(args) => report(commands::watch::run(args).await),
        Commands::Cleanup(args) => report(commands::cleanup::run(args)),
    }
}

fn report(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
