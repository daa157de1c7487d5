// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `muxcode-agent-bus watch [session] [--poll N] [--debounce N]` — run the
//! supervisor loop in the foreground, for a session started without its
//! own `muxcode-agent-busd`.

use crate::support;
use mcab_adapters::TmuxPaneController;
use mcab_core::{OsRngIdGen, SystemClock};
use mcab_engine::{Supervisor, SupervisorConfig, SupervisorOptions};
use std::sync::Arc;

#[derive(clap::Args)]
pub struct Args {
    pub session: Option<String>,
    #[arg(long)]
    pub poll: Option<u64>,
    #[arg(long)]
    pub debounce: Option<u64>,
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    support::apply_session_override(args.session.as_deref());
    let bus = support::bus();

    let mut config = SupervisorConfig::load(&bus.paths().supervisor_config())?;
    if let Some(poll) = args.poll {
        config.poll_interval_secs = poll;
    }
    if let Some(debounce) = args.debounce {
        config.debounce_secs = debounce;
    }

    let pane = TmuxPaneController::new();
    let clock = Arc::new(SystemClock);
    let id_gen = Arc::new(OsRngIdGen);
    let mut supervisor = Supervisor::new(bus, pane, clock, id_gen, config, SupervisorOptions::default());

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        let _ = shutdown_tx.send(true);
    });

    supervisor.run_forever(shutdown_rx).await;
    Ok(())
}
