// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `muxcode-agent-busd` — the long-lived supervisor process (spec.md
//! §4.3). Resolves the bus directory and tunables the same way the CLI
//! does, then polls forever until told to stop.
//!
//! Grounded on `oj-daemon::main`'s shape: build the dependencies, start a
//! `tokio::sync::watch` shutdown signal wired to SIGINT/SIGTERM, run the
//! loop, join on shutdown.

use mcab_adapters::TmuxPaneController;
use mcab_core::{OsRngIdGen, SystemClock};
use mcab_engine::{Supervisor, SupervisorConfig, SupervisorOptions};
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("MUXCODE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let bus = mcab_bus::Bus::resolve();
    tracing::info!(root = %bus.paths().root().display(), "resolved bus directory");

    let config = SupervisorConfig::load(&bus.paths().supervisor_config())?;
    let pane = TmuxPaneController::new();
    let clock = Arc::new(SystemClock);
    let id_gen = Arc::new(OsRngIdGen);
    let mut supervisor = Supervisor::new(bus, pane, clock, id_gen, config, SupervisorOptions::default());

    let mut sigterm = signal(SignalKind::terminate())?;
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
        tracing::info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    supervisor.run_forever(shutdown_rx).await;
    tracing::info!("supervisor stopped");
    Ok(())
}
