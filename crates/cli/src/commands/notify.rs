// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `muxcode-agent-bus notify <role>` — an explicit, operator-issued pane
//! nudge. Unlike the supervisor's own notifications, this bypasses the
//! `harness-<role>.pid` suppression: an operator asking for a notify means
//! it, even if a harness owns the role.

use mcab_adapters::{PaneController, TmuxPaneController};

#[derive(clap::Args)]
pub struct Args {
    pub role: String,
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    let ctrl = TmuxPaneController::new();
    ctrl.notify(&args.role).await?;
    Ok(())
}
