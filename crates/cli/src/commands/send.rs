// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `muxcode-agent-bus send <to> <action> <payload>` — the one command
//! every other piece of the fleet ultimately reduces to.

use crate::support;
use mcab_adapters::TmuxPaneController;
use mcab_core::{Message, MessageType};
use std::io::Read;

#[derive(clap::Args)]
pub struct Args {
    pub to: String,
    pub action: String,
    /// Omit (or pass `--stdin`) to read the payload from standard input.
    pub payload: Option<String>,
    #[arg(long = "type", default_value = "request")]
    pub kind: String,
    #[arg(long = "reply-to")]
    pub reply_to: Option<String>,
    #[arg(long = "no-notify")]
    pub no_notify: bool,
    #[arg(long)]
    pub stdin: bool,
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    let payload = if args.stdin || args.payload.is_none() {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        args.payload.clone().unwrap_or_default()
    };
    let kind: MessageType = args.kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let from = support::resolve_role(None)?;
    let bus = support::bus();
    let id_gen = support::id_gen();
    let now = support::now();

    let message = Message::new(&id_gen, now, from, args.to.clone(), kind, args.action.clone(), payload, args.reply_to.clone());
    if message.payload_over_limit() {
        tracing::warn!(to = %args.to, action = %args.action, "payload exceeds the recommended 500-byte limit");
    }
    bus.send(&args.to, &message)?;

    if !args.no_notify {
        let ctrl = TmuxPaneController::new();
        if let Err(e) = mcab_adapters::notify_role(&ctrl, bus.paths(), &args.to, &["edit"]).await {
            tracing::warn!(to = %args.to, error = %e, "pane notify failed after send");
        }
    }

    println!("{}", message.id);
    Ok(())
}

#[cfg(test)]
#[path = "send_tests.rs"]
mod tests;
