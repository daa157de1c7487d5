// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `muxcode-agent-bus guard [role] [--json]` — run the same detectors the
//! supervisor's step 6 runs, once, ad hoc. Unlike the supervisor, a single
//! CLI invocation has no persisted cooldown state to consult, so every
//! alert above threshold is reported every time this runs.

use crate::support;
use mcab_bus::activity_log;
use mcab_engine::{detect_command_loop, detect_message_loop, SupervisorConfig};
use std::process::ExitCode;

#[derive(clap::Args)]
pub struct Args {
    pub role: Option<String>,
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: Args) -> ExitCode {
    match run_inner(&args) {
        Ok(alerts) if alerts.is_empty() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_inner(args: &Args) -> anyhow::Result<Vec<mcab_core::LoopAlert>> {
    let bus = support::bus();
    let config = SupervisorConfig::load(&bus.paths().supervisor_config())?;
    let now = support::now();

    let roles = match &args.role {
        Some(role) => vec![role.clone()],
        None => bus.paths().known_roles(),
    };

    let mut alerts = Vec::new();
    for role in &roles {
        let history = bus.history(role)?;
        alerts.extend(detect_command_loop(role, &history, now, config.loop_window_secs, config.loop_cmd_threshold));
    }
    let log = activity_log::read_all(&bus.paths().log())?;
    alerts.extend(detect_message_loop(&log, now, config.loop_window_secs, config.loop_msg_threshold));

    if args.json {
        println!("{}", serde_json::to_string(&alerts)?);
    } else {
        for alert in &alerts {
            println!("{}", alert.message);
        }
    }
    Ok(alerts)
}
