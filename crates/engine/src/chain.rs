// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chain resolution + subscription fan-out (spec.md §4.2), shared between
//! the `chain` CLI subcommand and (in principle) any supervisor-driven
//! trigger. A rule lookup miss is not an error here — callers map
//! [`ChainOutcome::NoRule`] to their own "no chain configured" exit code.

use crate::error::EngineError;
use mcab_bus::{subscription_store, Bus};
use mcab_core::{ChainTable, IdGen, Message, MessageType, TemplateVars};

#[derive(Debug, Clone)]
pub struct ChainFiring {
    pub target: String,
    pub message_id: String,
}

/// Result of one chain invocation. `rule_matched` alone decides the CLI's
/// exit code (spec.md §4.3 "chain exits 2 iff the pair has no rule") —
/// subscription fan-out firing independently of a matched rule does not
/// change that.
#[derive(Debug, Clone, Default)]
pub struct ChainOutcome {
    pub rule_matched: bool,
    pub primary: Option<ChainFiring>,
    pub analyst_cc: Option<ChainFiring>,
    pub fanout: Vec<ChainFiring>,
}

/// Resolve `(event, outcome)` against `table`, send the primary message
/// (and analyst CC) if a rule matches, then run subscription fan-out
/// regardless — subscriptions are independent of whether a chain rule
/// exists (spec.md §4.2, "independent of and runs after the primary chain
/// action").
#[allow(clippy::too_many_arguments)]
pub fn resolve_and_fire(
    bus: &Bus,
    table: &ChainTable,
    id_gen: &dyn IdGen,
    now: i64,
    event: &str,
    outcome: &str,
    exit_code: Option<i32>,
    command: &str,
) -> Result<ChainOutcome, EngineError> {
    let vars = TemplateVars { event, outcome, exit_code, command };

    let primary_rule = table.resolve(event, outcome);

    let mut primary = None;
    let mut analyst_cc = None;
    if let Some(rule) = primary_rule {
        let payload = mcab_core::expand_template(&rule.message, &vars);
        let msg = Message::new(id_gen, now, "supervisor", rule.send_to.clone(), rule.kind, rule.action.clone(), payload, None);
        bus.send(&rule.send_to, &msg)?;
        primary = Some(ChainFiring {
            target: rule.send_to.clone(),
            message_id: msg.id.clone(),
        });

        if rule.notify_analyst && rule.send_to != "analyze" {
            let cc_payload = mcab_core::expand_template(&rule.message, &vars);
            let cc = Message::new(id_gen, now, "supervisor", "analyze", MessageType::Event, rule.action.clone(), cc_payload, Some(msg.id));
            bus.send("analyze", &cc)?;
            analyst_cc = Some(ChainFiring {
                target: "analyze".to_string(),
                message_id: cc.id,
            });
        }
    }

    let subs = subscription_store::matching(&bus.paths().subscriptions(), event, outcome)?;
    let mut fanout = Vec::with_capacity(subs.len());
    for sub in subs {
        let payload = mcab_core::expand_template(&sub.message, &vars);
        let msg = Message::new(id_gen, now, "supervisor", sub.target.clone(), MessageType::Event, event, payload, None);
        bus.send(&sub.target, &msg)?;
        fanout.push(ChainFiring {
            target: sub.target.clone(),
            message_id: msg.id,
        });
    }

    Ok(ChainOutcome {
        rule_matched: primary.is_some(),
        primary,
        analyst_cc,
        fanout,
    })
}

#[cfg(test)]
#[path = "chain_tests.rs"]
mod tests;
