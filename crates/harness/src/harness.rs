// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The local-agent harness: the inbox → conversation → reply state machine
//! from spec.md §4.4, generalized from `oj-adapters::agent::claude`'s
//! spawn/send/watch lifecycle shape (there: drive an external CLI pane;
//! here: drive an in-process tool-calling loop against an OpenAI-compatible
//! endpoint).
//!
//! ```text
//! IDLE ──inbox non-empty──▶ LOCKED
//! LOCKED ──consume, filter.Reset──▶ THINKING
//! THINKING ──no tool_calls──▶ (optional) SUMMARIZE ──send reply──▶ UNLOCK ──▶ IDLE
//! THINKING ──tool_calls──▶ EXECUTING
//! EXECUTING ──all calls blocked──▶ THINKING (corrective user turn)
//! EXECUTING ──at least one call ran──▶ THINKING
//! THINKING ──turn count ≥ max_turns──▶ (forced summary) ──send reply──▶ UNLOCK ──▶ IDLE
//! ```

use crate::error::HarnessError;
use crate::filter::{FilterDecision, SafetyFilter};
use crate::model::{ChatBackend, ChatMessage, ToolCall};
use crate::narration;
use crate::profile::ToolProfile;
use crate::{executor, tools};
use mcab_adapters::PaneController;
use mcab_bus::rolelock::RoleLockGuard;
use mcab_bus::Bus;
use mcab_core::message::{HistoryEntry, Outcome};
use mcab_core::{Clock, IdGen, Message, MessageType};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Reply bodies are truncated to this many bytes (spec.md §4.4).
pub const REPLY_TRUNCATE_BYTES: usize = 4000;

const HOW_YOU_WORK: &str = "## How You Work\n\n\
Messages addressed to you are delivered automatically and already appear in \
the task list in your next user turn. Never run an inbox-check command to \
look for new messages — there is nothing there that is not already in this \
turn's context, and doing so only wastes a turn. When you finish, reply \
with a plain-text report of what you actually did and observed, not a plan \
for what you intend to do.";

/// The four optional ingredients concatenated once at startup into the
/// harness's system prompt (spec.md §4.4 "Prompt assembly").
#[derive(Debug, Clone, Default)]
pub struct PromptSections {
    pub agent_definition: String,
    pub examples: Option<String>,
    pub skills_prompt: Option<String>,
    pub context_prompt: Option<String>,
}

impl PromptSections {
    pub fn assemble(&self) -> String {
        let mut parts = vec![self.agent_definition.clone(), HOW_YOU_WORK.to_string()];
        if let Some(e) = &self.examples {
            parts.push(e.clone());
        }
        if let Some(s) = &self.skills_prompt {
            parts.push(s.clone());
        }
        if let Some(c) = &self.context_prompt {
            parts.push(c.clone());
        }
        parts.retain(|p| !p.is_empty());
        parts.join("\n\n")
    }
}

/// Per-harness tunables, all spec.md §4.4-default-backed.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub max_turns: u32,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_repeat: u32,
    /// Roles exempt from supervisor/harness-driven pane notification
    /// (spec.md §4.1, e.g. `edit`).
    pub notify_exempt_roles: Vec<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            max_turns: 10,
            temperature: 0.2,
            max_tokens: 2048,
            max_repeat: crate::filter::DEFAULT_MAX_REPEAT,
            notify_exempt_roles: Vec::new(),
        }
    }
}

/// `{action, from, instructions}` framing for one batch's inbound messages
/// — the only place the model learns what to do (spec.md §4.4 "Task
/// framing").
fn build_task_message(inbound: &[Message]) -> ChatMessage {
    let mut lines = vec!["You have new messages to handle:".to_string()];
    for m in inbound {
        lines.push(format!(
            "- action={} from={} instructions={}",
            m.action, m.from, m.payload
        ));
    }
    ChatMessage::user(lines.join("\n"))
}

const RESTATE_TASK: &str = "All of your tool calls this turn were blocked. Re-read the task list \
above and try a different, permitted approach. Do not attempt to read your inbox again.";

/// Pull the exit code back out of `run_bash`'s `--- exit code: N ---`
/// trailer (spec.md §4.6: "exit code preserved") so history entries carry
/// a real code instead of always recording `None`.
fn extract_exit_code(output: &str) -> Option<i32> {
    let marker = "--- exit code: ";
    let start = output.rfind(marker)? + marker.len();
    let rest = &output[start..];
    let end = rest.find(" ---")?;
    rest[..end].parse().ok()
}

fn truncate_bytes(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}

/// Drives one role's inbox → conversation → reply loop.
pub struct Harness<B: ChatBackend, P: PaneController> {
    bus: Bus,
    bus_role: String,
    config: HarnessConfig,
    prompts: PromptSections,
    profile: ToolProfile,
    chat: B,
    pane: P,
    clock: Arc<dyn Clock>,
    id_gen: Arc<dyn IdGen>,
}

impl<B: ChatBackend, P: PaneController> Harness<B, P> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bus: Bus,
        bus_role: impl Into<String>,
        config: HarnessConfig,
        prompts: PromptSections,
        profile: ToolProfile,
        chat: B,
        pane: P,
        clock: Arc<dyn Clock>,
        id_gen: Arc<dyn IdGen>,
    ) -> Self {
        Self {
            bus,
            bus_role: bus_role.into(),
            config,
            prompts,
            profile,
            chat,
            pane,
            clock,
            id_gen,
        }
    }

    /// Write `harness-<bus_role>.pid`, suppressing supervisor pane
    /// notification for this role for as long as we run (spec.md §4.4
    /// "Marker lifecycle").
    pub fn write_marker(&self) -> std::io::Result<()> {
        std::fs::write(self.bus.paths().harness_marker(&self.bus_role), std::process::id().to_string())
    }

    pub fn remove_marker(&self) {
        let _ = std::fs::remove_file(self.bus.paths().harness_marker(&self.bus_role));
    }

    /// Poll the inbox every `poll_interval` until `shutdown` fires, running
    /// one batch each time the inbox is non-empty.
    pub async fn run_forever(
        &self,
        poll_interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), HarnessError> {
        self.write_marker()?;
        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
                _ = tokio::time::sleep(poll_interval) => {
                    if let Err(e) = self.run_once().await {
                        tracing::warn!(role = %self.bus_role, error = %e, "harness batch failed");
                    }
                }
            }
        }
        self.remove_marker();
        Ok(())
    }

    /// Run a single poll tick: if the inbox is non-empty, lock, consume,
    /// process, reply, unlock. Returns `Ok(None)` when there was nothing
    /// to do.
    pub async fn run_once(&self) -> Result<Option<Message>, HarnessError> {
        if self.bus.inbox_size_bytes(&self.bus_role) == 0 {
            return Ok(None);
        }
        let _guard = RoleLockGuard::acquire(&self.bus.paths().role_lock(&self.bus_role))?;
        let scan = self.bus.receive(&self.bus_role)?;
        if scan.messages.is_empty() {
            return Ok(None);
        }
        let reply = self.process_batch(scan.messages).await?;
        self.bus.send(&reply.to.clone(), &reply)?;
        let exempt: Vec<&str> = self.config.notify_exempt_roles.iter().map(|s| s.as_str()).collect();
        if let Err(e) = mcab_adapters::notify_role(&self.pane, self.bus.paths(), &reply.to, &exempt).await {
            tracing::warn!(to = %reply.to, error = %e, "pane notify failed");
        }
        Ok(Some(reply))
    }

    /// The tool-calling conversation for one batch of inbound messages.
    async fn process_batch(&self, inbound: Vec<Message>) -> Result<Message, HarnessError> {
        let mut filter = SafetyFilter::new(self.bus_role.clone()).with_max_repeat(self.config.max_repeat);
        filter.reset();

        let system = self.prompts.assemble();
        let mut messages = vec![ChatMessage::system(system), build_task_message(&inbound)];
        let tool_defs = tools::tool_definitions();

        let mut ran_any_tool = false;
        let mut candidate: Option<String> = None;

        for _turn in 0..self.config.max_turns {
            let turn = self
                .chat
                .complete(&messages, Some(&tool_defs), self.config.temperature, self.config.max_tokens)
                .await?;
            messages.push(ChatMessage::assistant(turn.content.clone(), turn.tool_calls.clone()));

            if turn.tool_calls.is_empty() {
                candidate = Some(turn.content);
                break;
            }

            let mut any_ran = false;
            for call in &turn.tool_calls {
                let decision = self.filter_call(&mut filter, call);
                match decision {
                    FilterDecision::Block(msg) => {
                        messages.push(ChatMessage::tool(call.id.clone(), msg));
                    }
                    FilterDecision::Allow => {
                        let output = self.run_tool(call).await;
                        any_ran = true;
                        ran_any_tool = true;
                        messages.push(ChatMessage::tool(call.id.clone(), output));
                    }
                }
            }
            if !any_ran {
                messages.push(ChatMessage::user(RESTATE_TASK));
            }
        }

        let mut reply_text = match candidate {
            Some(text) => text,
            None => {
                // Forced summary: max_turns exhausted without a tool-free turn.
                messages.push(ChatMessage::user(
                    "You have used all of your allotted turns. Reply now with a final report.",
                ));
                let turn = self
                    .chat
                    .complete(&messages, None, self.config.temperature, self.config.max_tokens)
                    .await?;
                turn.content
            }
        };

        if ran_any_tool && narration::looks_like_narration(&reply_text) {
            messages.push(ChatMessage::user(narration::CORRECTIVE_INSTRUCTION));
            if let Ok(turn) = self
                .chat
                .complete(&messages, None, self.config.temperature, self.config.max_tokens)
                .await
            {
                if !turn.content.trim().is_empty() {
                    reply_text = turn.content;
                }
            }
        }

        reply_text = truncate_bytes(&reply_text, REPLY_TRUNCATE_BYTES);

        let Some(last) = inbound.last() else {
            return Err(HarnessError::EmptyBatch);
        };
        Ok(Message::new(
            self.id_gen.as_ref(),
            self.clock.now_unix(),
            self.bus_role.clone(),
            last.from.clone(),
            MessageType::Response,
            last.action.clone(),
            reply_text,
            Some(last.id.clone()),
        ))
    }

    fn filter_call(&self, filter: &mut SafetyFilter, call: &ToolCall) -> FilterDecision {
        if call.function.name != "bash" {
            return FilterDecision::Allow;
        }
        match tools::extract_command(&call.function.arguments) {
            Some(command) => filter.check_bash(&command),
            None => FilterDecision::Allow,
        }
    }

    async fn run_tool(&self, call: &ToolCall) -> String {
        let result = executor::execute(&call.function.name, &call.function.arguments, &self.profile).await;
        let (output, outcome, exit_code) = match &result {
            Ok(output) => {
                let exit_code = extract_exit_code(output);
                let outcome = match exit_code {
                    Some(0) | None => Outcome::Success,
                    Some(_) => Outcome::Failure,
                };
                (output.clone(), outcome, exit_code)
            }
            Err(e) => (format!("error: {e}"), Outcome::Failure, None),
        };

        if call.function.name == "bash" {
            let command = tools::extract_command(&call.function.arguments);
            let entry = HistoryEntry {
                ts: self.clock.now_unix(),
                summary: command.clone().unwrap_or_else(|| "bash".to_string()),
                exit_code,
                command,
                output: truncate_bytes(&output, 2000),
                outcome,
            };
            if let Err(e) = self.bus.record_history(&self.bus_role, &entry) {
                tracing::warn!(role = %self.bus_role, error = %e, "failed to record history");
            }
        }

        output
    }
}

#[cfg(test)]
#[path = "harness_tests.rs"]
mod tests;
