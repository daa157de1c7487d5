// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The supervisor poll tick (spec.md §4.3): the eight steps, always run in
//! the same order, each independently idempotent and skippable. Grounded on
//! `oj-daemon::main`'s event loop shape — a `tokio::time::interval` created
//! once outside the `select!` body, `select!`ed against a shutdown signal,
//! with each branch handled by a small per-concern function.

use crate::compaction::{self, CompactionCooldown};
use crate::config::SupervisorConfig;
use crate::error::EngineError;
use crate::health_monitor::{self, HealthMonitor, HealthTransition};
use crate::loop_detect::{self, LoopCooldown};
use mcab_adapters::PaneController;
use mcab_bus::{activity_log, cron_store, proc_store, spawn_store, Bus};
use mcab_core::{Clock, CronEntry, IdGen, Message, MessageType};
use mcab_harness::ChatClient;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::watch;

/// Roles the supervisor never sends a pane-notify keystroke to directly
/// (their input would be mangled by a stray `Enter`), mirroring the
/// harness's own `notify_exempt_roles` (spec.md §4.2).
#[derive(Debug, Clone)]
pub struct SupervisorOptions {
    pub notify_exempt_roles: Vec<String>,
    pub sentinels: Vec<PathBuf>,
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self {
            notify_exempt_roles: vec!["edit".to_string()],
            sentinels: Vec::new(),
        }
    }
}

/// Drives the file-backed bus forward between agent turns: notices inbox
/// growth, fires cron entries, reaps finished proc/spawn entries, watches
/// for command/message loops, recommends compaction, and monitors the
/// local model endpoint.
pub struct Supervisor<P: PaneController> {
    bus: Bus,
    pane: P,
    clock: Arc<dyn Clock>,
    id_gen: Arc<dyn IdGen>,
    config: SupervisorConfig,
    chat: ChatClient,
    options: SupervisorOptions,

    inbox_sizes: HashMap<String, u64>,
    trigger_last_len: u64,
    pending_trigger_since: Option<i64>,

    cron_cache: Vec<CronEntry>,
    last_cron_reload: i64,
    force_cron_reload: bool,

    last_loop_detect: i64,
    loop_cooldown: LoopCooldown,

    last_compaction: i64,
    compaction_cooldown: CompactionCooldown,

    last_health_probe: i64,
    health: HealthMonitor,
}

impl<P: PaneController> Supervisor<P> {
    pub fn new(
        bus: Bus,
        pane: P,
        clock: Arc<dyn Clock>,
        id_gen: Arc<dyn IdGen>,
        config: SupervisorConfig,
        options: SupervisorOptions,
    ) -> Self {
        let chat = ChatClient::new(config.model_base_url.clone(), config.model_name.clone());
        Self {
            bus,
            pane,
            clock,
            id_gen,
            config,
            chat,
            options,
            inbox_sizes: HashMap::new(),
            trigger_last_len: 0,
            pending_trigger_since: None,
            cron_cache: Vec::new(),
            last_cron_reload: 0,
            force_cron_reload: true,
            last_loop_detect: 0,
            loop_cooldown: LoopCooldown::new(),
            last_compaction: 0,
            compaction_cooldown: CompactionCooldown::new(),
            last_health_probe: 0,
            health: HealthMonitor::new(),
        }
    }

    /// Poll forever on `config.poll_interval()`, until `shutdown` fires.
    pub async fn run_forever(&mut self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.config.poll_interval());
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
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once().await {
                        tracing::warn!(error = %e, "supervisor tick failed");
                    }
                }
            }
        }
    }

    /// Run all eight steps once, in order. Steps that send bus messages
    /// refresh the tracked inbox sizes at the very end, so the next tick's
    /// growth check (step 1) never re-fires for the supervisor's own
    /// sends.
    pub async fn run_once(&mut self) -> Result<(), EngineError> {
        let now = self.clock.now_unix();
        self.step_inbox_growth(now).await;
        self.step_file_edit_trigger(now).await?;
        self.step_cron(now).await?;
        self.step_proc(now).await?;
        self.step_spawn(now).await?;
        self.step_loop_detect(now)?;
        self.step_compaction(now)?;
        self.step_health(now).await;
        self.refresh_inbox_sizes();
        Ok(())
    }

    fn exempt_refs(&self) -> Vec<&str> {
        self.options.notify_exempt_roles.iter().map(|s| s.as_str()).collect()
    }

    fn refresh_inbox_sizes(&mut self) {
        for role in self.bus.paths().known_roles() {
            let size = self.bus.inbox_size_bytes(&role);
            self.inbox_sizes.insert(role, size);
        }
    }

    fn send_event(&self, to: &str, action: &str, payload: impl Into<String>, now: i64) -> Result<Message, EngineError> {
        let msg = Message::new(self.id_gen.as_ref(), now, "supervisor", to, MessageType::Event, action, payload, None);
        self.bus.send(to, &msg)?;
        Ok(msg)
    }

    /// Step 1: notify any role whose inbox grew since the last tick,
    /// except `edit` (never pane-notified, spec.md §4.3) and any harness
    /// currently running it (it would see its own notify keystroke).
    async fn step_inbox_growth(&mut self, _now: i64) {
        let roles = self.bus.paths().known_roles();
        let exempt = self.exempt_refs();
        for role in &roles {
            let size = self.bus.inbox_size_bytes(role);
            let prev = *self.inbox_sizes.get(role).unwrap_or(&0);
            if size > prev {
                if let Err(e) = mcab_adapters::notify_role(&self.pane, self.bus.paths(), role, &exempt).await {
                    tracing::warn!(role = %role, error = %e, "pane notify failed");
                }
            }
        }
    }

    /// Step 2: debounce the shared file-edit trigger log. Whenever it
    /// grows, reset the debounce timer; once it stops growing for
    /// `debounce_secs`, collect the unique edited paths, send one
    /// aggregate event to `analyze`, notify, and truncate the log.
    async fn step_file_edit_trigger(&mut self, now: i64) -> Result<(), EngineError> {
        let path = self.bus.paths().trigger_log();
        let current_len = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        if current_len > self.trigger_last_len {
            self.pending_trigger_since = Some(now);
        }
        self.trigger_last_len = current_len;

        if current_len == 0 {
            self.pending_trigger_since = None;
            return Ok(());
        }

        let Some(since) = self.pending_trigger_since else {
            return Ok(());
        };
        if now - since < self.config.debounce_secs as i64 {
            return Ok(());
        }

        let content = std::fs::read_to_string(&path)?;
        let mut paths: Vec<&str> = content.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        paths.sort_unstable();
        paths.dedup();

        if !paths.is_empty() {
            self.send_event("analyze", "files-edited", paths.join("\n"), now)?;
            let exempt = self.exempt_refs();
            if let Err(e) = mcab_adapters::notify_role(&self.pane, self.bus.paths(), "analyze", &exempt).await {
                tracing::warn!(error = %e, "pane notify failed for files-edited");
            }
        }

        std::fs::write(&path, "")?;
        self.trigger_last_len = 0;
        self.pending_trigger_since = None;
        Ok(())
    }

    /// Step 3: reload `cron.jsonl` at most every `cron_reload_secs` (or
    /// immediately after a firing, so `last_run_ts` doesn't go stale), fire
    /// every due entry, and notify its target.
    async fn step_cron(&mut self, now: i64) -> Result<(), EngineError> {
        if self.force_cron_reload || now - self.last_cron_reload >= self.config.cron_reload_secs {
            self.cron_cache = cron_store::list(&self.bus.paths().cron())?;
            self.last_cron_reload = now;
            self.force_cron_reload = false;
        }

        let due: Vec<CronEntry> = self.cron_cache.iter().filter(|e| e.due(now)).cloned().collect();
        if due.is_empty() {
            return Ok(());
        }

        let exempt = self.exempt_refs();
        for entry in due {
            let msg = self.send_event(&entry.target, &entry.action, entry.message.clone(), now)?;
            let history = mcab_core::CronHistoryEntry {
                cron_id: entry.id.clone(),
                ts: now,
                message_id: msg.id,
                target: entry.target.clone(),
                action: entry.action.clone(),
            };
            cron_store::record_firing(&self.bus.paths().cron(), &self.bus.paths().cron_history(), &entry.id, now, &history)?;
            if let Err(e) = mcab_adapters::notify_role(&self.pane, self.bus.paths(), &entry.target, &exempt).await {
                tracing::warn!(target = %entry.target, error = %e, "pane notify failed for cron firing");
            }
            if let Some(cached) = self.cron_cache.iter_mut().find(|e| e.id == entry.id) {
                cached.last_run_ts = now;
            }
        }
        self.force_cron_reload = true;
        Ok(())
    }

    /// Step 4: reap `proc.jsonl` entries whose pid is no longer alive, then
    /// notify owners of everything newly finished.
    async fn step_proc(&mut self, now: i64) -> Result<(), EngineError> {
        let path = self.bus.paths().proc();
        let entries = proc_store::list(&path)?;
        for entry in entries.iter().filter(|e| matches!(e.status, mcab_core::ProcStatus::Running)) {
            if !pid_alive(entry.pid).await {
                // The process is detached from us; we can't recover its real
                // exit status, only that it's gone. Treat "gone" as success
                // (exit code 0) — a failed command usually self-reports via
                // its own history entry, this is a best-effort backstop.
                proc_store::complete(&path, &entry.id, 0, now)?;
            }
        }

        let exempt = self.exempt_refs();
        for entry in proc_store::needing_notification(&path)? {
            let payload = format!(
                "proc {} ({}) finished: {} exit={}",
                entry.id,
                entry.command,
                entry.status,
                entry.exit_code.map(|c| c.to_string()).unwrap_or_default(),
            );
            self.send_event(&entry.owner, "proc-complete", payload, now)?;
            if let Err(e) = mcab_adapters::notify_role(&self.pane, self.bus.paths(), &entry.owner, &exempt).await {
                tracing::warn!(owner = %entry.owner, error = %e, "pane notify failed for proc completion");
            }
            proc_store::mark_notified(&path, &entry.id)?;
        }
        Ok(())
    }

    /// Step 5: reap `spawn.jsonl` entries whose tmux window no longer
    /// exists, capturing the last message that spawn's bus identity sent to
    /// its owner as the result, then notify owners.
    async fn step_spawn(&mut self, now: i64) -> Result<(), EngineError> {
        let path = self.bus.paths().spawn();
        let entries = spawn_store::list(&path)?;
        for entry in entries.iter().filter(|e| matches!(e.status, mcab_core::SpawnStatus::Running)) {
            let alive = self.pane.exists(&entry.window).await.unwrap_or(true);
            if !alive {
                let result = self.last_message_to_owner(&entry.owner, &entry.spawn_role);
                spawn_store::complete(&path, &entry.id, result, now)?;
            }
        }

        let exempt = self.exempt_refs();
        for entry in spawn_store::needing_notification(&path)? {
            let payload = format!(
                "spawn {} ({}) finished: {} result={}",
                entry.id,
                entry.role,
                entry.status,
                entry.result.clone().unwrap_or_default(),
            );
            self.send_event(&entry.owner, "spawn-complete", payload, now)?;
            if let Err(e) = mcab_adapters::notify_role(&self.pane, self.bus.paths(), &entry.owner, &exempt).await {
                tracing::warn!(owner = %entry.owner, error = %e, "pane notify failed for spawn completion");
            }
            spawn_store::mark_notified(&path, &entry.id)?;
        }
        Ok(())
    }

    /// The most recent (not yet consumed) message `spawn_role` sent to
    /// `owner`'s inbox, used as the spawn's "result" (spec.md §4.3 step 5).
    /// Peeking rather than receiving leaves the message in place for the
    /// owner's harness to process normally.
    fn last_message_to_owner(&self, owner: &str, spawn_role: &str) -> Option<String> {
        let scan = self.bus.peek(owner).ok()?;
        scan.messages.into_iter().rev().find(|m| m.from == spawn_role).map(|m| m.payload)
    }

    /// Step 6: every `loop_detect_interval_secs`, scan each role's history
    /// for a repeated command and the shared log for a repeated
    /// from/to/action triple; emit `loop-detected` to `edit` for anything
    /// past threshold and off cooldown, without a pane notify (spec.md
    /// §4.3 step 6: "skip its pane-notification").
    fn step_loop_detect(&mut self, now: i64) -> Result<(), EngineError> {
        if now - self.last_loop_detect < self.config.loop_detect_interval_secs as i64 {
            return Ok(());
        }
        self.last_loop_detect = now;

        let mut alerts = Vec::new();
        for role in self.bus.paths().known_roles() {
            let history = self.bus.history(&role)?;
            alerts.extend(loop_detect::detect_command_loop(
                &role,
                &history,
                now,
                self.config.loop_window_secs,
                self.config.loop_cmd_threshold,
            ));
        }
        let log = activity_log::read_all(&self.bus.paths().log())?;
        alerts.extend(loop_detect::detect_message_loop(
            &log,
            now,
            self.config.loop_window_secs,
            self.config.loop_msg_threshold,
        ));

        let due = self.loop_cooldown.filter_due(alerts, now, self.config.loop_cooldown_secs);
        for alert in due {
            self.send_event("edit", "loop-detected", alert.message, now)?;
        }
        Ok(())
    }

    /// Step 7: every `compaction_interval_secs`, estimate each role's
    /// on-disk footprint and recommend compaction once it crosses
    /// threshold, same cooldown idiom as step 6.
    fn step_compaction(&mut self, now: i64) -> Result<(), EngineError> {
        if now - self.last_compaction < self.config.compaction_interval_secs as i64 {
            return Ok(());
        }
        self.last_compaction = now;

        let roles = self.bus.paths().known_roles();
        let role_count = roles.len();
        for role in &roles {
            let bytes = compaction::estimate_bytes(&self.bus, role, role_count);
            if self
                .compaction_cooldown
                .should_recommend(role, bytes, self.config.compaction_threshold_bytes, now, self.config.compaction_cooldown_secs)
            {
                self.send_event(role, "compact-recommended", format!("estimated {bytes} bytes written"), now)?;
            }
        }
        Ok(())
    }

    /// Step 8: every `health_probe_secs`, probe the configured model
    /// endpoint and check any catastrophic-failure sentinel files,
    /// notifying `edit` on every state transition. On `Restarting`, also
    /// runs `config.model_restart_command` and relaunches every configured
    /// `agent_relaunch` entry (spec.md §4.7).
    async fn step_health(&mut self, now: i64) {
        if now - self.last_health_probe < self.config.health_probe_secs as i64 {
            return;
        }
        self.last_health_probe = now;

        let healthy = self.chat.probe_healthy().await;
        let sentinel_present = health_monitor::any_sentinel_present(&self.options.sentinels);
        let transition = self.health.tick(healthy, sentinel_present);

        let action = match transition {
            HealthTransition::Recovered => Some("ollama-recovered"),
            HealthTransition::WentDown => Some("ollama-down"),
            HealthTransition::Restarting => Some("ollama-restarting"),
            HealthTransition::PeriodicAlert => Some("ollama-down"),
            HealthTransition::Unchanged => None,
        };
        if let Some(action) = action {
            if let Err(e) = self.send_event("edit", action, String::new(), now) {
                tracing::warn!(error = %e, "failed to send health transition event");
            }
        }

        if transition == HealthTransition::Restarting {
            health_monitor::restart_and_relaunch(&self.config).await;
        }
    }
}

/// Whether a process with this pid is still alive, checked the same way
/// the teacher shells out to external tools rather than adding a
/// process-inspection dependency: `kill -0` is a portable no-op signal.
async fn pid_alive(pid: u32) -> bool {
    Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
