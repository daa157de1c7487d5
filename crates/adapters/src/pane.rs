// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The terminal multiplexer contract: knows how to deliver a notification
//! keystroke to a named pane and check whether a pane exists. Everything
//! else about hosted agents — what runs in the pane, what it does with the
//! keystroke — is opaque to this crate.

use async_trait::async_trait;
use mcab_bus::BusPaths;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum PaneError {
    #[error("pane not found: {0}")]
    NotFound(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
}

/// A named terminal pane the fleet can nudge. Implementations are
/// best-effort: a notify failure is never fatal to the caller (spec.md
/// §4.2, "failures are logged, never fatal").
#[async_trait]
pub trait PaneController: Clone + Send + Sync + 'static {
    /// Deliver a notification keystroke to `pane`.
    async fn notify(&self, pane: &str) -> Result<(), PaneError>;

    /// Whether a pane named `pane` currently exists.
    async fn exists(&self, pane: &str) -> Result<bool, PaneError>;
}

/// Tmux-backed [`PaneController`]. The notification keystroke is `Enter`:
/// hosted chat UIs and REPLs sitting at a prompt treat it as "wake up and
/// look at what's new", without injecting any text of its own.
#[derive(Clone, Copy, Default)]
pub struct TmuxPaneController;

impl TmuxPaneController {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaneController for TmuxPaneController {
    async fn notify(&self, pane: &str) -> Result<(), PaneError> {
        let output = Command::new("tmux")
            .args(["send-keys", "-t", pane, "Enter"])
            .output()
            .await
            .map_err(|e| PaneError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(pane, stderr = %stderr, "tmux notify failed");
            return Err(PaneError::NotFound(pane.to_string()));
        }
        Ok(())
    }

    async fn exists(&self, pane: &str) -> Result<bool, PaneError> {
        let output = Command::new("tmux")
            .args(["has-session", "-t", pane])
            .output()
            .await
            .map_err(|e| PaneError::CommandFailed(e.to_string()))?;
        Ok(output.status.success())
    }
}

/// Apply `PaneController.Notify(role)` per spec.md §4.2: suppress the
/// keystroke entirely if a harness owns `role` (it would see its own
/// notification echo) or if `role` is in the caller-supplied exemption
/// list (hosts whose input the keystroke would mangle, e.g. `edit`).
pub async fn notify_role<P: PaneController>(
    ctrl: &P,
    paths: &BusPaths,
    role: &str,
    exempt_roles: &[&str],
) -> Result<(), PaneError> {
    if exempt_roles.contains(&role) {
        return Ok(());
    }
    if paths.harness_marker(role).exists() {
        return Ok(());
    }
    ctrl.notify(role).await
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{PaneController, PaneError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    pub enum PaneCall {
        Notify(String),
        Exists(String),
    }

    #[derive(Default)]
    struct FakeState {
        calls: Vec<PaneCall>,
        existing: HashSet<String>,
    }

    /// In-memory [`PaneController`] for tests: records every call and lets
    /// the test declare which panes exist.
    #[derive(Clone, Default)]
    pub struct FakePaneController {
        inner: Arc<Mutex<FakeState>>,
    }

    impl FakePaneController {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_pane(&self, pane: &str) {
            self.inner.lock().existing.insert(pane.to_string());
        }

        pub fn calls(&self) -> Vec<PaneCall> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl PaneController for FakePaneController {
        async fn notify(&self, pane: &str) -> Result<(), PaneError> {
            let mut inner = self.inner.lock();
            inner.calls.push(PaneCall::Notify(pane.to_string()));
            if inner.existing.contains(pane) {
                Ok(())
            } else {
                Err(PaneError::NotFound(pane.to_string()))
            }
        }

        async fn exists(&self, pane: &str) -> Result<bool, PaneError> {
            let mut inner = self.inner.lock();
            inner.calls.push(PaneCall::Exists(pane.to_string()));
            Ok(inner.existing.contains(pane))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePaneController, PaneCall};

#[cfg(test)]
#[path = "pane_tests.rs"]
mod tests;
