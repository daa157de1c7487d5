// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the one piece of external I/O this fleet depends on: the
//! terminal multiplexer pane a hosted agent runs in.

pub mod pane;

pub use pane::{notify_role, PaneController, PaneError, TmuxPaneController};

#[cfg(any(test, feature = "test-support"))]
pub use pane::{FakePaneController, PaneCall};
