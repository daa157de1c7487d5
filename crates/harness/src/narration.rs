// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The narration-recovery heuristic (spec.md §4.4, §9 "Narration heuristic
//! is policy, not fundamental"): small models frequently reply with a plan
//! instead of a report of what already happened. This module only judges
//! whether a candidate reply *looks* like narration; the harness decides
//! what to do about it (one corrective completion with tools disabled).

const PLANNING_PHRASES: &[&str] = &["let's", "let me", "i will", "i'll", "i am going to"];

/// Does `reply` look like a plan rather than a report?
///
/// Two independent tells, either is sufficient: a future-tense planning
/// phrase, or two-or-more fenced code blocks with no success/failure
/// wording (a model dumping proposed diffs instead of narrating results).
pub fn looks_like_narration(reply: &str) -> bool {
    let lower = reply.to_lowercase();
    if PLANNING_PHRASES.iter().any(|p| lower.contains(p)) {
        return true;
    }
    let fence_count = lower.matches("```").count() / 2;
    if fence_count >= 2 && !lower.contains("succeeded") && !lower.contains("failed") {
        return true;
    }
    false
}

/// The corrective instruction appended for the recovery completion.
pub const CORRECTIVE_INSTRUCTION: &str =
    "Now report what already happened, not what you plan to do. State the outcome of the \
     tool calls you already made.";

#[cfg(test)]
#[path = "narration_tests.rs"]
mod tests;
