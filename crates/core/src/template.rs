// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `${event}`/`${outcome}`/`${exit_code}`/`${command}` substitution.
//!
//! Deliberately hand-rolled rather than pulling in a templating crate: the
//! grammar is four fixed placeholders, no loops/conditionals/escaping rules
//! worth a dependency (teacher precedent: `oj-daemon::listener::decisions`
//! does the same for its notification strings).

/// Inputs available to a chain/subscription/cron message template.
#[derive(Debug, Clone, Default)]
pub struct TemplateVars<'a> {
    pub event: &'a str,
    pub outcome: &'a str,
    pub exit_code: Option<i32>,
    pub command: &'a str,
}

/// Expand `${event}`, `${outcome}`, `${exit_code}`, `${command}` in `template`.
///
/// Unknown `${...}` placeholders are left verbatim (no error — a
/// misconfigured chain/subscription file shouldn't crash the supervisor).
pub fn expand_template(template: &str, vars: &TemplateVars<'_>) -> String {
    let exit_code_str = vars
        .exit_code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "".to_string());

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let (head, tail) = rest.split_at(start);
        out.push_str(head);
        let after_marker = &tail[2..];
        match after_marker.find('}') {
            Some(end) => {
                let key = &after_marker[..end];
                let replacement: Option<&str> = match key {
                    "event" => Some(vars.event),
                    "outcome" => Some(vars.outcome),
                    "exit_code" => Some(exit_code_str.as_str()),
                    "command" => Some(vars.command),
                    _ => None,
                };
                match replacement {
                    Some(r) => out.push_str(r),
                    // Unknown placeholder: emit verbatim.
                    None => out.push_str(&tail[..2 + end + 1]),
                }
                rest = &after_marker[end + 1..];
            }
            None => {
                // Unterminated `${`: emit the rest verbatim.
                out.push_str(tail);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
