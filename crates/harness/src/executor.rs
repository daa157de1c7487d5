// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool executor: one operation per supported tool, each gated by the
//! role's [`ToolProfile`] and run with a hard timeout.

use crate::error::ExecError;
use crate::profile::ToolProfile;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

pub const BASH_TIMEOUT: Duration = Duration::from_secs(60);
pub const GREP_TIMEOUT: Duration = Duration::from_secs(60);
pub const OUTPUT_TRUNCATE_BYTES: usize = 10_000;

const VCS_AND_VENDOR_DIRS: &[&str] = &[".git", "node_modules", "target", "vendor", ".hg", ".svn"];

/// Execute `tool_name` with `raw_arguments` (the model's tool-call
/// arguments, JSON-encoded) against `profile`.
pub async fn execute(
    tool_name: &str,
    raw_arguments: &str,
    profile: &ToolProfile,
) -> Result<String, ExecError> {
    match tool_name {
        "bash" => {
            let command: String = decode_argument(raw_arguments, "command")?;
            if !profile.allows_command(&command) {
                return Err(ExecError::NotPermitted(format!("Bash({command})")));
            }
            run_bash(&command).await
        }
        "read_file" => {
            let path: String = decode_argument(raw_arguments, "path")?;
            if !profile.has("Read") {
                return Err(ExecError::NotPermitted("Read".into()));
            }
            Ok(std::fs::read_to_string(&path)?)
        }
        "glob" => {
            let pattern: String = decode_argument(raw_arguments, "pattern")?;
            if !profile.has("Glob") {
                return Err(ExecError::NotPermitted("Glob".into()));
            }
            run_glob(&pattern)
        }
        "grep" => {
            if !profile.has("Grep") {
                return Err(ExecError::NotPermitted("Grep".into()));
            }
            run_grep(raw_arguments).await
        }
        "write_file" => {
            if !profile.has("Write") {
                return Err(ExecError::NotPermitted("Write".into()));
            }
            run_write(raw_arguments)
        }
        "edit_file" => {
            if !profile.has("Edit") {
                return Err(ExecError::NotPermitted("Edit".into()));
            }
            run_edit(raw_arguments)
        }
        other => Err(ExecError::UnknownTool(other.to_string())),
    }
}

/// Decode one string argument, tolerating small-model double-encoding
/// (spec.md §4.6): try structured `{key: "..."}` first, then plain string,
/// then a string that itself parses as `{key: "..."}`.
fn decode_argument(raw: &str, key: &str) -> Result<String, ExecError> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) {
        if let Some(Value::String(s)) = map.get(key) {
            return Ok(s.clone());
        }
    }
    if let Ok(Value::String(s)) = serde_json::from_str::<Value>(raw) {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&s) {
            if let Some(Value::String(inner)) = map.get(key) {
                return Ok(inner.clone());
            }
        }
        return Ok(s);
    }
    Err(ExecError::InvalidArguments(format!(
        "could not extract `{key}` from {raw}"
    )))
}

fn decode_object(raw: &str) -> Result<serde_json::Map<String, Value>, ExecError> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) {
        return Ok(map);
    }
    if let Ok(Value::String(s)) = serde_json::from_str::<Value>(raw) {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&s) {
            return Ok(map);
        }
    }
    Err(ExecError::InvalidArguments(format!(
        "could not decode arguments object from {raw}"
    )))
}

async fn run_bash(command: &str) -> Result<String, ExecError> {
    let mut cmd = Command::new("bash");
    cmd.arg("-c").arg(command);

    let output = match tokio::time::timeout(BASH_TIMEOUT, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return Err(ExecError::Io(e)),
        Err(_) => return Err(ExecError::Timeout(BASH_TIMEOUT.as_secs())),
    };

    let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
    if !output.stderr.is_empty() {
        combined.push_str("\n--- stderr ---\n");
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
    }
    combined.push_str(&format!("\n--- exit code: {} ---", output.status.code().unwrap_or(-1)));
    Ok(truncate_bytes(&combined, OUTPUT_TRUNCATE_BYTES))
}

fn run_glob(pattern: &str) -> Result<String, ExecError> {
    let matches: Vec<String> = glob::glob(pattern)
        .map_err(|e| ExecError::InvalidArguments(e.to_string()))?
        .filter_map(|entry| entry.ok())
        .map(|p| p.display().to_string())
        .collect();
    if matches.is_empty() {
        Ok("No matches found".to_string())
    } else {
        Ok(matches.join("\n"))
    }
}

async fn run_grep(raw_arguments: &str) -> Result<String, ExecError> {
    let map = decode_object(raw_arguments)?;
    let pattern = map
        .get("pattern")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExecError::InvalidArguments("missing `pattern`".into()))?;
    let path = map.get("path").and_then(|v| v.as_str()).unwrap_or(".");

    let mut cmd = Command::new("grep");
    cmd.arg("-rn");
    for dir in VCS_AND_VENDOR_DIRS {
        cmd.arg(format!("--exclude-dir={dir}"));
    }
    cmd.arg(pattern).arg(path);

    let output = match tokio::time::timeout(GREP_TIMEOUT, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return Err(ExecError::Io(e)),
        Err(_) => return Err(ExecError::Timeout(GREP_TIMEOUT.as_secs())),
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    if stdout.is_empty() {
        Ok("No matches found".to_string())
    } else {
        Ok(truncate_bytes(&stdout, OUTPUT_TRUNCATE_BYTES))
    }
}

fn run_write(raw_arguments: &str) -> Result<String, ExecError> {
    let map = decode_object(raw_arguments)?;
    let path = map
        .get("path")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExecError::InvalidArguments("missing `path`".into()))?;
    let content = map
        .get("content")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExecError::InvalidArguments("missing `content`".into()))?;

    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(format!("wrote {} bytes to {path}", content.len()))
}

fn run_edit(raw_arguments: &str) -> Result<String, ExecError> {
    let map = decode_object(raw_arguments)?;
    let path = map
        .get("path")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExecError::InvalidArguments("missing `path`".into()))?;
    let old_string = map
        .get("old_string")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExecError::InvalidArguments("missing `old_string`".into()))?;
    let new_string = map
        .get("new_string")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExecError::InvalidArguments("missing `new_string`".into()))?;

    let contents = std::fs::read_to_string(path)?;
    let occurrences = contents.matches(old_string).count();
    if occurrences != 1 {
        return Err(ExecError::NotUnique(occurrences));
    }
    let replaced = contents.replacen(old_string, new_string, 1);
    std::fs::write(path, replaced)?;
    Ok(format!("replaced 1 occurrence in {path}"))
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

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
