// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool-definitions payload for the model's `tools` parameter, plus the
//! double-encoding-tolerant command extraction the safety filter needs
//! (the executor does its own, separate, decoding for execution — see
//! `crate::executor::decode_argument`).

use serde_json::{json, Value};

/// The `tools` array sent on every chat-completion call, one entry per
/// operation in spec.md §4.6's table.
pub fn tool_definitions() -> Value {
    json!([
        {
            "type": "function",
            "function": {
                "name": "bash",
                "description": "Run a shell command.",
                "parameters": {
                    "type": "object",
                    "properties": { "command": { "type": "string" } },
                    "required": ["command"]
                }
            }
        },
        {
            "type": "function",
            "function": {
                "name": "read_file",
                "description": "Read a file's contents.",
                "parameters": {
                    "type": "object",
                    "properties": { "path": { "type": "string" } },
                    "required": ["path"]
                }
            }
        },
        {
            "type": "function",
            "function": {
                "name": "glob",
                "description": "List files matching a glob pattern.",
                "parameters": {
                    "type": "object",
                    "properties": { "pattern": { "type": "string" } },
                    "required": ["pattern"]
                }
            }
        },
        {
            "type": "function",
            "function": {
                "name": "grep",
                "description": "Recursively search file contents for a pattern.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "pattern": { "type": "string" },
                        "path": { "type": "string" }
                    },
                    "required": ["pattern"]
                }
            }
        },
        {
            "type": "function",
            "function": {
                "name": "write_file",
                "description": "Write content to a file, creating parent directories.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "path": { "type": "string" },
                        "content": { "type": "string" }
                    },
                    "required": ["path", "content"]
                }
            }
        },
        {
            "type": "function",
            "function": {
                "name": "edit_file",
                "description": "Replace a unique occurrence of old_string with new_string in a file.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "path": { "type": "string" },
                        "old_string": { "type": "string" },
                        "new_string": { "type": "string" }
                    },
                    "required": ["path", "old_string", "new_string"]
                }
            }
        }
    ])
}

/// Extract the `command` argument from a `bash` tool call, tolerating the
/// same three encodings the executor tolerates (`{command: "..."}`,
/// `"..."`, `"{command: \"...\"}"`). Returns `None` rather than erroring —
/// the safety filter treats an unparseable call as non-`bash`-shaped and
/// leaves blocking decisions to the executor's allow-list.
pub fn extract_command(raw_arguments: &str) -> Option<String> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw_arguments) {
        if let Some(Value::String(s)) = map.get("command") {
            return Some(s.clone());
        }
    }
    if let Ok(Value::String(s)) = serde_json::from_str::<Value>(raw_arguments) {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&s) {
            if let Some(Value::String(inner)) = map.get("command") {
                return Some(inner.clone());
            }
        }
        return Some(s);
    }
    None
}

#[cfg(test)]
#[path = "tools_tests.rs"]
mod tests;
