// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loads `chain.toml` into a [`ChainTable`]. Profile and supervisor config
//! types live closer to their consumers (`mcab-harness::profile`,
//! `mcab-engine::config`) since the bus crate only needs to resolve their
//! paths, not parse their contents.

use crate::error::BusError;
use mcab_core::ChainTable;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// On-disk shape of `chain.toml`: a table of rules keyed by `"event/outcome"`.
///
/// ```toml
/// [rules."build/failure"]
/// type = "event"
/// action = "investigate"
/// send_to = "analyst"
/// message = "build failed: ${exit_code}"
/// notify_analyst = true
/// ```
#[derive(Debug, Deserialize)]
struct ChainFile {
    #[serde(default)]
    rules: HashMap<String, mcab_core::ChainRule>,
}

/// Load `chain.toml` at `path`, or an empty table if the file is absent
/// (spec.md §7: "no chain configured" is a valid, non-error state).
pub fn load_chain_table(path: &Path) -> Result<ChainTable, BusError> {
    let mut table = ChainTable::new();
    if !path.exists() {
        return Ok(table);
    }
    let raw = std::fs::read_to_string(path)?;
    let file: ChainFile = toml::from_str(&raw)?;
    for (key, rule) in file.rules {
        let (event, outcome) = key.split_once('/').unwrap_or((key.as_str(), "*"));
        table.insert(event, outcome, rule);
    }
    Ok(table)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
