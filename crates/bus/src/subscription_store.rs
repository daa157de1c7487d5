// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CRUD over `subs.jsonl`: `subscribe add|list|remove|enable|disable`.

use crate::error::BusError;
use crate::table;
use mcab_core::Subscription;
use std::path::Path;

pub fn list(path: &Path) -> Result<Vec<Subscription>, BusError> {
    table::read_all(path)
}

pub fn add(path: &Path, sub: Subscription) -> Result<(), BusError> {
    table::append_one(path, &sub)
}

pub fn remove(path: &Path, id: &str) -> Result<bool, BusError> {
    let mut all = list(path)?;
    let before = all.len();
    all.retain(|s| s.id != id);
    let removed = all.len() != before;
    if removed {
        table::write_all(path, &all)?;
    }
    Ok(removed)
}

pub fn set_enabled(path: &Path, id: &str, enabled: bool) -> Result<bool, BusError> {
    let mut all = list(path)?;
    let mut found = false;
    for s in all.iter_mut() {
        if s.id == id {
            s.enabled = enabled;
            found = true;
        }
    }
    if found {
        table::write_all(path, &all)?;
    }
    Ok(found)
}

/// All enabled subscriptions matching `(event, outcome)`, for fan-out.
pub fn matching(path: &Path, event: &str, outcome: &str) -> Result<Vec<Subscription>, BusError> {
    Ok(list(path)?
        .into_iter()
        .filter(|s| s.matches(event, outcome))
        .collect())
}

#[cfg(test)]
#[path = "subscription_store_tests.rs"]
mod tests;
