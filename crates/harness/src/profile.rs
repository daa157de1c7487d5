// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A role's tool profile: the allow-list of tools and `Bash(<pattern>)`
//! globs it may use, loaded once from `profiles.toml`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One role's allow-list: a flat set of capability strings. `Bash(<pat>)`
/// entries additionally constrain which commands are permitted; any other
/// entry (`Read`, `Glob`, `Grep`, `Write`, `Edit`) is a plain capability
/// grant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolProfile {
    #[serde(default)]
    pub allow: Vec<String>,
}

impl ToolProfile {
    pub fn has(&self, capability: &str) -> bool {
        self.allow.iter().any(|a| a == capability)
    }

    /// All `Bash(<pattern>)` globs granted to this profile.
    pub fn bash_patterns(&self) -> Vec<&str> {
        self.allow
            .iter()
            .filter_map(|a| a.strip_prefix("Bash(").and_then(|s| s.strip_suffix(')')))
            .collect()
    }

    /// Whether `command` matches any granted `Bash(<pattern>)` glob.
    /// Pattern grammar: `*` (zero or more chars), `?` (one char), no brace
    /// expansion, matched against the exact command string.
    pub fn allows_command(&self, command: &str) -> bool {
        self.bash_patterns()
            .iter()
            .any(|pattern| glob_match(pattern, command))
    }
}

/// A minimal glob matcher over `*`/`?` only, since `glob::Pattern` matches
/// filesystem paths (treats `/` specially) and command strings are not
/// paths.
fn glob_match(pattern: &str, text: &str) -> bool {
    fn inner(p: &[char], t: &[char]) -> bool {
        match p.first() {
            None => t.is_empty(),
            Some('*') => inner(&p[1..], t) || (!t.is_empty() && inner(p, &t[1..])),
            Some('?') => !t.is_empty() && inner(&p[1..], &t[1..]),
            Some(c) => t.first() == Some(c) && inner(&p[1..], &t[1..]),
        }
    }
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    inner(&p, &t)
}

/// The full `profiles.toml`: one [role] table per entry.
#[derive(Debug, Clone, Default, Deserialize)]
struct ProfilesFile {
    #[serde(flatten)]
    roles: HashMap<String, ToolProfile>,
}

/// Load `profiles.toml`. A missing file yields an empty map (every role
/// gets the empty profile, i.e. no tools permitted).
pub fn load_profiles(path: &Path) -> Result<HashMap<String, ToolProfile>, crate::error::HarnessError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let raw = std::fs::read_to_string(path)?;
    let file: ProfilesFile = toml::from_str(&raw)?;
    Ok(file.roles)
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;
