// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `muxcode-agent-bus memory read|write|write-shared|context|search|list`.
//!
//! A thin pass-through to `memory/{shared,<role>}.md` — no database, no
//! embeddings, no ranking (memory is an opaque external collaborator,
//! spec.md §1; this is the "do something real" CLI surface for it).

use crate::support;

#[derive(clap::Args)]
pub struct Args {
    #[command(subcommand)]
    pub action: Action,
}

#[derive(clap::Subcommand)]
pub enum Action {
    Read { role: String },
    Write { role: String, text: String },
    WriteShared { text: String },
    Context { role: String },
    Search { query: String },
    List,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let bus = support::bus();
    let paths = bus.paths();

    match args.action {
        Action::Read { role } => {
            println!("{}", std::fs::read_to_string(paths.memory(&role)).unwrap_or_default());
        }
        Action::Write { role, text } => {
            append_entry(&paths.memory(&role), &text)?;
        }
        Action::WriteShared { text } => {
            append_entry(&paths.memory_shared(), &text)?;
        }
        Action::Context { role } => {
            let shared = std::fs::read_to_string(paths.memory_shared()).unwrap_or_default();
            let own = std::fs::read_to_string(paths.memory(&role)).unwrap_or_default();
            println!("{shared}{own}");
        }
        Action::Search { query } => {
            let needle = query.to_lowercase();
            let dir = paths.memory_dir();
            let Ok(entries) = std::fs::read_dir(&dir) else {
                return Ok(());
            };
            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                if path.extension().and_then(|s| s.to_str()) != Some("md") {
                    continue;
                }
                let Ok(content) = std::fs::read_to_string(&path) else {
                    continue;
                };
                for (lineno, line) in content.lines().enumerate() {
                    if line.to_lowercase().contains(&needle) {
                        println!("{}:{}: {}", path.display(), lineno + 1, line);
                    }
                }
            }
        }
        Action::List => {
            let dir = paths.memory_dir();
            let Ok(entries) = std::fs::read_dir(&dir) else {
                return Ok(());
            };
            let mut files: Vec<(String, u64)> = entries
                .filter_map(|e| e.ok())
                .filter_map(|e| {
                    let meta = e.metadata().ok()?;
                    Some((e.file_name().to_string_lossy().into_owned(), meta.len()))
                })
                .collect();
            files.sort();
            for (name, size) in files {
                println!("{name}\t{size}");
            }
        }
    }
    Ok(())
}

/// Append `text` as a new `\n---\n`-delimited entry.
fn append_entry(path: &std::path::Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let exists = path.exists() && std::fs::metadata(path)?.len() > 0;
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
    use std::io::Write;
    if exists {
        write!(file, "\n---\n")?;
    }
    write!(file, "{text}")?;
    Ok(())
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
