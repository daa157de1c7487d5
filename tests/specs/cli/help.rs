//! Top-level `--help`/`--version` surface.

use crate::prelude::*;

#[test]
fn top_level_help_lists_every_subcommand() {
    let bus = Bus::new();
    let out = bus.anon().args(&["--help"]).passes();
    for sub in [
        "init", "send", "inbox", "lock", "unlock", "is-locked", "notify", "chain", "subscribe", "cron", "proc", "spawn", "memory", "guard", "watch", "cleanup",
    ] {
        out.stdout_has(sub);
    }
}

#[test]
fn version_flag_prints_a_version() {
    let bus = Bus::new();
    bus.anon().args(&["--version"]).passes().stdout_has("muxcode-agent-bus");
}

#[test]
fn unknown_subcommand_fails() {
    let bus = Bus::new();
    bus.anon().args(&["frobnicate"]).fails();
}
