//! Cron CRUD surface (`cron add|list|remove|enable|disable|history`).
//! Dueness/firing semantics are covered by `mcab-core::cron`'s own unit
//! tests; this exercises the CLI's table rendering and persistence.

use crate::prelude::*;

#[test]
fn add_list_remove_round_trip() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();

    let id = bus
        .anon()
        .args(&["cron", "add", "@hourly", "build", "tick", "time to build"])
        .passes()
        .stdout()
        .trim()
        .to_string();
    assert!(id.starts_with("cron-"));

    bus.anon()
        .args(&["cron", "list"])
        .passes()
        .stdout_has(&id)
        .stdout_has("build")
        .stdout_has("enabled");

    bus.anon().args(&["cron", "remove", &id]).passes();
    bus.anon().args(&["cron", "list"]).passes().stdout_lacks(&id);
}

#[test]
fn disable_then_enable_round_trips_the_flag() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    let id = bus
        .anon()
        .args(&["cron", "add", "@daily", "edit", "nudge", "daily nudge"])
        .passes()
        .stdout()
        .trim()
        .to_string();

    bus.anon().args(&["cron", "disable", &id]).passes();
    bus.anon().args(&["cron", "list"]).passes().stdout_has("disabled");

    bus.anon().args(&["cron", "enable", &id]).passes();
    bus.anon().args(&["cron", "list"]).passes().stdout_has("enabled");
}

#[test]
fn remove_unknown_id_fails() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.anon().args(&["cron", "remove", "cron-nope"]).fails();
}

#[test]
fn every_duration_schedule_is_accepted() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.anon()
        .args(&["cron", "add", "@every 5m", "build", "tick", "go"])
        .passes();
    bus.anon().args(&["cron", "list"]).passes().stdout_has("300s");
}

#[test]
fn history_starts_empty() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    let out = bus.anon().args(&["cron", "history"]).passes();
    assert!(!out.stdout().contains("cron-"));
}
