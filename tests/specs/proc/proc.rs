//! Detached background process tracking (spec.md §3 Proc entry, §6 `proc`).

use crate::prelude::*;

#[test]
fn start_list_status_log_round_trip() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();

    let id = bus
        .as_role("build")
        .args(&["proc", "start", "echo hello-proc"])
        .passes()
        .stdout()
        .trim()
        .to_string();
    assert!(id.starts_with("proc-"));

    bus.anon().args(&["proc", "list"]).passes().stdout_has(&id).stdout_has("build");

    assert!(wait_for(2000, || {
        bus.anon()
            .args(&["proc", "log", &id])
            .passes()
            .stdout()
            .contains("hello-proc")
    }));

    bus.anon()
        .args(&["proc", "status", &id])
        .passes()
        .stdout_has(&format!("\"id\": \"{id}\""));
}

#[test]
fn clean_drops_completed_entries_only() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();

    let id = bus.as_role("build").args(&["proc", "start", "echo done"]).passes().stdout().trim().to_string();

    assert!(wait_for(2000, || {
        bus.anon().args(&["proc", "log", &id]).passes().stdout().contains("done")
    }));

    // `clean` only drops entries already marked completed/failed in
    // proc.jsonl; reaping that status transition is the supervisor's job
    // (spec.md §4.3 step 4), which this CLI-only test never runs, so the
    // entry (still "running" on disk) survives `clean`.
    bus.anon().args(&["proc", "clean"]).passes();
    bus.anon().args(&["proc", "list"]).passes().stdout_has(&id);
}

#[test]
fn status_of_unknown_id_fails() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.anon().args(&["proc", "status", "proc-ghost"]).fails();
}
