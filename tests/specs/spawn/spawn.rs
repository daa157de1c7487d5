//! Short-lived spawned-agent tracking (spec.md §3 Spawn entry, §6 `spawn`).

use crate::prelude::*;

#[test]
fn start_list_status_result_round_trip() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();

    let id = bus
        .as_role("edit")
        .args(&["spawn", "start", "review", "review-1", "win-3", "look at the diff"])
        .passes()
        .stdout()
        .trim()
        .to_string();
    assert!(id.starts_with("spawn-"));

    bus.anon()
        .args(&["spawn", "list"])
        .passes()
        .stdout_has(&id)
        .stdout_has("review")
        .stdout_has("edit");

    bus.anon()
        .args(&["spawn", "status", &id])
        .passes()
        .stdout_has(&format!("\"id\": \"{id}\""))
        .stdout_has("\"spawn_role\": \"review-1\"");

    // No result yet: the spawn hasn't completed.
    bus.anon().args(&["spawn", "result", &id]).passes().stdout_lacks("error");
}

#[test]
fn a_role_cannot_own_two_concurrent_spawns() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.as_role("edit")
        .args(&["spawn", "start", "review", "review-1", "win-1", "task one"])
        .passes();

    bus.as_role("edit")
        .args(&["spawn", "start", "review", "review-2", "win-2", "task two"])
        .fails()
        .stderr_has("already owns");
}

#[test]
fn stop_marks_the_spawn_completed() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    let id = bus
        .as_role("edit")
        .args(&["spawn", "start", "review", "review-1", "win-9", "task"])
        .passes()
        .stdout()
        .trim()
        .to_string();

    bus.anon().args(&["spawn", "stop", &id]).passes();
    bus.anon().args(&["spawn", "status", &id]).passes().stdout_has("\"status\"");
}

#[test]
fn status_of_unknown_id_fails() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.anon().args(&["spawn", "status", "spawn-ghost"]).fails();
}
