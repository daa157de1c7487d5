//! Error-path exit codes and messages.

use crate::prelude::*;

#[test]
fn send_without_role_or_agent_role_env_fails() {
    let bus = Bus::new();
    bus.anon().args(&["send", "build", "compile", "go"]).fails().stderr_has("AGENT_ROLE");
}

#[test]
fn inbox_without_role_fails() {
    let bus = Bus::new();
    bus.anon().args(&["inbox"]).fails().stderr_has("AGENT_ROLE");
}

#[test]
fn cron_add_with_bad_schedule_fails() {
    let bus = Bus::new();
    bus.anon()
        .args(&["cron", "add", "@fortnightly", "build", "run", "hi"])
        .fails();
}

#[test]
fn proc_status_unknown_id_fails() {
    let bus = Bus::new();
    bus.anon().args(&["proc", "status", "proc-does-not-exist"]).fails();
}

#[test]
fn subscribe_remove_unknown_id_fails() {
    let bus = Bus::new();
    bus.anon().args(&["subscribe", "remove", "sub-does-not-exist"]).fails();
}
