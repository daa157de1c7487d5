//! Subscription CRUD and wildcard fan-out via `chain` (spec.md §4.2).

use crate::prelude::*;

#[test]
fn add_list_remove_round_trip() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();

    let id = bus
        .anon()
        .args(&["subscribe", "add", "build", "*", "analyze", "build reported ${outcome}"])
        .passes()
        .stdout()
        .trim()
        .to_string();
    assert!(id.starts_with("sub-"));

    bus.anon()
        .args(&["subscribe", "list"])
        .passes()
        .stdout_has(&id)
        .stdout_has("analyze")
        .stdout_has("enabled");

    bus.anon().args(&["subscribe", "remove", &id]).passes();
    bus.anon().args(&["subscribe", "list"]).passes().stdout_lacks(&id);
}

#[test]
fn disabled_subscription_does_not_fan_out() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.anon()
        .args(&["subscribe", "add", "build", "*", "analyze", "hi", "--disabled"])
        .passes();

    bus.anon().args(&["chain", "build", "success"]).fails_with_code(2);
    assert_eq!(bus.inbox_lines("analyze").len(), 0);
}

#[test]
fn wildcard_event_and_outcome_both_fan_out() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.anon()
        .args(&["subscribe", "add", "*", "*", "analyze", "saw ${event}/${outcome}"])
        .passes();

    bus.anon().args(&["chain", "deploy", "failure"]).fails_with_code(2);
    let inbox = bus.inbox_lines("analyze");
    assert_eq!(inbox.len(), 1);
    assert!(inbox[0].contains("saw deploy/failure"));
}

#[test]
fn enable_disable_round_trips() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    let id = bus
        .anon()
        .args(&["subscribe", "add", "build", "failure", "analyze", "uh oh"])
        .passes()
        .stdout()
        .trim()
        .to_string();

    bus.anon().args(&["subscribe", "disable", &id]).passes();
    bus.anon().args(&["subscribe", "list"]).passes().stdout_has("disabled");
    bus.anon().args(&["subscribe", "enable", &id]).passes();
    bus.anon().args(&["subscribe", "list"]).passes().stdout_has("enabled");
}
