//! `guard` — ad hoc loop detection (spec.md §4.3 step 6, §8 scenario 5-ish).

use crate::prelude::*;

#[test]
fn no_activity_means_no_alerts_and_exit_0() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    let out = bus.anon().args(&["guard"]).passes();
    assert_eq!(out.stdout(), "");
}

#[test]
fn repeated_sends_trip_the_message_loop_detector() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    // Default msg_threshold is 4 identical (from,to,action) triples within
    // the detection window.
    for _ in 0..5 {
        bus.as_role("build")
            .args(&["send", "edit", "status", "still building", "--no-notify"])
            .passes();
    }
    bus.anon().args(&["guard"]).fails_with_code(1);
}

#[test]
fn json_output_is_an_array() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    for _ in 0..5 {
        bus.as_role("build")
            .args(&["send", "edit", "status", "still building", "--no-notify"])
            .passes();
    }
    let out = bus.anon().args(&["guard", "--json"]).fails_with_code(1);
    let parsed: serde_json::Value = serde_json::from_str(&out.stdout()).unwrap();
    assert!(parsed.is_array());
    assert!(!parsed.as_array().unwrap().is_empty());
}

#[test]
fn scoping_to_a_single_role_only_checks_that_roles_command_history() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    let out = bus.anon().args(&["guard", "build"]).passes();
    assert_eq!(out.stdout(), "");
}
