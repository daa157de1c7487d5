//! Testable property 6 and scenarios 2/3 from spec.md §8: chain exit codes
//! and analyst CC fan-out.

use crate::prelude::*;

const CHAIN_TOML: &str = r#"
[rules."build/success"]
type = "request"
action = "run"
send_to = "test"
message = "run tests for ${command}"
notify_analyst = true
"#;

#[test]
fn no_rule_configured_exits_2_and_sends_nothing() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.anon().args(&["chain", "foo", "bar"]).fails_with_code(2);
    assert_eq!(bus.inbox_lines("test").len(), 0);
}

#[test]
fn matched_rule_sends_to_target_and_ccs_analyst() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.file("chain.toml", CHAIN_TOML);

    bus.anon()
        .args(&["chain", "build", "success", "--command", "make"])
        .passes();

    let test_inbox = bus.inbox_lines("test");
    assert_eq!(test_inbox.len(), 1);
    assert!(test_inbox[0].contains("run tests for make"));

    let analyze_inbox = bus.inbox_lines("analyze");
    assert_eq!(analyze_inbox.len(), 1);
}

#[test]
fn dry_run_resolves_without_sending() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.file("chain.toml", CHAIN_TOML);

    bus.anon()
        .args(&["chain", "build", "success", "--dry-run"])
        .passes()
        .stdout_has("rule matched");
    assert_eq!(bus.inbox_lines("test").len(), 0);
}

#[test]
fn dry_run_reports_no_rule() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.anon()
        .args(&["chain", "foo", "bar", "--dry-run"])
        .fails_with_code(2)
        .stdout_has("no rule configured");
}

#[test]
fn wildcard_rule_matches_any_outcome() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.file(
        "chain.toml",
        r#"
[rules."deploy/*"]
type = "event"
action = "log"
send_to = "analyze"
message = "deploy reported ${outcome}"
"#,
    );
    bus.anon().args(&["chain", "deploy", "rollback"]).passes();
    let inbox = bus.inbox_lines("analyze");
    assert_eq!(inbox.len(), 1);
    assert!(inbox[0].contains("deploy reported rollback"));
}
