use super::*;
use mcab_bus::BusPaths;
use mcab_core::{ChainRule, SequentialIdGen, Subscription};

fn bus_at(dir: &std::path::Path) -> Bus {
    Bus::new(BusPaths::at(dir.to_path_buf()))
}

#[test]
fn no_rule_and_no_subscription_is_a_plain_miss() {
    let dir = tempfile::tempdir().unwrap();
    let bus = bus_at(dir.path());
    let table = ChainTable::new();
    let id_gen = SequentialIdGen::new("t");

    let outcome = resolve_and_fire(&bus, &table, &id_gen, 100, "build", "success", None, "make").unwrap();
    assert!(!outcome.rule_matched);
    assert!(outcome.primary.is_none());
    assert!(outcome.fanout.is_empty());
}

#[test]
fn matched_rule_sends_primary_and_analyst_cc() {
    let dir = tempfile::tempdir().unwrap();
    let bus = bus_at(dir.path());
    let mut table = ChainTable::new();
    table.insert(
        "build",
        "success",
        ChainRule {
            kind: MessageType::Request,
            action: "run".to_string(),
            send_to: "test".to_string(),
            message: "build ${outcome}, run ${command}".to_string(),
            notify_analyst: true,
        },
    );
    let id_gen = SequentialIdGen::new("t");

    let outcome = resolve_and_fire(&bus, &table, &id_gen, 100, "build", "success", Some(0), "make").unwrap();
    assert!(outcome.rule_matched);
    assert_eq!(outcome.primary.as_ref().unwrap().target, "test");
    assert!(outcome.analyst_cc.is_some());

    let test_inbox = bus.peek("test").unwrap();
    assert_eq!(test_inbox.messages.len(), 1);
    assert_eq!(test_inbox.messages[0].payload, "build success, run make");

    let analyze_inbox = bus.peek("analyze").unwrap();
    assert_eq!(analyze_inbox.messages.len(), 1);
}

#[test]
fn notify_analyst_is_skipped_when_target_already_analyze() {
    let dir = tempfile::tempdir().unwrap();
    let bus = bus_at(dir.path());
    let mut table = ChainTable::new();
    table.insert(
        "build",
        "failure",
        ChainRule {
            kind: MessageType::Event,
            action: "investigate".to_string(),
            send_to: "analyze".to_string(),
            message: "build failed".to_string(),
            notify_analyst: true,
        },
    );
    let id_gen = SequentialIdGen::new("t");

    let outcome = resolve_and_fire(&bus, &table, &id_gen, 100, "build", "failure", Some(1), "make").unwrap();
    assert!(outcome.analyst_cc.is_none());
    assert_eq!(bus.peek("analyze").unwrap().messages.len(), 1);
}

#[test]
fn subscription_fanout_runs_even_without_a_matching_chain_rule() {
    let dir = tempfile::tempdir().unwrap();
    let bus = bus_at(dir.path());
    mcab_bus::subscription_store::add(
        &bus.paths().subscriptions(),
        Subscription {
            id: "sub1".to_string(),
            event: "*".to_string(),
            outcome: "failure".to_string(),
            notify: String::new(),
            target: "oncall".to_string(),
            message: "${event} failed: ${command}".to_string(),
            enabled: true,
        },
    )
    .unwrap();
    let table = ChainTable::new();
    let id_gen = SequentialIdGen::new("t");

    let outcome = resolve_and_fire(&bus, &table, &id_gen, 100, "deploy", "failure", Some(1), "ship").unwrap();
    assert!(!outcome.rule_matched);
    assert_eq!(outcome.fanout.len(), 1);
    let oncall_inbox = bus.peek("oncall").unwrap();
    assert_eq!(oncall_inbox.messages[0].payload, "deploy failed: ship");
}

#[test]
fn disabled_subscription_does_not_fire() {
    let dir = tempfile::tempdir().unwrap();
    let bus = bus_at(dir.path());
    mcab_bus::subscription_store::add(
        &bus.paths().subscriptions(),
        Subscription {
            id: "sub1".to_string(),
            event: "*".to_string(),
            outcome: "*".to_string(),
            notify: String::new(),
            target: "oncall".to_string(),
            message: "noop".to_string(),
            enabled: false,
        },
    )
    .unwrap();
    let table = ChainTable::new();
    let id_gen = SequentialIdGen::new("t");

    let outcome = resolve_and_fire(&bus, &table, &id_gen, 100, "deploy", "failure", None, "ship").unwrap();
    assert!(outcome.fanout.is_empty());
}
