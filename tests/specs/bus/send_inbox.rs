//! Testable property 1 (at-most-once delivery), property 2 (ordering
//! within a sender), and scenario 1 (simple request/response) from
//! spec.md §8.

use crate::prelude::*;

#[test]
fn send_then_inbox_delivers_and_consumes_exactly_once() {
    let bus = Bus::new();
    bus.as_role("edit").args(&["send", "build", "compile", "build now"]).passes();

    let first = bus.as_role("build").args(&["inbox"]).passes();
    first.stdout_has("edit -> build request compile: build now");

    // Second receive sees nothing: the message was consumed, not peeked.
    let second = bus.as_role("build").args(&["inbox"]).passes();
    assert_eq!(second.stdout(), "");
}

#[test]
fn peek_does_not_consume() {
    let bus = Bus::new();
    bus.as_role("edit").args(&["send", "build", "compile", "build now"]).passes();

    bus.as_role("build").args(&["inbox", "--peek"]).passes().stdout_has("compile");
    // Still there after a peek.
    bus.as_role("build").args(&["inbox", "--peek"]).passes().stdout_has("compile");
    // A real receive now drains it.
    bus.as_role("build").args(&["inbox"]).passes().stdout_has("compile");
    let empty = bus.as_role("build").args(&["inbox"]).passes();
    assert_eq!(empty.stdout(), "");
}

#[test]
fn messages_from_one_sender_arrive_in_send_order() {
    let bus = Bus::new();
    for i in 0..5 {
        bus.as_role("edit")
            .args(&["send", "build", "step", &format!("message {i}"), "--no-notify"])
            .passes();
    }
    let out = bus.as_role("build").args(&["inbox", "--raw"]).passes();
    let lines: Vec<&str> = out.stdout().lines().collect();
    assert_eq!(lines.len(), 5);
    for (i, line) in lines.iter().enumerate() {
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(parsed["payload"], format!("message {i}"));
    }
}

#[test]
fn send_reads_payload_from_stdin() {
    let bus = Bus::new();
    bus.as_role("edit")
        .args(&["send", "build", "compile", "--stdin", "--no-notify"])
        .stdin("piped payload")
        .passes();
    bus.as_role("build").args(&["inbox"]).passes().stdout_has("piped payload");
}

#[test]
fn malformed_inbox_line_is_skipped_not_fatal() {
    let bus = Bus::new();
    bus.as_role("edit").args(&["send", "build", "compile", "ok one"]).passes();
    // Corrupt the inbox with a second, unparsable line.
    let mut content = bus.read("inbox/build.jsonl");
    content.push_str("{not json\n");
    bus.file("inbox/build.jsonl", &content);

    bus.as_role("build").args(&["inbox"]).passes().stdout_has("ok one").stderr_has("skipped 1 malformed");
}

#[test]
fn reply_to_links_back_to_the_original_message_id() {
    let bus = Bus::new();
    let sent = bus.as_role("edit").args(&["send", "build", "compile", "go", "--no-notify"]).passes();
    let id = sent.stdout().trim().to_string();

    bus.as_role("build")
        .args(&["send", "edit", "compile", "done", "--type", "response", "--reply-to", &id, "--no-notify"])
        .passes();

    let out = bus.as_role("edit").args(&["inbox", "--raw"]).passes();
    let parsed: serde_json::Value = serde_json::from_str(out.stdout().trim()).unwrap();
    assert_eq!(parsed["reply_to"], id);
    assert_eq!(parsed["type"], "response");
}
