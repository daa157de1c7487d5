//! `memory read|write|write-shared|context|search|list` (SPEC_FULL.md §4.8).

use crate::prelude::*;

#[test]
fn write_then_read_round_trips() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.anon().args(&["memory", "write", "build", "cargo workspace lives at the repo root"]).passes();
    bus.anon()
        .args(&["memory", "read", "build"])
        .passes()
        .stdout_has("cargo workspace lives at the repo root");
}

#[test]
fn read_of_absent_role_is_empty_not_an_error() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    let out = bus.anon().args(&["memory", "read", "nobody"]).passes();
    assert_eq!(out.stdout(), "\n");
}

#[test]
fn second_write_is_delimited_with_a_separator() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.anon().args(&["memory", "write", "build", "first entry"]).passes();
    bus.anon().args(&["memory", "write", "build", "second entry"]).passes();
    let content = bus.read("memory/build.md");
    assert!(content.contains("first entry\n---\nsecond entry"));
}

#[test]
fn context_concatenates_shared_then_role() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.anon().args(&["memory", "write-shared", "shared fact"]).passes();
    bus.anon().args(&["memory", "write", "build", "build-specific fact"]).passes();

    let out = bus.anon().args(&["memory", "context", "build"]).passes();
    let stdout = out.stdout();
    let shared_at = stdout.find("shared fact").expect("shared fact present");
    let own_at = stdout.find("build-specific fact").expect("own fact present");
    assert!(shared_at < own_at, "shared.md content must come before the role's own file");
}

#[test]
fn search_is_case_insensitive_and_reports_file_and_line() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.anon().args(&["memory", "write", "build", "The Build Uses Cargo"]).passes();

    bus.anon()
        .args(&["memory", "search", "cargo"])
        .passes()
        .stdout_has("build.md:1:");
}

#[test]
fn list_reports_file_sizes() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.anon().args(&["memory", "write", "build", "x"]).passes();
    bus.anon().args(&["memory", "list"]).passes().stdout_has("build.md");
}
