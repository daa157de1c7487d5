//! `init` (directory layout bootstrap) and `cleanup` (session teardown).

use crate::prelude::*;

#[test]
fn init_creates_the_expected_skeleton_and_prints_the_root() {
    let bus = Bus::new();
    let out = bus.anon().args(&["init"]).passes();
    let root = out.stdout().trim().to_string();
    assert!(std::path::Path::new(&root).join("inbox").is_dir());
    assert!(std::path::Path::new(&root).join("lock").is_dir());
    assert!(std::path::Path::new(&root).join("agents").is_dir());
    assert!(std::path::Path::new(&root).join("memory").is_dir());
}

#[test]
fn init_is_idempotent() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.anon().args(&["init"]).passes();
}

#[test]
fn cleanup_removes_the_whole_bus_directory() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.as_role("edit").args(&["send", "build", "compile", "go", "--no-notify"]).passes();
    assert!(bus.path().join("inbox/build.jsonl").exists());

    bus.anon().args(&["cleanup"]).passes();
    assert!(!bus.path().exists());
}

#[test]
fn cleanup_of_a_never_initialized_session_is_not_an_error() {
    let bus = Bus::new();
    std::fs::remove_dir(bus.path()).ok();
    bus.anon().args(&["cleanup"]).passes();
}
