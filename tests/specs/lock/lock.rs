//! `lock|unlock|is-locked` — the advisory per-role busy marker (spec.md §4.1).

use crate::prelude::*;

#[test]
fn lock_then_is_locked_then_unlock() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();

    bus.anon().args(&["is-locked", "build"]).fails_with_code(1).stdout_has("unlocked");

    bus.anon().args(&["lock", "build"]).passes();
    bus.anon().args(&["is-locked", "build"]).passes().stdout_has("locked");

    bus.anon().args(&["unlock", "build"]).passes();
    bus.anon().args(&["is-locked", "build"]).fails_with_code(1).stdout_has("unlocked");
}

#[test]
fn unlocking_an_already_unlocked_role_is_not_an_error() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.anon().args(&["unlock", "build"]).passes();
    bus.anon().args(&["unlock", "build"]).passes();
}

#[test]
fn role_resolves_from_agent_role_env_when_omitted() {
    let bus = Bus::new();
    bus.anon().args(&["init"]).passes();
    bus.as_role("build").args(&["lock"]).passes();
    bus.anon().args(&["is-locked", "build"]).passes().stdout_has("locked");
}
