use super::*;
use serial_test::serial;
use tempfile::tempdir;

fn setup(dir: &tempfile::TempDir) {
    std::env::set_var(mcab_bus::paths::BUS_DIR_ENV, dir.path());
}

fn teardown() {
    std::env::remove_var(mcab_bus::paths::BUS_DIR_ENV);
}

#[test]
#[serial]
fn write_then_read_round_trips() {
    let dir = tempdir().unwrap();
    setup(&dir);

    run(Args { action: Action::Write { role: "build".to_string(), text: "first note".to_string() } }).unwrap();
    let path = support::bus().paths().memory("build");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "first note");

    teardown();
}

#[test]
#[serial]
fn second_write_appends_with_a_separator() {
    let dir = tempdir().unwrap();
    setup(&dir);

    run(Args { action: Action::Write { role: "build".to_string(), text: "first".to_string() } }).unwrap();
    run(Args { action: Action::Write { role: "build".to_string(), text: "second".to_string() } }).unwrap();

    let path = support::bus().paths().memory("build");
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "first\n---\nsecond");

    teardown();
}

#[test]
#[serial]
fn context_concatenates_shared_then_role() {
    let dir = tempdir().unwrap();
    setup(&dir);

    run(Args { action: Action::WriteShared { text: "shared note".to_string() } }).unwrap();
    run(Args { action: Action::Write { role: "build".to_string(), text: "role note".to_string() } }).unwrap();
    run(Args { action: Action::Context { role: "build".to_string() } }).unwrap();

    let shared = std::fs::read_to_string(support::bus().paths().memory_shared()).unwrap();
    let own = std::fs::read_to_string(support::bus().paths().memory("build")).unwrap();
    assert_eq!(shared, "shared note");
    assert_eq!(own, "role note");

    teardown();
}

#[test]
#[serial]
fn list_reports_every_memory_file_with_its_size() {
    let dir = tempdir().unwrap();
    setup(&dir);

    run(Args { action: Action::Write { role: "build".to_string(), text: "hello".to_string() } }).unwrap();
    run(Args { action: Action::List }).unwrap();

    let dir_listing = support::bus().paths().memory_dir();
    assert!(dir_listing.join("build.md").exists());

    teardown();
}
