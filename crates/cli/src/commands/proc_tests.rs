use super::*;
use serial_test::serial;
use tempfile::tempdir;

fn setup(dir: &tempfile::TempDir) {
    std::env::set_var(mcab_bus::paths::BUS_DIR_ENV, dir.path());
    std::env::set_var(mcab_bus::paths::ROLE_ENV, "build");
}

fn teardown() {
    std::env::remove_var(mcab_bus::paths::BUS_DIR_ENV);
    std::env::remove_var(mcab_bus::paths::ROLE_ENV);
}

#[tokio::test]
#[serial]
async fn start_registers_a_running_entry_and_writes_a_log() {
    let dir = tempdir().unwrap();
    setup(&dir);

    run(Args {
        action: Action::Start { command: "echo hi".to_string(), dir: None, owner: None },
    })
    .await
    .unwrap();

    let path = support::bus().paths().proc();
    let entries = mcab_bus::proc_store::list(&path).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].owner, "build");
    assert!(matches!(entries[0].status, ProcStatus::Running));

    teardown();
}

#[tokio::test]
#[serial]
async fn clean_drops_non_running_entries() {
    let dir = tempdir().unwrap();
    setup(&dir);
    let path = support::bus().paths().proc();

    mcab_bus::proc_store::add(
        &path,
        ProcEntry {
            id: "p1".to_string(),
            pid: 1,
            command: "true".to_string(),
            dir: ".".to_string(),
            owner: "build".to_string(),
            log_file: "/dev/null".to_string(),
            status: ProcStatus::Completed,
            exit_code: Some(0),
            notified: true,
            started_ts: 1,
            finished_ts: Some(2),
        },
    )
    .unwrap();
    mcab_bus::proc_store::add(
        &path,
        ProcEntry {
            id: "p2".to_string(),
            pid: 2,
            command: "sleep 1".to_string(),
            dir: ".".to_string(),
            owner: "build".to_string(),
            log_file: "/dev/null".to_string(),
            status: ProcStatus::Running,
            exit_code: None,
            notified: false,
            started_ts: 1,
            finished_ts: None,
        },
    )
    .unwrap();

    run(Args { action: Action::Clean }).await.unwrap();
    let remaining = mcab_bus::proc_store::list(&path).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "p2");

    teardown();
}
