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
fn lock_then_is_locked_then_unlock() {
    let dir = tempdir().unwrap();
    setup(&dir);

    run_lock(LockArgs { role: Some("build".to_string()) }).unwrap();
    run_is_locked(IsLockedArgs { role: Some("build".to_string()) }).unwrap();
    assert!(support::bus().role_is_locked("build"));

    run_unlock(UnlockArgs { role: Some("build".to_string()) }).unwrap();
    run_is_locked(IsLockedArgs { role: Some("build".to_string()) }).unwrap();
    assert!(!support::bus().role_is_locked("build"));

    teardown();
}
