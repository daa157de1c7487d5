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
fn add_list_remove_round_trip() {
    let dir = tempdir().unwrap();
    setup(&dir);

    run(Args {
        action: Action::Add {
            event: "build".to_string(),
            outcome: "*".to_string(),
            target: "analyze".to_string(),
            message: "${event} happened".to_string(),
            notify: None,
            disabled: false,
        },
    })
    .unwrap();

    let path = support::bus().paths().subscriptions();
    let subs = mcab_bus::subscription_store::list(&path).unwrap();
    assert_eq!(subs.len(), 1);
    let id = subs[0].id.clone();

    run(Args { action: Action::List }).unwrap();

    run(Args { action: Action::Disable { id: id.clone() } }).unwrap();
    assert!(!mcab_bus::subscription_store::list(&path).unwrap()[0].enabled);

    run(Args { action: Action::Enable { id: id.clone() } }).unwrap();
    assert!(mcab_bus::subscription_store::list(&path).unwrap()[0].enabled);

    run(Args { action: Action::Remove { id } }).unwrap();
    assert!(mcab_bus::subscription_store::list(&path).unwrap().is_empty());

    teardown();
}

#[test]
#[serial]
fn remove_unknown_id_errors() {
    let dir = tempdir().unwrap();
    setup(&dir);
    assert!(run(Args { action: Action::Remove { id: "ghost".to_string() } }).is_err());
    teardown();
}
