use super::*;
use std::io::Write as _;
use tempfile::NamedTempFile;

#[test]
fn missing_file_yields_empty_table() {
    let table = load_chain_table(Path::new("/nonexistent/chain.toml")).unwrap();
    assert!(table.is_empty());
}

#[test]
fn loads_rules_keyed_by_event_slash_outcome() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[rules."build/failure"]
type = "event"
action = "investigate"
send_to = "analyst"
message = "build failed: ${{exit_code}}"
notify_analyst = true

[rules."*/*"]
type = "event"
action = "noop"
send_to = "lead"
message = "fallback"
"#
    )
    .unwrap();

    let table = load_chain_table(file.path()).unwrap();
    assert_eq!(table.len(), 2);

    let rule = table.resolve("build", "failure").unwrap();
    assert_eq!(rule.send_to, "analyst");
    assert!(rule.notify_analyst);

    let fallback = table.resolve("test", "success").unwrap();
    assert_eq!(fallback.send_to, "lead");
}
