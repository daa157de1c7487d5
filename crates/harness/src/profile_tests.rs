use super::*;
use std::io::Write as _;
use tempfile::NamedTempFile;

fn profile(allow: &[&str]) -> ToolProfile {
    ToolProfile {
        allow: allow.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn has_checks_plain_capabilities() {
    let p = profile(&["Read", "Glob"]);
    assert!(p.has("Read"));
    assert!(!p.has("Write"));
}

#[test]
fn allows_command_matches_star_and_question_mark() {
    let p = profile(&["Bash(cargo *)", "Bash(git statu?)"]);
    assert!(p.allows_command("cargo build"));
    assert!(p.allows_command("cargo test --release"));
    assert!(p.allows_command("git status"));
    assert!(!p.allows_command("git statuss"));
    assert!(!p.allows_command("rm -rf /"));
}

#[test]
fn allows_command_has_no_brace_expansion() {
    let p = profile(&["Bash(cargo {build,test})"]);
    assert!(!p.allows_command("cargo build"));
}

#[test]
fn missing_profiles_file_yields_empty_map() {
    let map = load_profiles(Path::new("/nonexistent/profiles.toml")).unwrap();
    assert!(map.is_empty());
}

#[test]
fn loads_per_role_tables() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[build]
allow = ["Bash(cargo *)", "Read"]

[review]
allow = ["Read", "Grep"]
"#
    )
    .unwrap();

    let map = load_profiles(file.path()).unwrap();
    assert!(map["build"].allows_command("cargo build"));
    assert!(map["review"].has("Grep"));
    assert!(!map["review"].has("Write"));
}
