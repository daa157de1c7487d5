//! Test helpers for black-box `muxcode-agent-bus` CLI specifications.
//!
//! Every test gets its own bus directory (`MCAB_BUS_DIR`) so tests can run
//! concurrently without sharing `/tmp/muxcode-agent-bus-bus-*` state.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Resolves the path to the `muxcode-agent-bus` binary under test.
fn bus_binary() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let standard = manifest_dir.join("target/debug/muxcode-agent-bus");
    if standard.exists() {
        return standard;
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join("muxcode-agent-bus");
            if fallback.exists() {
                return fallback;
            }
        }
    }
    standard
}

/// A fresh bus directory plus a CLI builder pinned to it.
pub struct Bus {
    dir: tempfile::TempDir,
}

impl Bus {
    pub fn new() -> Self {
        Self { dir: tempfile::tempdir().expect("tempdir") }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Start building a `muxcode-agent-bus` invocation scoped to this bus
    /// directory, acting as `role` (sets `AGENT_ROLE`).
    pub fn as_role(&self, role: &str) -> CliBuilder {
        cli().env("MCAB_BUS_DIR", self.path()).env("AGENT_ROLE", role)
    }

    /// Same, with no `AGENT_ROLE` set (commands that take an explicit role
    /// positional, or that are expected to fail without one).
    pub fn anon(&self) -> CliBuilder {
        cli().env("MCAB_BUS_DIR", self.path())
    }

    pub fn file(&self, rel: impl AsRef<Path>, content: &str) {
        let full = self.path().join(rel.as_ref());
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }

    pub fn read(&self, rel: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.path().join(rel.as_ref())).unwrap_or_default()
    }

    pub fn inbox_lines(&self, role: &str) -> Vec<String> {
        let content = self.read(format!("inbox/{role}.jsonl"));
        content.lines().map(|s| s.to_string()).collect()
    }
}

pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

pub struct CliBuilder {
    args: Vec<String>,
    envs: Vec<(String, String)>,
    stdin: Option<String>,
}

impl CliBuilder {
    fn new() -> Self {
        Self { args: Vec::new(), envs: Vec::new(), stdin: None }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((key.to_string(), value.as_ref().to_string_lossy().to_string()));
        self
    }

    pub fn stdin(mut self, text: &str) -> Self {
        self.stdin = Some(text.to_string());
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(bus_binary());
        cmd.args(&self.args);
        cmd.env_remove("BUS_SESSION");
        cmd.env_remove("AGENT_ROLE");
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    fn run(self) -> Output {
        use std::io::Write as _;
        let mut cmd = self.command();
        if let Some(input) = &self.stdin {
            cmd.stdin(std::process::Stdio::piped());
            cmd.stdout(std::process::Stdio::piped());
            cmd.stderr(std::process::Stdio::piped());
            let mut child = cmd.spawn().expect("spawn");
            child.stdin.take().unwrap().write_all(input.as_bytes()).unwrap();
            child.wait_with_output().expect("wait")
        } else {
            cmd.output().expect("command should run")
        }
    }

    pub fn passes(self) -> RunAssert {
        let output = self.run();
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    pub fn fails(self) -> RunAssert {
        let output = self.run();
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    pub fn fails_with_code(self, code: i32) -> RunAssert {
        let output = self.run();
        assert_eq!(
            output.status.code(),
            Some(code),
            "expected exit code {code}, got {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(expected), "stdout does not contain '{expected}'\nstdout: {stdout}");
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(!stdout.contains(unexpected), "stdout should not contain '{unexpected}'\nstdout: {stdout}");
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(expected), "stderr does not contain '{expected}'\nstderr: {stderr}");
        self
    }
}

pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(std::time::Duration::from_millis(20));
    }
    false
}
