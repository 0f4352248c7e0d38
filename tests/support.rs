//! Shared black-box test harness for the `dsync` CLI: a fresh XDG sandbox
//! per test plus a small fluent wrapper over `assert_cmd::Command` so specs
//! read like prose instead of repeating `.assert()` chains everywhere.

use std::path::PathBuf;

use assert_cmd::Command;

/// An isolated `$XDG_STATE_HOME` / `$XDG_CONFIG_HOME` sandbox. Every test
/// gets its own, so daemon/CLI runs never see each other's `state.db`.
pub struct Project {
    _dir: tempfile::TempDir,
    state_home: PathBuf,
    config_home: PathBuf,
}

impl Project {
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let state_home = dir.path().join("state");
        let config_home = dir.path().join("config");
        std::fs::create_dir_all(&state_home).expect("create state home");
        std::fs::create_dir_all(&config_home).expect("create config home");
        Self { _dir: dir, state_home, config_home }
    }

    /// Write `relative` under the sandbox's config home (e.g. `config.toml`).
    pub fn config_file(&self, relative: &str, contents: &str) -> &Self {
        let path = self.config_home.join("drive-sync").join(relative);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create config dir");
        std::fs::write(path, contents).expect("write config file");
        self
    }

    pub fn state_db_path(&self) -> PathBuf {
        self.state_home.join("drive-sync").join("state.db")
    }

    pub fn cli(&self) -> Run {
        self.bin("dsync")
    }

    /// Build a `Run` for an arbitrary workspace binary (`dsync` or
    /// `dsyncd`) wired to this sandbox's XDG directories.
    pub fn bin(&self, name: &str) -> Run {
        let mut cmd = Command::cargo_bin(name).unwrap_or_else(|e| panic!("{name} binary: {e}"));
        cmd.env("XDG_STATE_HOME", &self.state_home);
        cmd.env("XDG_CONFIG_HOME", &self.config_home);
        Run { cmd }
    }
}

/// A single `dsync` invocation under construction.
pub struct Run {
    cmd: Command,
}

impl Run {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    /// Assert the process exits 0, returning the captured output for
    /// further `stdout_has` checks.
    pub fn passes(self) -> Output {
        let assert = self.cmd.assert().success();
        Output { output: assert.get_output().clone() }
    }

    /// Assert the process exits non-zero.
    pub fn fails(self) -> Output {
        let assert = self.cmd.assert().failure();
        Output { output: assert.get_output().clone() }
    }
}

pub struct Output {
    output: std::process::Output,
}

impl Output {
    pub fn stdout_has(self, needle: &str) -> Self {
        let stdout = String::from_utf8_lossy(&self.output.stdout);
        assert!(stdout.contains(needle), "expected stdout to contain {needle:?}, got:\n{stdout}");
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let stderr = String::from_utf8_lossy(&self.output.stderr);
        assert!(stderr.contains(needle), "expected stderr to contain {needle:?}, got:\n{stderr}");
        self
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }
}
