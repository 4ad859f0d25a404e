#![cfg(unix)]
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const FAKE_LAUNCHER: &str = r#"#!/bin/sh
printf '%s\n' "$@" > "$FAKE_LAUNCHER_LOG"
exit "${FAKE_LAUNCHER_EXIT:-0}"
"#;

const ACTION_VARS: &[&str] = &[
    "GITHUB_ACTION_PATH",
    "GITHUB_WORKSPACE",
    "GITHUB_OUTPUT",
    "INPUT_ARGS",
    "INPUT_MODE",
    "INPUT_SRC",
    "INPUT_VERSION",
    "INPUT_VERSION_FILE",
    "CHANGED_FILES",
    "IS_CHANGED_FILES_ENABLED",
    "RUFF_ACTION_LOG",
];

/// A scratch directory holding a fake launcher that records its arguments.
struct Harness {
    dir: tempfile::TempDir,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("launcher.sh"), FAKE_LAUNCHER).unwrap();
        Self { dir }
    }

    fn log_path(&self) -> PathBuf {
        self.dir.path().join("launcher.log")
    }

    fn launcher(&self) -> String {
        format!("sh '{}' run", self.dir.path().join("launcher.sh").display())
    }

    /// The binary with all action variables cleared, run inside the scratch
    /// directory.
    fn bare_command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_ruff-action"));
        for var in ACTION_VARS {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.dir.path());
        cmd
    }

    fn command(&self, subcommand: &str, vars: &[(&str, &str)]) -> Command {
        let mut cmd = self.bare_command();
        cmd.args([subcommand, "--launcher", &self.launcher()])
            .env("GITHUB_ACTION_PATH", self.dir.path())
            .env("FAKE_LAUNCHER_LOG", self.log_path());
        for (key, value) in vars {
            cmd.env(key, value);
        }
        cmd
    }

    fn run(&self, vars: &[(&str, &str)]) -> Output {
        self.command("run", vars).output().unwrap()
    }

    /// Arguments the fake launcher received, or `None` if it never ran.
    fn launched_args(&self) -> Option<Vec<String>> {
        let log = std::fs::read_to_string(self.log_path()).ok()?;
        Some(log.lines().map(str::to_string).collect())
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn format_mode_runs_with_check_flag() {
    let harness = Harness::new();
    let output = harness.run(&[
        ("INPUT_VERSION", "0.5.1"),
        ("INPUT_MODE", "format"),
        ("INPUT_ARGS", ""),
        ("INPUT_SRC", "."),
    ]);
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    let args = harness.launched_args().unwrap();
    assert_eq!(args[1..], ["ruff==0.5.1", "format", "--check", "."]);
}

#[test]
fn check_mode_without_version() {
    let harness = Harness::new();
    let output = harness.run(&[("INPUT_MODE", "check"), ("INPUT_SRC", "src/ tests/")]);
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    let args = harness.launched_args().unwrap();
    assert_eq!(args[1..], ["ruff", "check", "src/", "tests/"]);
}

#[test]
fn child_exit_code_is_mirrored() {
    let harness = Harness::new();
    let output = harness
        .command("run", &[("INPUT_MODE", "check"), ("INPUT_SRC", ".")])
        .env("FAKE_LAUNCHER_EXIT", "3")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn invalid_version_exits_one_without_launching() {
    for version in ["1.2.3.4", "v01.2.3"] {
        let harness = Harness::new();
        let output = harness.run(&[
            ("INPUT_VERSION", version),
            ("INPUT_MODE", "check"),
            ("INPUT_SRC", "."),
        ]);
        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("VERSION does not match expected pattern"));
        assert!(harness.launched_args().is_none());
    }
}

#[test]
fn changed_files_replace_src() {
    let harness = Harness::new();
    let output = harness.run(&[
        ("CHANGED_FILES", "a.py b.py"),
        ("INPUT_SRC", "everything/"),
        ("IS_CHANGED_FILES_ENABLED", "true"),
    ]);
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    let args = harness.launched_args().unwrap();
    assert_eq!(args[1..], ["ruff", "a.py", "b.py"]);
}

#[test]
fn no_changed_files_skips_the_run() {
    let harness = Harness::new();
    let output = harness.run(&[
        ("CHANGED_FILES", ""),
        ("INPUT_SRC", "."),
        ("IS_CHANGED_FILES_ENABLED", "true"),
    ]);
    assert_eq!(output.status.code(), Some(0));
    assert!(harness.launched_args().is_none());
}

#[test]
fn disabled_filter_falls_back_to_src() {
    let harness = Harness::new();
    let output = harness.run(&[
        ("CHANGED_FILES", ""),
        ("INPUT_SRC", "src/"),
        ("IS_CHANGED_FILES_ENABLED", "false"),
    ]);
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    let args = harness.launched_args().unwrap();
    assert_eq!(args[1..], ["ruff", "src/"]);
}

#[test]
fn unbalanced_quotes_are_fatal() {
    let harness = Harness::new();
    let output = harness.run(&[("INPUT_MODE", "check"), ("INPUT_SRC", "'src/")]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("INPUT_SRC"));
    assert!(harness.launched_args().is_none());
}

#[test]
fn non_utf8_changed_files_are_fatal() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let harness = Harness::new();
    let output = harness
        .command(
            "run",
            &[("IS_CHANGED_FILES_ENABLED", "true"), ("INPUT_SRC", ".")],
        )
        .env("CHANGED_FILES", OsStr::from_bytes(b"caf\xe9.py"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("CHANGED_FILES is not valid UTF-8"));
    assert!(harness.launched_args().is_none());
}

#[test]
fn hash_prefixed_changed_file_is_linted() {
    let harness = Harness::new();
    let output = harness.run(&[
        ("CHANGED_FILES", "#a.py"),
        ("INPUT_SRC", "everything/"),
        ("IS_CHANGED_FILES_ENABLED", "true"),
    ]);
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    let args = harness.launched_args().unwrap();
    assert_eq!(args[1..], ["ruff", "#a.py"]);
}

#[test]
fn missing_launcher_is_fatal() {
    let harness = Harness::new();
    let output = harness
        .bare_command()
        .args(["run", "--launcher", "ruff-action-no-such-launcher run"])
        .env("INPUT_MODE", "check")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("ruff-action-no-such-launcher"));
}

#[test]
fn version_file_pins_requirement() {
    let harness = Harness::new();
    std::fs::write(
        harness.path().join("pyproject.toml"),
        "[project]\nname = \"demo\"\ndependencies = [\"ruff==0.6.9\"]\n",
    )
    .unwrap();
    let output = harness.run(&[
        ("INPUT_MODE", "check"),
        ("INPUT_SRC", "."),
        ("INPUT_VERSION_FILE", "pyproject.toml"),
    ]);
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    let args = harness.launched_args().unwrap();
    assert_eq!(args[1], "ruff==0.6.9");
}

#[test]
fn writes_ruff_version_output() {
    let harness = Harness::new();
    let github_output = harness.path().join("github_output");
    let output = harness
        .command(
            "run",
            &[
                ("INPUT_VERSION", "0.5.1"),
                ("INPUT_MODE", "check"),
                ("INPUT_SRC", "."),
            ],
        )
        .env("GITHUB_OUTPUT", &github_output)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert_eq!(
        std::fs::read_to_string(github_output).unwrap(),
        "ruff-version=0.5.1\n"
    );
}

#[test]
fn plan_prints_command_without_running() {
    let harness = Harness::new();
    let output = harness
        .bare_command()
        .arg("plan")
        .env("INPUT_VERSION", "0.5.1")
        .env("INPUT_MODE", "format")
        .env("INPUT_SRC", ".")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "pipx run ruff==0.5.1 format --check .\n"
    );
}

#[test]
fn plan_reports_skip() {
    let harness = Harness::new();
    let output = harness
        .command("plan", &[("IS_CHANGED_FILES_ENABLED", "true")])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("skip"));
    assert!(harness.launched_args().is_none());
}

#[test]
fn version_command_prints_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_ruff-action"))
        .arg("version")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!("ruff-action {}\n", env!("CARGO_PKG_VERSION"))
    );
}
