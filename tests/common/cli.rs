use std::ffi::OsStr;
use std::path::PathBuf;

use assert_cmd::Command;

/// Scratch directory used as working directory, HOME and config dir.
pub struct BtWorkspace {
    _dir: tempfile::TempDir,
    pub root: PathBuf,
}

impl BtWorkspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().to_path_buf();
        Self { _dir: dir, root }
    }

    pub fn data_file(&self) -> PathBuf {
        self.root.join("bugs.json")
    }
}

pub struct BtOutput {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Run `bt` inside the workspace with an isolated environment.
pub fn run_bt<I, S>(workspace: &BtWorkspace, args: I, label: &str) -> BtOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_bt_with_env(workspace, args, &[], label)
}

/// Like [`run_bt`], with extra environment variables set for this run.
pub fn run_bt_with_env<I, S>(
    workspace: &BtWorkspace,
    args: I,
    env: &[(&str, &str)],
    label: &str,
) -> BtOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::cargo_bin("bt").expect("bt binary");
    cmd.args(args)
        .current_dir(&workspace.root)
        .env("HOME", &workspace.root)
        .env("XDG_CONFIG_HOME", workspace.root.join(".config"))
        .env_remove("BUGTRACK_DATA")
        .env_remove("BUGTRACK_EXPORT_DIR")
        .env_remove("RUST_LOG");
    for (key, value) in env {
        cmd.env(key, value);
    }
    let output = cmd
        .output()
        .unwrap_or_else(|e| panic!("{label}: failed to run bt: {e}"));

    BtOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
