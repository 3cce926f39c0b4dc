//! Launching a resolved plugin.
//!
//! On unix the current process image is replaced, so the plugin inherits
//! the pid and the exit status flows straight back to the shell. Elsewhere
//! the plugin runs as a child with inherited stdio and `cbctl` exits with
//! status 0 once it succeeds.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use crate::error::PluginError;

/// Runs a plugin executable.
///
/// `execute` does not return on success.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Launch `executable` with exactly `args` and exactly `environment`.
    ///
    /// `args[0]` is the executable path.
    fn execute(
        &self,
        executable: &Path,
        args: &[OsString],
        environment: &[(OsString, OsString)],
    ) -> Result<(), PluginError>;
}

/// Replace the running process with the plugin.
#[cfg(unix)]
#[derive(Debug, Default, Clone, Copy)]
pub struct ReplaceProcess;

#[cfg(unix)]
impl Executor for ReplaceProcess {
    fn execute(
        &self,
        executable: &Path,
        args: &[OsString],
        environment: &[(OsString, OsString)],
    ) -> Result<(), PluginError> {
        use std::os::unix::process::CommandExt;

        debug!(plugin = %executable.display(), "replacing process with plugin");
        let mut command = Command::new(executable);
        if let Some(argv0) = args.first() {
            command.arg0(argv0);
        }
        let source = command
            .args(args.iter().skip(1))
            .env_clear()
            .envs(environment.iter().map(|(k, v)| (k, v)))
            .exec();

        Err(PluginError::Execution {
            path: executable.to_path_buf(),
            source,
        })
    }
}

/// Run the plugin as a child and exit once it finishes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpawnAndWait;

impl SpawnAndWait {
    /// Run the plugin to completion and return its status.
    pub fn run(
        &self,
        executable: &Path,
        args: &[OsString],
        environment: &[(OsString, OsString)],
    ) -> Result<ExitStatus, PluginError> {
        debug!(plugin = %executable.display(), "spawning plugin");
        Command::new(executable)
            .args(args.iter().skip(1))
            .env_clear()
            .envs(environment.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| PluginError::Execution {
                path: executable.to_path_buf(),
                source,
            })
    }
}

impl Executor for SpawnAndWait {
    fn execute(
        &self,
        executable: &Path,
        args: &[OsString],
        environment: &[(OsString, OsString)],
    ) -> Result<(), PluginError> {
        let status = self.run(executable, args, environment)?;
        if status.success() {
            std::process::exit(0);
        }
        Err(PluginError::ChildFailed {
            path: executable.to_path_buf(),
            status,
        })
    }
}

/// The executor for the host platform.
#[must_use]
pub fn default_executor() -> Box<dyn Executor> {
    #[cfg(unix)]
    {
        Box::new(ReplaceProcess)
    }
    #[cfg(not(unix))]
    {
        Box::new(SpawnAndWait)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
        path
    }

    fn argv(path: &Path, rest: &[&str]) -> Vec<OsString> {
        std::iter::once(path.as_os_str().to_os_string())
            .chain(rest.iter().map(OsString::from))
            .collect()
    }

    #[test]
    fn spawn_and_wait_reports_success() {
        let dir = TempDir::new().expect("tempdir");
        let path = script(&dir, "cbctl-ok", "exit 0");
        let status = SpawnAndWait
            .run(&path, &argv(&path, &[]), &[])
            .expect("should run");
        assert!(status.success());
    }

    #[test]
    fn spawn_and_wait_reports_child_exit_code() {
        let dir = TempDir::new().expect("tempdir");
        let path = script(&dir, "cbctl-fail", "exit \"$1\"");
        let status = SpawnAndWait
            .run(&path, &argv(&path, &["3"]), &[])
            .expect("should run");
        assert_eq!(status.code(), Some(3));
    }

    #[test]
    fn spawn_and_wait_passes_raw_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().expect("tempdir");
        let out = dir.path().join("seen");
        let path = script(&dir, "cbctl-dump", "printf '%s' \"$1\" > \"$2\"");
        let mut args = argv(&path, &[]);
        args.push(OsStr::from_bytes(b"a\xffb").to_os_string());
        args.push(out.clone().into_os_string());

        let status = SpawnAndWait.run(&path, &args, &[]).expect("should run");
        assert!(status.success());
        assert_eq!(fs::read(&out).expect("read"), b"a\xffb");
    }

    #[test]
    fn spawn_and_wait_non_zero_is_child_failed() {
        let dir = TempDir::new().expect("tempdir");
        let path = script(&dir, "cbctl-fail", "exit 4");
        let err = SpawnAndWait
            .execute(&path, &argv(&path, &[]), &[])
            .expect_err("should fail");
        assert!(matches!(err, PluginError::ChildFailed { status, .. } if status.code() == Some(4)));
    }

    #[test]
    fn spawn_and_wait_missing_executable_is_execution_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("cbctl-absent");
        let err = SpawnAndWait
            .run(&path, &argv(&path, &[]), &[])
            .expect_err("should fail");
        assert!(matches!(err, PluginError::Execution { .. }));
    }

    #[test]
    fn replace_process_missing_executable_returns_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("cbctl-absent");
        let err = ReplaceProcess
            .execute(&path, &argv(&path, &[]), &[])
            .expect_err("exec of a missing file returns");
        assert!(matches!(err, PluginError::Execution { ref path, .. } if path.ends_with("cbctl-absent")));
    }
}
