//! Host-specific executability checks.

use std::io;
use std::path::Path;

/// Extensions treated as executable on hosts without permission bits.
pub const EXECUTABLE_EXTENSIONS: &[&str] = &["bat", "cmd", "com", "exe", "ps1"];

/// Outcome of checking a single file.
#[derive(Debug)]
pub enum Executability {
    /// The file can be run.
    Executable,
    /// The file exists but cannot be run.
    NotExecutable,
    /// The file could not be inspected.
    Unknown(io::Error),
}

impl Executability {
    /// True only for [`Executability::Executable`].
    #[must_use]
    pub fn is_executable(&self) -> bool {
        matches!(self, Self::Executable)
    }
}

/// How to decide whether a file is executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecCheck {
    /// Case-insensitive extension match against [`EXECUTABLE_EXTENSIONS`].
    ExtensionAllowList,
    /// Any of the owner, group or other execute bits is set.
    PermissionBits,
}

impl ExecCheck {
    /// The strategy matching the host platform.
    #[must_use]
    pub fn for_host() -> Self {
        if cfg!(windows) {
            Self::ExtensionAllowList
        } else {
            Self::PermissionBits
        }
    }

    /// Check `path`, following symlinks.
    pub fn check(self, path: &Path) -> Executability {
        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) => return Executability::Unknown(e),
        };
        if metadata.is_dir() {
            return Executability::NotExecutable;
        }

        let executable = match self {
            Self::ExtensionAllowList => has_executable_extension(path),
            Self::PermissionBits => has_execute_bit(&metadata),
        };
        if executable {
            Executability::Executable
        } else {
            Executability::NotExecutable
        }
    }
}

fn has_executable_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            EXECUTABLE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

#[cfg(unix)]
fn has_execute_bit(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn has_execute_bit(metadata: &std::fs::Metadata) -> bool {
    metadata.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn extension_allow_list_is_case_insensitive() {
        let dir = TempDir::new().expect("tempdir");
        for name in ["tool.EXE", "run.bat", "script.Ps1"] {
            let path = dir.path().join(name);
            fs::write(&path, "").expect("write");
            assert!(
                ExecCheck::ExtensionAllowList.check(&path).is_executable(),
                "{name} should be executable"
            );
        }
    }

    #[test]
    fn extension_allow_list_rejects_other_extensions() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("notes.txt");
        fs::write(&path, "").expect("write");
        assert!(matches!(
            ExecCheck::ExtensionAllowList.check(&path),
            Executability::NotExecutable
        ));
    }

    #[test]
    fn missing_file_is_unknown() {
        let dir = TempDir::new().expect("tempdir");
        let result = ExecCheck::PermissionBits.check(&dir.path().join("absent"));
        assert!(matches!(result, Executability::Unknown(_)));
    }

    #[test]
    fn directory_is_not_executable() {
        let dir = TempDir::new().expect("tempdir");
        assert!(matches!(
            ExecCheck::PermissionBits.check(dir.path()),
            Executability::NotExecutable
        ));
    }

    #[cfg(unix)]
    #[test]
    fn permission_bits_any_execute_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("cbctl-foo");
        fs::write(&path, "#!/bin/sh\n").expect("write");

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod");
        assert!(!ExecCheck::PermissionBits.check(&path).is_executable());

        fs::set_permissions(&path, fs::Permissions::from_mode(0o601)).expect("chmod");
        assert!(ExecCheck::PermissionBits.check(&path).is_executable());

        fs::set_permissions(&path, fs::Permissions::from_mode(0o744)).expect("chmod");
        assert!(ExecCheck::PermissionBits.check(&path).is_executable());
    }

    #[cfg(unix)]
    #[test]
    fn for_host_uses_permission_bits_on_unix() {
        assert_eq!(ExecCheck::for_host(), ExecCheck::PermissionBits);
    }
}
