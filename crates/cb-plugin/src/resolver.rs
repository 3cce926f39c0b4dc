//! Plugin resolution: longest-prefix match of argv words against plugin
//! executables.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::config::PluginHandlerConfig;
use crate::error::PluginError;
use crate::executable::{EXECUTABLE_EXTENSIONS, ExecCheck};
use crate::executor::{Executor, default_executor};

/// Finds and runs plugin executables.
pub trait PluginHandler {
    /// Look up a plugin by its dash-joined name (without prefix).
    ///
    /// Returns the path of the first executable match, if any.
    fn lookup(&self, filename: &str) -> Option<PathBuf>;

    /// Run `executable` with `args` (`args[0]` is the executable itself)
    /// and `environment`.
    fn execute(
        &self,
        executable: &Path,
        args: &[OsString],
        environment: &[(OsString, OsString)],
    ) -> Result<(), PluginError>;
}

/// Filesystem-backed plugin handler.
#[derive(Debug)]
pub struct DefaultPluginHandler {
    config: PluginHandlerConfig,
    check: ExecCheck,
    executor: Box<dyn Executor>,
}

impl DefaultPluginHandler {
    /// Handler using the host executability check and executor.
    #[must_use]
    pub fn new(config: PluginHandlerConfig) -> Self {
        Self::with_executor(config, default_executor())
    }

    /// Handler with an explicit executor.
    #[must_use]
    pub fn with_executor(config: PluginHandlerConfig, executor: Box<dyn Executor>) -> Self {
        Self {
            config,
            check: ExecCheck::for_host(),
            executor,
        }
    }

    /// Override the executability strategy.
    #[must_use]
    pub fn with_check(mut self, check: ExecCheck) -> Self {
        self.check = check;
        self
    }

    /// The configuration this handler searches.
    #[must_use]
    pub fn config(&self) -> &PluginHandlerConfig {
        &self.config
    }

    fn first_executable(&self, dir: &Path, name: &str) -> Option<PathBuf> {
        let mut candidates = vec![dir.join(name)];
        if self.check == ExecCheck::ExtensionAllowList {
            candidates.extend(
                EXECUTABLE_EXTENSIONS
                    .iter()
                    .map(|ext| dir.join(format!("{name}.{ext}"))),
            );
        }
        candidates
            .into_iter()
            .find(|path| path.is_file() && self.check.check(path).is_executable())
    }
}

impl PluginHandler for DefaultPluginHandler {
    fn lookup(&self, filename: &str) -> Option<PathBuf> {
        let prefixed = format!("{}-{filename}", self.config.prefix());
        let on_path = self.config.search_path().iter().find_map(|dir| {
            let dir = if dir.as_os_str().is_empty() {
                Path::new(".")
            } else {
                dir.as_path()
            };
            self.first_executable(dir, &prefixed)
        });
        if on_path.is_some() {
            return on_path;
        }

        self.config
            .plugin_dirs()
            .iter()
            .find_map(|dir| self.first_executable(dir, filename))
    }

    fn execute(
        &self,
        executable: &Path,
        args: &[OsString],
        environment: &[(OsString, OsString)],
    ) -> Result<(), PluginError> {
        self.executor.execute(executable, args, environment)
    }
}

/// A plugin matched against the token window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlugin {
    /// Executable to run.
    pub path: PathBuf,
    /// How many leading argv tokens named the plugin.
    pub consumed: usize,
}

/// Whether an argv token is a flag. Compared on raw bytes so non-UTF-8
/// tokens are classified too.
fn is_flag(arg: &OsStr) -> bool {
    arg.as_encoded_bytes().first() == Some(&b'-')
}

/// The leading run of argv tokens that do not start with `-`.
#[must_use]
pub fn token_window(args: &[OsString]) -> Vec<OsString> {
    args.iter()
        .take_while(|arg| !is_flag(arg))
        .cloned()
        .collect()
}

/// Join window tokens into a plugin name: inner dashes become underscores,
/// tokens are joined with `-`.
#[must_use]
pub fn plugin_name(tokens: &[OsString]) -> String {
    tokens
        .iter()
        .map(|token| token.to_string_lossy().replace('-', "_"))
        .collect::<Vec<_>>()
        .join("-")
}

/// Longest-prefix search: try the whole window, then drop one trailing
/// token at a time.
pub fn resolve(handler: &dyn PluginHandler, window: &[OsString]) -> Option<ResolvedPlugin> {
    (1..=window.len()).rev().find_map(|len| {
        let name = plugin_name(&window[..len]);
        trace!(plugin = %name, "probing plugin name");
        handler.lookup(&name).map(|path| ResolvedPlugin {
            path,
            consumed: len,
        })
    })
}

/// Resolve `args` to a plugin and execute it.
///
/// Returns `Ok(None)` when no plugin matches, leaving the caller to report
/// an unknown command. With a replacing executor a match never returns.
pub fn handle_plugin_command(
    handler: &dyn PluginHandler,
    args: &[OsString],
    environment: &[(OsString, OsString)],
) -> Result<Option<ResolvedPlugin>, PluginError> {
    let window = token_window(args);
    if window.is_empty() {
        let first = args
            .first()
            .map(|a| a.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Err(PluginError::FlagsBeforeName(first));
    }

    let Some(resolved) = resolve(handler, &window) else {
        debug!(args = ?window, "no plugin matched");
        return Ok(None);
    };

    let forwarded: Vec<OsString> = std::iter::once(resolved.path.clone().into_os_string())
        .chain(args[resolved.consumed..].iter().cloned())
        .collect();
    debug!(
        plugin = %resolved.path.display(),
        consumed = resolved.consumed,
        "dispatching to plugin"
    );
    handler.execute(&resolved.path, &forwarded, environment)?;
    Ok(Some(resolved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeHandler {
        plugins: HashMap<String, PathBuf>,
        lookups: RefCell<Vec<String>>,
        executed: RefCell<Vec<(PathBuf, Vec<OsString>, usize)>>,
    }

    impl FakeHandler {
        fn with(names: &[&str]) -> Self {
            Self {
                plugins: names
                    .iter()
                    .map(|n| ((*n).to_string(), PathBuf::from(format!("/bin/cbctl-{n}"))))
                    .collect(),
                ..Self::default()
            }
        }
    }

    impl PluginHandler for FakeHandler {
        fn lookup(&self, filename: &str) -> Option<PathBuf> {
            self.lookups.borrow_mut().push(filename.to_string());
            self.plugins.get(filename).cloned()
        }

        fn execute(
            &self,
            executable: &Path,
            args: &[OsString],
            environment: &[(OsString, OsString)],
        ) -> Result<(), PluginError> {
            self.executed.borrow_mut().push((
                executable.to_path_buf(),
                args.to_vec(),
                environment.len(),
            ));
            Ok(())
        }
    }

    fn args(words: &[&str]) -> Vec<OsString> {
        words.iter().map(OsString::from).collect()
    }

    fn names(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn token_window_stops_at_first_flag() {
        assert_eq!(
            token_window(&args(&["create", "cluster", "--name", "x", "y"])),
            args(&["create", "cluster"])
        );
        assert!(token_window(&args(&["-o", "json"])).is_empty());
    }

    #[test]
    fn plugin_name_normalizes_dashes() {
        assert_eq!(plugin_name(&args(&["get", "my-thing"])), "get-my_thing");
        assert_eq!(plugin_name(&args(&["a-b-c"])), "a_b_c");
    }

    #[test]
    fn longest_prefix_wins_and_rest_is_forwarded() {
        let handler = FakeHandler::with(&["foo", "foo-bar"]);
        let resolved = handle_plugin_command(&handler, &args(&["foo", "bar", "baz"]), &[])
            .expect("should dispatch")
            .expect("should resolve");

        assert_eq!(resolved.consumed, 2);
        assert_eq!(
            *handler.lookups.borrow(),
            names(&["foo-bar-baz", "foo-bar"])
        );
        let executed = handler.executed.borrow();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].0, PathBuf::from("/bin/cbctl-foo-bar"));
        assert_eq!(executed[0].1, args(&["/bin/cbctl-foo-bar", "baz"]));
    }

    #[test]
    fn flags_after_window_are_forwarded() {
        let handler = FakeHandler::with(&["foo"]);
        handle_plugin_command(&handler, &args(&["foo", "--verbose", "x"]), &[])
            .expect("should dispatch");
        assert_eq!(
            handler.executed.borrow()[0].1,
            args(&["/bin/cbctl-foo", "--verbose", "x"])
        );
    }

    #[test]
    fn dash_normalized_lookup() {
        let handler = FakeHandler::default();
        let _ = handle_plugin_command(&handler, &args(&["get", "my-thing"]), &[]);
        assert_eq!(
            *handler.lookups.borrow(),
            names(&["get-my_thing", "get"])
        );
    }

    #[test]
    fn leading_flag_is_usage_error() {
        let handler = FakeHandler::with(&["foo"]);
        let err = handle_plugin_command(&handler, &args(&["--bogus", "foo"]), &[])
            .expect_err("should reject");
        assert_eq!(
            err.to_string(),
            "flags cannot be placed before plugin name: --bogus"
        );
        assert!(handler.lookups.borrow().is_empty());
    }

    #[test]
    fn no_match_is_silent_and_executes_nothing() {
        let handler = FakeHandler::default();
        let result = handle_plugin_command(
            &handler,
            &args(&["create", "cluster", "--name", "x"]),
            &[],
        )
        .expect("not found is not an error");

        assert!(result.is_none());
        assert_eq!(
            *handler.lookups.borrow(),
            names(&["create-cluster", "create"])
        );
        assert!(handler.executed.borrow().is_empty());
    }

    #[test]
    fn environment_is_passed_through() {
        let handler = FakeHandler::with(&["env"]);
        let env = vec![
            (OsString::from("HOME"), OsString::from("/home/a")),
            (OsString::from("PATH"), OsString::from("/bin")),
        ];
        handle_plugin_command(&handler, &args(&["env"]), &env).expect("should dispatch");
        assert_eq!(handler.executed.borrow()[0].2, 2);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_arguments_are_forwarded_unchanged() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"a\xffb").to_os_string();
        let handler = FakeHandler::with(&["dump"]);
        handle_plugin_command(
            &handler,
            &[OsString::from("dump"), raw.clone()],
            &[],
        )
        .expect("should dispatch");
        assert_eq!(
            handler.executed.borrow()[0].1,
            vec![OsString::from("/bin/cbctl-dump"), raw]
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_window_token_still_looked_up() {
        use std::os::unix::ffi::OsStrExt;

        let handler = FakeHandler::default();
        let window = token_window(&[
            OsStr::from_bytes(b"f\xffo").to_os_string(),
            OsStr::from_bytes(b"-\xff").to_os_string(),
        ]);
        assert_eq!(window.len(), 1);
        assert!(resolve(&handler, &window).is_none());
        assert_eq!(*handler.lookups.borrow(), names(&["f\u{fffd}o"]));
    }

    #[cfg(unix)]
    mod filesystem {
        use super::*;
        use crate::executor::SpawnAndWait;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn install(dir: &Path, name: &str, mode: u32) -> PathBuf {
            fs::create_dir_all(dir).expect("mkdir");
            let path = dir.join(name);
            fs::write(&path, "#!/bin/sh\nexit 0\n").expect("write");
            fs::set_permissions(&path, fs::Permissions::from_mode(mode)).expect("chmod");
            path
        }

        fn handler(search: &[&Path], plugin_dir: &Path) -> DefaultPluginHandler {
            let config = PluginHandlerConfig::new(
                "cbctl",
                search.iter().map(|p| p.to_path_buf()).collect(),
                vec![plugin_dir.to_path_buf()],
            );
            DefaultPluginHandler::with_executor(config, Box::new(SpawnAndWait))
                .with_check(ExecCheck::PermissionBits)
        }

        #[test]
        fn search_path_beats_plugin_directory() {
            let root = TempDir::new().expect("tempdir");
            let bin = root.path().join("bin");
            let plugins = root.path().join("plugins");
            let on_path = install(&bin, "cbctl-foo", 0o755);
            install(&plugins, "foo", 0o755);

            let handler = handler(&[&bin], &plugins);
            assert_eq!(handler.lookup("foo"), Some(on_path));
        }

        #[test]
        fn plugin_directory_holds_unprefixed_names() {
            let root = TempDir::new().expect("tempdir");
            let bin = root.path().join("bin");
            let plugins = root.path().join("plugins");
            fs::create_dir_all(&bin).expect("mkdir");
            let in_dir = install(&plugins, "foo-bar", 0o755);
            install(&plugins, "cbctl-baz", 0o755);

            let handler = handler(&[&bin], &plugins);
            assert_eq!(handler.lookup("foo-bar"), Some(in_dir));
            assert_eq!(handler.lookup("baz"), None);
        }

        #[test]
        fn earlier_search_directory_wins() {
            let root = TempDir::new().expect("tempdir");
            let first = root.path().join("first");
            let second = root.path().join("second");
            let winner = install(&first, "cbctl-foo", 0o755);
            install(&second, "cbctl-foo", 0o755);

            let handler = handler(&[&first, &second], &root.path().join("plugins"));
            assert_eq!(handler.lookup("foo"), Some(winner));
        }

        #[test]
        fn non_executable_and_directories_are_skipped() {
            let root = TempDir::new().expect("tempdir");
            let first = root.path().join("first");
            let second = root.path().join("second");
            install(&first, "cbctl-foo", 0o644);
            fs::create_dir_all(first.join("cbctl-bar")).expect("mkdir");
            let winner = install(&second, "cbctl-foo", 0o755);

            let handler = handler(&[&first, &second], &root.path().join("plugins"));
            assert_eq!(handler.lookup("foo"), Some(winner));
            assert_eq!(handler.lookup("bar"), None);
        }

        #[test]
        fn resolve_against_filesystem() {
            let root = TempDir::new().expect("tempdir");
            let bin = root.path().join("bin");
            let path = install(&bin, "cbctl-foo-bar", 0o755);

            let handler = handler(&[&bin], &root.path().join("plugins"));
            let resolved = resolve(&handler, &args(&["foo", "bar", "baz"])).expect("resolves");
            assert_eq!(resolved, ResolvedPlugin { path, consumed: 2 });
        }
    }
}
