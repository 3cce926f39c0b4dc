//! Plugin handler configuration.
//!
//! Built once per invocation from the user's home directory and the
//! inherited `PATH`; never mutated afterwards.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Prefix every plugin found on the search path must carry.
pub const PLUGIN_FILENAME_PREFIX: &str = "cbctl";

/// Name of the per-user plugin directory under `~/.cbctl`.
pub const PLUGIN_DIRECTORY: &str = "plugins";

/// Where and how to look for plugins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginHandlerConfig {
    prefix: String,
    search_path: Vec<PathBuf>,
    plugin_dirs: Vec<PathBuf>,
}

impl PluginHandlerConfig {
    /// Create a configuration from explicit parts.
    #[must_use]
    pub fn new(
        prefix: impl Into<String>,
        search_path: Vec<PathBuf>,
        plugin_dirs: Vec<PathBuf>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            search_path,
            plugin_dirs,
        }
    }

    /// Standard configuration: `path_var` split into search directories,
    /// plus `<home>/.cbctl/plugins`.
    #[must_use]
    pub fn from_env(home: &Path, path_var: Option<&OsStr>) -> Self {
        let search_path = path_var
            .map(|p| std::env::split_paths(p).collect())
            .unwrap_or_default();
        Self::new(
            PLUGIN_FILENAME_PREFIX,
            search_path,
            vec![Self::plugin_directory(home)],
        )
    }

    /// The fixed plugin directory for a home directory.
    #[must_use]
    pub fn plugin_directory(home: &Path) -> PathBuf {
        home.join(".cbctl").join(PLUGIN_DIRECTORY)
    }

    /// Plugin filename prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Search-path directories, in order.
    #[must_use]
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    /// Plugin directories, in order.
    #[must_use]
    pub fn plugin_dirs(&self) -> &[PathBuf] {
        &self.plugin_dirs
    }

    /// Whether `dir` is one of the fixed plugin directories.
    ///
    /// Exact path comparison, no canonicalization.
    #[must_use]
    pub fn is_plugin_dir(&self, dir: &Path) -> bool {
        self.plugin_dirs.iter().any(|d| d == dir)
    }

    /// Every directory a listing walks: the search path followed by the
    /// plugin directories, blanks dropped, duplicates removed keeping the
    /// first occurrence.
    #[must_use]
    pub fn lookup_dirs(&self) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        self.search_path
            .iter()
            .chain(&self.plugin_dirs)
            .filter(|dir| !dir.as_os_str().to_string_lossy().trim().is_empty())
            .filter(|dir| seen.insert(dir.as_path()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_appends_plugin_directory() {
        let path = std::env::join_paths(["/usr/local/bin", "/usr/bin"]).expect("join paths");
        let config = PluginHandlerConfig::from_env(Path::new("/home/alice"), Some(&path));

        assert_eq!(config.prefix(), "cbctl");
        assert_eq!(
            config.search_path(),
            &[PathBuf::from("/usr/local/bin"), PathBuf::from("/usr/bin")]
        );
        assert_eq!(
            config.plugin_dirs(),
            &[PathBuf::from("/home/alice/.cbctl/plugins")]
        );
    }

    #[test]
    fn from_env_without_path_still_has_plugin_directory() {
        let config = PluginHandlerConfig::from_env(Path::new("/home/bob"), None);
        assert!(config.search_path().is_empty());
        assert_eq!(config.plugin_dirs().len(), 1);
    }

    #[test]
    fn lookup_dirs_dedupes_in_order() {
        let config = PluginHandlerConfig::new(
            "cbctl",
            vec![
                PathBuf::from("/b"),
                PathBuf::from("/a"),
                PathBuf::from("/b"),
                PathBuf::new(),
            ],
            vec![PathBuf::from("/a"), PathBuf::from("/p")],
        );

        assert_eq!(
            config.lookup_dirs(),
            vec![PathBuf::from("/b"), PathBuf::from("/a"), PathBuf::from("/p")]
        );
    }

    #[test]
    fn is_plugin_dir_is_exact_match() {
        let config = PluginHandlerConfig::from_env(Path::new("/home/carol"), None);
        assert!(config.is_plugin_dir(Path::new("/home/carol/.cbctl/plugins")));
        assert!(!config.is_plugin_dir(Path::new("/home/carol/.cbctl")));
    }
}
