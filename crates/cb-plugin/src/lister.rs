//! `plugin list`: enumerate plugin candidates and verify them.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::PluginHandlerConfig;
use crate::error::PluginError;
use crate::executable::{ExecCheck, Executability};

/// Lookup into the built-in command hierarchy.
pub trait CommandTree {
    /// Resolve `path` (command words, no flags) to a built-in command.
    ///
    /// Returns the deepest matched command's full name, e.g.
    /// `cbctl create cluster`, or `None` when the first word is not a
    /// built-in.
    fn find_command(&self, path: &[String]) -> Option<String>;
}

/// Checks one plugin candidate.
pub trait PathVerifier {
    /// Verify `path`, returning any problems found.
    fn verify(&mut self, path: &Path) -> Vec<VerificationWarning>;
}

/// A problem found while verifying a plugin candidate.
#[derive(Debug)]
pub enum VerificationWarning {
    /// The file exists but lacks execute permission.
    NotExecutable {
        /// Candidate path.
        path: PathBuf,
        /// Plugin prefix.
        prefix: String,
    },
    /// The executability check itself failed.
    Unverifiable {
        /// Candidate path.
        path: PathBuf,
        /// Why the check failed.
        reason: std::io::Error,
    },
    /// An earlier plugin with the same name wins.
    Shadowed {
        /// Candidate path.
        path: PathBuf,
        /// First-seen plugin with the same name.
        original: PathBuf,
    },
    /// The plugin's name matches a built-in command.
    OverwritesCommand {
        /// Plugin base name.
        name: String,
        /// Full name of the built-in command.
        command: String,
    },
}

impl fmt::Display for VerificationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotExecutable { path, prefix } => write!(
                f,
                "warning: {} identified as a {prefix} plugin, but it is not executable",
                path.display()
            ),
            Self::Unverifiable { path, reason } => write!(
                f,
                "error: unable to identify {} as an executable file: {reason}",
                path.display()
            ),
            Self::Shadowed { path, original } => write!(
                f,
                "warning: {} is overshadowed by a similarly named plugin: {}",
                path.display(),
                original.display()
            ),
            Self::OverwritesCommand { name, command } => write!(
                f,
                "warning: {name} overwrites existing command: {command:?}"
            ),
        }
    }
}

/// Verifies executability, shadowing and collisions with built-ins.
pub struct CommandOverrideVerifier<'a> {
    root: &'a dyn CommandTree,
    prefix: String,
    check: ExecCheck,
    seen: HashMap<String, PathBuf>,
}

impl<'a> CommandOverrideVerifier<'a> {
    /// Verifier for plugins named with `prefix`, checked with the host
    /// executability strategy.
    pub fn new(root: &'a dyn CommandTree, prefix: impl Into<String>) -> Self {
        Self {
            root,
            prefix: prefix.into(),
            check: ExecCheck::for_host(),
            seen: HashMap::new(),
        }
    }

    /// Override the executability strategy.
    #[must_use]
    pub fn with_check(mut self, check: ExecCheck) -> Self {
        self.check = check;
        self
    }

    /// Base names seen so far and the path that claimed each first.
    #[must_use]
    pub fn seen(&self) -> &HashMap<String, PathBuf> {
        &self.seen
    }
}

impl fmt::Debug for CommandOverrideVerifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandOverrideVerifier")
            .field("prefix", &self.prefix)
            .field("check", &self.check)
            .field("seen", &self.seen)
            .finish_non_exhaustive()
    }
}

impl PathVerifier for CommandOverrideVerifier<'_> {
    fn verify(&mut self, path: &Path) -> Vec<VerificationWarning> {
        let mut warnings = Vec::new();

        match self.check.check(path) {
            Executability::Executable => {}
            Executability::NotExecutable => warnings.push(VerificationWarning::NotExecutable {
                path: path.to_path_buf(),
                prefix: self.prefix.clone(),
            }),
            Executability::Unknown(reason) => warnings.push(VerificationWarning::Unverifiable {
                path: path.to_path_buf(),
                reason,
            }),
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut segments: Vec<String> = name.split('-').map(str::to_string).collect();
        if segments.len() > 1 {
            segments.remove(0);
        }

        if let Some(original) = self.seen.get(&name) {
            warnings.push(VerificationWarning::Shadowed {
                path: path.to_path_buf(),
                original: original.clone(),
            });
        } else {
            self.seen.insert(name.clone(), path.to_path_buf());
        }

        if let Some(command) = self.root.find_command(&segments) {
            warnings.push(VerificationWarning::OverwritesCommand { name, command });
        }

        warnings
    }
}

/// Result of a listing run.
#[derive(Debug, Default)]
pub struct VerificationReport {
    /// Every candidate printed, in listing order.
    pub plugins: Vec<PathBuf>,
    /// Warnings accumulated across all candidates.
    pub warnings: Vec<VerificationWarning>,
}

impl VerificationReport {
    /// Convert into an error when nothing was found or anything was
    /// flagged.
    pub fn into_result(self, prefix: &str) -> Result<Vec<PathBuf>, PluginError> {
        if self.plugins.is_empty() || !self.warnings.is_empty() {
            return Err(PluginError::ListFailed(ListFailure {
                prefix: prefix.to_string(),
                none_found: self.plugins.is_empty(),
                warnings: self.warnings,
            }));
        }
        Ok(self.plugins)
    }
}

/// Aggregate failure of a listing run.
#[derive(Debug)]
pub struct ListFailure {
    /// Plugin prefix.
    pub prefix: String,
    /// No candidate was found at all.
    pub none_found: bool,
    /// Every warning, in the order found.
    pub warnings: Vec<VerificationWarning>,
}

impl fmt::Display for ListFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for warning in &self.warnings {
            writeln!(f, "  - {warning}")?;
        }
        if self.none_found {
            return write!(
                f,
                "error: unable to find any {} plugins in your PATH",
                self.prefix
            );
        }
        match self.warnings.len() {
            1 => write!(f, "error: one plugin warning was found"),
            n => write!(f, "error: {n} plugin warnings were found"),
        }
    }
}

/// Walks the configured directories and prints plugin candidates.
#[derive(Debug, Clone)]
pub struct PluginLister {
    config: PluginHandlerConfig,
    name_only: bool,
}

impl PluginLister {
    /// Lister over `config`'s directories.
    #[must_use]
    pub fn new(config: PluginHandlerConfig) -> Self {
        Self {
            config,
            name_only: false,
        }
    }

    /// Print bare file names instead of full paths.
    #[must_use]
    pub fn name_only(mut self, name_only: bool) -> Self {
        self.name_only = name_only;
        self
    }

    /// Every candidate across all directories, in listing order.
    #[must_use]
    pub fn candidates(&self) -> Vec<PathBuf> {
        let prefix = format!("{}-", self.config.prefix());
        let mut found = Vec::new();

        for dir in self.config.lookup_dirs() {
            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "skipping unreadable plugin directory");
                    continue;
                }
            };

            let mut files: Vec<PathBuf> = entries
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_ok_and(|t| !t.is_dir()))
                .map(|entry| entry.path())
                .collect();
            files.sort();

            let unprefixed = self.config.is_plugin_dir(&dir);
            found.extend(files.into_iter().filter(|path| {
                unprefixed
                    || path
                        .file_name()
                        .is_some_and(|n| n.to_string_lossy().starts_with(&prefix))
            }));
        }

        found
    }

    /// Print every candidate to `out` and verify each one.
    ///
    /// When nothing is found, verification is skipped and the report is
    /// empty.
    pub fn list<W: Write>(
        &self,
        out: &mut W,
        verifier: &mut dyn PathVerifier,
    ) -> Result<VerificationReport, PluginError> {
        let mut report = VerificationReport::default();

        for path in self.candidates() {
            if report.plugins.is_empty() {
                writeln!(out, "The following compatible plugins are available:\n")?;
            }

            if self.name_only {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                writeln!(out, "{name}")?;
            } else {
                writeln!(out, "{}", path.display())?;
            }

            report.warnings.extend(verifier.verify(&path));
            report.plugins.push(path);
        }

        Ok(report)
    }
}
