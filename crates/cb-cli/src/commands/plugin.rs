//! Plugin command implementation.

use std::io::Write;

use clap::CommandFactory;

use cb_plugin::{CommandOverrideVerifier, PluginHandlerConfig, PluginLister};

use crate::cli::{Cli, PluginCommands};
use crate::error::CliError;
use crate::router::BuiltinCommands;

/// Handler for plugin subcommands.
pub struct PluginCommand<'a> {
    config: &'a PluginHandlerConfig,
}

impl<'a> PluginCommand<'a> {
    /// Creates a handler searching the directories of `config`.
    #[must_use]
    pub const fn new(config: &'a PluginHandlerConfig) -> Self {
        Self { config }
    }

    /// Executes the plugin subcommand.
    ///
    /// # Errors
    ///
    /// `plugin list` fails when no plugin is found or any candidate draws a
    /// warning; the error carries every warning.
    pub fn execute<W: Write>(&self, out: &mut W, command: &PluginCommands) -> Result<(), CliError> {
        match command {
            PluginCommands::List { name_only } => {
                // Built, so clap's generated `help` subcommands are present.
                let mut root = Cli::command();
                root.build();
                let tree = BuiltinCommands(&root);
                let mut verifier = CommandOverrideVerifier::new(&tree, self.config.prefix());

                let report = PluginLister::new(self.config.clone())
                    .name_only(*name_only)
                    .list(out, &mut verifier)?;
                report.into_result(self.config.prefix())?;
                Ok(())
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use cb_plugin::PluginError;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    fn plugin(dir: &Path, name: &str, mode: u32) {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").expect("write");
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).expect("chmod");
    }

    fn config(bin: &TempDir, home: &TempDir) -> PluginHandlerConfig {
        PluginHandlerConfig::from_env(home.path(), Some(bin.path().as_os_str()))
    }

    #[test]
    fn lists_executable_plugins() {
        let (bin, home) = (TempDir::new().expect("bin"), TempDir::new().expect("home"));
        plugin(bin.path(), "cbctl-foo", 0o755);
        plugin(bin.path(), "unrelated", 0o755);

        let config = config(&bin, &home);
        let mut out = Vec::new();
        PluginCommand::new(&config)
            .execute(&mut out, &PluginCommands::List { name_only: true })
            .expect("list");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "The following compatible plugins are available:\n\ncbctl-foo\n"
        );
    }

    #[test]
    fn builtin_override_is_reported() {
        let (bin, home) = (TempDir::new().expect("bin"), TempDir::new().expect("home"));
        plugin(bin.path(), "cbctl-version", 0o755);

        let config = config(&bin, &home);
        let mut out = Vec::new();
        let err = PluginCommand::new(&config)
            .execute(&mut out, &PluginCommands::List { name_only: false })
            .expect_err("override");
        let failure = match err {
            CliError::Plugin(PluginError::ListFailed(failure)) => failure,
            other => unreachable!("unexpected error: {other}"),
        };
        assert_eq!(
            failure.to_string(),
            "  - warning: cbctl-version overwrites existing command: \"cbctl version\"\n\
             error: one plugin warning was found"
        );
    }

    #[test]
    fn help_plugin_overwrites_generated_help() {
        let (bin, home) = (TempDir::new().expect("bin"), TempDir::new().expect("home"));
        plugin(bin.path(), "cbctl-help", 0o755);

        let config = config(&bin, &home);
        let mut out = Vec::new();
        let err = PluginCommand::new(&config)
            .execute(&mut out, &PluginCommands::List { name_only: true })
            .expect_err("override");
        assert!(
            err.to_string()
                .contains("warning: cbctl-help overwrites existing command: \"cbctl help\"")
        );
    }

    #[test]
    fn nothing_found_is_error() {
        let (bin, home) = (TempDir::new().expect("bin"), TempDir::new().expect("home"));
        let config = config(&bin, &home);
        let mut out = Vec::new();
        let err = PluginCommand::new(&config)
            .execute(&mut out, &PluginCommands::List { name_only: false })
            .expect_err("none found");
        assert!(err.to_string().contains("unable to find any cbctl plugins"));
        assert!(out.is_empty());
    }
}
