//! Config command implementation.
//!
//! Manages contexts in the config file. Every mutating subcommand saves
//! the file before printing.

use std::io::Write;

use crate::cli::ConfigCommands;
use crate::config::Urls;
use crate::error::CliError;
use crate::output::OutputFormat;
use crate::session::Session;

/// Handler for config subcommands.
pub struct ConfigCommand<'a> {
    session: &'a mut Session,
}

impl<'a> ConfigCommand<'a> {
    /// Creates a new config command handler.
    #[must_use]
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    /// Executes the config subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the context is invalid or the file cannot be saved.
    pub fn execute<W: Write>(
        &mut self,
        out: &mut W,
        format: &OutputFormat,
        command: &ConfigCommands,
    ) -> Result<(), CliError> {
        let namespace = self.session.namespace_override().map(str::to_string);
        let file = self.session.file_mut();

        match command {
            ConfigCommands::View => format.write(out, &file.config),
            ConfigCommands::GetContext { name: None } => {
                for name in file.config.contexts.keys() {
                    writeln!(out, "{name}")?;
                }
                Ok(())
            }
            ConfigCommands::GetContext { name: Some(name) } => {
                let context = file.config.contexts.get(name).ok_or_else(|| {
                    CliError::InvalidArgument(format!("context '{name}' not found"))
                })?;
                format.write(out, context)
            }
            ConfigCommands::AddContext {
                name,
                mcks,
                spider,
                tumblebug,
            } => {
                let urls = Urls {
                    mcks: mcks.clone(),
                    spider: spider.clone(),
                    tumblebug: tumblebug.clone(),
                };
                file.config.add_context(name, namespace.as_deref(), urls)?;
                file.save()?;
                format.write(out, &file.config)
            }
            ConfigCommands::SetContext {
                name,
                mcks,
                spider,
                tumblebug,
            } => {
                let context = file
                    .config
                    .set_context(
                        name,
                        namespace.as_deref(),
                        mcks.as_deref(),
                        spider.as_deref(),
                        tumblebug.as_deref(),
                    )?
                    .clone();
                file.save()?;
                format.write(out, &context)
            }
            ConfigCommands::CurrentContext { name } => {
                if let Some(name) = name {
                    file.config.use_context(name)?;
                    file.save()?;
                }
                writeln!(out, "{}", file.config.current_context)?;
                Ok(())
            }
            ConfigCommands::SetNamespace { name } => {
                file.config.current_mut()?.namespace.clone_from(name);
                file.save()?;
                format.write(out, file.config.current()?)
            }
            ConfigCommands::DeleteContext { name } => {
                file.config.delete_context(name)?;
                file.save()?;
                format.write(out, &file.config)
            }
        }
    }
}
