//! Command dispatch for a parsed command line.

use std::io::Write;
use std::path::PathBuf;

use cb_plugin::PluginHandlerConfig;

use crate::cli::{Cli, Commands};
use crate::commands::{
    self, CleanCommand, ConfigCommand, CreateCommand, DeleteCommand, GetCommand, GetKeyCommand,
    PluginCommand, UpdateKubeconfigCommand,
};
use crate::config::ConfigFile;
use crate::error::CliError;
use crate::output::OutputFormat;
use crate::session::Session;

/// Process-level inputs, captured once in `main`.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Home directory.
    pub home: PathBuf,
    /// Plugin search directories.
    pub plugins: PluginHandlerConfig,
    /// Kubeconfig file `update-kubeconfig` writes.
    pub kubeconfig: PathBuf,
}

impl Environment {
    /// Config file path: `--config` / `CBCTL_CONFIG`, else
    /// `~/.cbctl/config`.
    #[must_use]
    pub fn config_path(&self, cli: &Cli) -> PathBuf {
        cli.config
            .clone()
            .unwrap_or_else(|| ConfigFile::default_path(&self.home))
    }
}

/// Run one command, writing its output to `out`.
///
/// `version` and `plugin` never touch the config file; every other command
/// loads it first, creating it with defaults when missing.
///
/// # Errors
///
/// Returns the command's error.
pub async fn run<W: Write>(cli: Cli, env: &Environment, out: &mut W) -> Result<(), CliError> {
    let format = OutputFormat::new(cli.output);

    match &cli.command {
        Commands::Version => return commands::version::execute(out),
        Commands::Plugin { command } => {
            return PluginCommand::new(&env.plugins).execute(out, command);
        }
        _ => {}
    }

    let file = ConfigFile::load(env.config_path(&cli))?;
    let mut session = Session::new(file, cli.namespace);

    match &cli.command {
        Commands::Config { command } => {
            ConfigCommand::new(&mut session).execute(out, &format, command)?;
        }
        Commands::Create { command } => {
            CreateCommand::new(&session)
                .execute(out, &format, command)
                .await?;
        }
        Commands::Get { command } => {
            GetCommand::new(&session).execute(out, &format, command).await?;
        }
        Commands::Delete { command } => {
            DeleteCommand::new(&session)
                .execute(out, &format, command)
                .await?;
        }
        Commands::Clean { target } => {
            CleanCommand::new(&session)
                .execute(out, &format, *target)
                .await?;
        }
        Commands::GetKey(args) => {
            GetKeyCommand::new(&session).execute(out, args).await?;
        }
        Commands::UpdateKubeconfig(args) => {
            UpdateKubeconfigCommand::new(&session, &env.kubeconfig)
                .execute(out, &format, args)
                .await?;
        }
        Commands::Version | Commands::Plugin { .. } => {}
    }

    Ok(())
}
