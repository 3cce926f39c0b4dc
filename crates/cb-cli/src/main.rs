//! cbctl binary entrypoint.

use std::ffi::OsString;
use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cb_cli::app::{Environment, run};
use cb_cli::cli::Cli;
use cb_cli::error::CliError;
use cb_cli::kubeconfig::default_kubeconfig_path;
use cb_cli::router::dispatch_plugin;
use cb_plugin::{DefaultPluginHandler, PluginError, PluginHandlerConfig};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<OsString> = std::env::args_os().collect();
    let home = dirs::home_dir().unwrap_or_default();
    let env = Environment {
        plugins: PluginHandlerConfig::from_env(&home, std::env::var_os("PATH").as_deref()),
        kubeconfig: default_kubeconfig_path(std::env::var_os("KUBECONFIG").as_deref(), &home),
        home,
    };

    // Plugins first; a replaced process never comes back here.
    let environment: Vec<(OsString, OsString)> = std::env::vars_os().collect();
    let handler = DefaultPluginHandler::new(env.plugins.clone());
    let rest = args.get(1..).unwrap_or_default();
    if let Err(e) = dispatch_plugin(&Cli::command(), rest, &handler, &environment) {
        report(&e.into());
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse_from(args);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = io::stdout().lock();
    match runtime.block_on(run(cli, &env, &mut stdout)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

/// Listing failures carry their own report; everything else gets a prefix.
fn report(error: &CliError) {
    match error {
        CliError::Plugin(PluginError::ListFailed(failure)) => eprintln!("{failure}"),
        other => eprintln!("Error: {other}"),
    }
}
