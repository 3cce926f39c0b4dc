//! # cb-plugin
//!
//! kubectl-style external plugins for `cbctl`.
//!
//! Any argv the built-in command tree does not recognize is offered to this
//! crate. The leading non-flag words become a token window that is matched
//! against executables named `cbctl-<word>-<word>...` on `PATH`, or
//! `<word>-<word>...` inside `~/.cbctl/plugins`, longest match first:
//!
//! ```text
//! cbctl foo bar baz
//!   try cbctl-foo-bar-baz     miss
//!   try cbctl-foo-bar         hit  -> exec cbctl-foo-bar baz
//! ```
//!
//! The same naming rule drives `cbctl plugin list`, which enumerates every
//! candidate and reports non-executable files, plugins shadowed by an
//! earlier one, and plugins that collide with built-in commands.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod executable;
pub mod executor;
pub mod lister;
pub mod resolver;

pub use config::{PLUGIN_DIRECTORY, PLUGIN_FILENAME_PREFIX, PluginHandlerConfig};
pub use error::PluginError;
pub use executable::{ExecCheck, Executability};
pub use executor::{Executor, SpawnAndWait, default_executor};
#[cfg(unix)]
pub use executor::ReplaceProcess;
pub use lister::{
    CommandOverrideVerifier, CommandTree, ListFailure, PathVerifier, PluginLister,
    VerificationReport, VerificationWarning,
};
pub use resolver::{
    DefaultPluginHandler, PluginHandler, ResolvedPlugin, handle_plugin_command, plugin_name,
    resolve, token_window,
};
