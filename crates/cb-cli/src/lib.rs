//! # cb-cli
//!
//! `cbctl`, the Cloud-Barista multi-cloud command-line interface.
//!
//! Provides commands for:
//! - Context management (`config`)
//! - Cloud drivers, regions, credentials and connections (Spider)
//! - Namespaces and MCIS (Tumblebug)
//! - Kubernetes clusters and nodes (MCKS)
//! - External plugins (`plugin list`, and argv no built-in claims)
//!
//! # Architecture
//!
//! Every command talks REST to one of three backends whose root URLs come
//! from the current context of `~/.cbctl/config`. Argv that misses the
//! built-in tree is routed to [`cb_plugin`] before clap parses it.
//!
//! ```text
//!               ┌──────────► MCKS       (clusters, nodes)
//! ┌───────┐     │
//! │ cbctl ├─────┼──────────► Spider     (drivers, regions, credentials)
//! └───┬───┘     │
//!     │         └──────────► Tumblebug  (namespaces, MCIS)
//!     └── cbctl-<name> plugins
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod app;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod kubeconfig;
pub mod manifest;
pub mod output;
pub mod resource;
pub mod router;
pub mod session;

pub use app::{Environment, run};
pub use cli::{Cli, Commands, Format};
pub use client::{Backend, RestClient};
pub use config::{Config, ConfigFile, Context, Urls};
pub use error::CliError;
pub use output::OutputFormat;
pub use router::{BuiltinCommands, dispatch_plugin, find_command_path};
pub use session::Session;
