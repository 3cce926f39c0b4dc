//! CLI command implementations.
//!
//! Each submodule implements one top-level command:
//! - [`config`] - Context management in the config file
//! - [`create`], [`get`], [`delete`] - Backend objects
//! - [`clean`] - Namespace cleanup
//! - [`get_key`], [`update_kubeconfig`] - Cluster access
//! - [`plugin`] - Plugin listing

pub mod clean;
pub mod config;
pub mod create;
pub mod delete;
pub mod get;
pub mod get_key;
pub mod plugin;
pub mod update_kubeconfig;
pub mod version;

pub use clean::CleanCommand;
pub use config::ConfigCommand;
pub use create::CreateCommand;
pub use delete::DeleteCommand;
pub use get::GetCommand;
pub use get_key::GetKeyCommand;
pub use plugin::PluginCommand;
pub use update_kubeconfig::UpdateKubeconfigCommand;
