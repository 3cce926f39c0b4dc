//! Per-invocation state shared by resource commands.

use crate::client::{Backend, RestClient};
use crate::config::{ConfigFile, Context};
use crate::error::CliError;

/// Loaded configuration plus the `-n` override.
#[derive(Debug, Clone)]
pub struct Session {
    file: ConfigFile,
    namespace: Option<String>,
}

impl Session {
    /// New session over a loaded config file.
    #[must_use]
    pub fn new(file: ConfigFile, namespace: Option<String>) -> Self {
        Self {
            file,
            namespace: namespace.filter(|ns| !ns.is_empty()),
        }
    }

    /// The current context.
    pub fn context(&self) -> Result<&Context, CliError> {
        self.file.config.current()
    }

    /// The effective namespace: `-n` first, then the context's.
    pub fn namespace(&self) -> Result<String, CliError> {
        if let Some(ns) = &self.namespace {
            return Ok(ns.clone());
        }
        let ns = &self.context()?.namespace;
        if ns.is_empty() {
            return Err(CliError::InvalidArgument("namespace is required".into()));
        }
        Ok(ns.clone())
    }

    /// The `-n` override, if given.
    #[must_use]
    pub fn namespace_override(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// REST client for a backend of the current context.
    pub fn client(&self, backend: Backend) -> Result<RestClient, CliError> {
        RestClient::for_backend(backend, &self.context()?.urls)
    }

    /// The underlying config file, mutably.
    pub fn file_mut(&mut self) -> &mut ConfigFile {
        &mut self.file
    }
}
