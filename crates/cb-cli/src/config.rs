//! Client configuration: named contexts of backend URLs and a namespace.
//!
//! Stored as YAML at `~/.cbctl/config` unless `--config` or
//! `CBCTL_CONFIG` names another file:
//!
//! ```yaml
//! current-context: local
//! contexts:
//!   local:
//!     name: local
//!     namespace: ""
//!     urls:
//!       mcks: http://localhost:1470/mcks
//!       spider: http://localhost:1024/spider
//!       tumblebug: http://localhost:1323/tumblebug
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CliError;

/// Default MCKS endpoint.
pub const DEFAULT_MCKS_URL: &str = "http://localhost:1470/mcks";
/// Default Spider endpoint.
pub const DEFAULT_SPIDER_URL: &str = "http://localhost:1024/spider";
/// Default Tumblebug endpoint.
pub const DEFAULT_TUMBLEBUG_URL: &str = "http://localhost:1323/tumblebug";

/// Name of the context created on first run.
pub const DEFAULT_CONTEXT: &str = "local";

/// Backend endpoints for one context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Urls {
    /// MCKS (Kubernetes cluster service) root URL.
    #[serde(default)]
    pub mcks: String,
    /// Spider (cloud driver broker) root URL.
    #[serde(default)]
    pub spider: String,
    /// Tumblebug (namespace/MCIS orchestrator) root URL.
    #[serde(default)]
    pub tumblebug: String,
}

impl Default for Urls {
    fn default() -> Self {
        Self {
            mcks: DEFAULT_MCKS_URL.to_string(),
            spider: DEFAULT_SPIDER_URL.to_string(),
            tumblebug: DEFAULT_TUMBLEBUG_URL.to_string(),
        }
    }
}

/// A named set of endpoints and a default namespace.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Context {
    /// Context name, mirrors its key in [`Config::contexts`].
    #[serde(default)]
    pub name: String,
    /// Namespace used when `-n` is not given.
    #[serde(default)]
    pub namespace: String,
    /// Backend endpoints.
    #[serde(default)]
    pub urls: Urls,
}

/// Whole configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Selected context.
    #[serde(rename = "current-context", default)]
    pub current_context: String,
    /// All contexts by name.
    #[serde(default)]
    pub contexts: BTreeMap<String, Context>,
}

impl Default for Config {
    fn default() -> Self {
        let local = Context {
            name: DEFAULT_CONTEXT.to_string(),
            namespace: String::new(),
            urls: Urls::default(),
        };
        Self {
            current_context: DEFAULT_CONTEXT.to_string(),
            contexts: BTreeMap::from([(DEFAULT_CONTEXT.to_string(), local)]),
        }
    }
}

impl Config {
    /// Parse configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, CliError> {
        let mut config = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| CliError::Config(format!("invalid YAML: {e}")))?
        };
        config.normalize()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, CliError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Point `current-context` at an existing context, falling back to the
    /// first one.
    pub fn normalize(&mut self) -> Result<(), CliError> {
        if !self.contexts.contains_key(&self.current_context) {
            self.current_context = self.contexts.keys().next().cloned().unwrap_or_default();
        }
        if self.current_context.is_empty() {
            return Err(CliError::Config("unable to find current context".into()));
        }
        Ok(())
    }

    /// The selected context.
    pub fn current(&self) -> Result<&Context, CliError> {
        self.contexts
            .get(&self.current_context)
            .ok_or_else(|| CliError::Config("unable to find current context".into()))
    }

    /// The selected context, mutably.
    pub fn current_mut(&mut self) -> Result<&mut Context, CliError> {
        self.contexts
            .get_mut(&self.current_context)
            .ok_or_else(|| CliError::Config("unable to find current context".into()))
    }

    /// Add a new context.
    pub fn add_context(
        &mut self,
        name: &str,
        namespace: Option<&str>,
        urls: Urls,
    ) -> Result<&Context, CliError> {
        if name.is_empty() {
            return Err(CliError::InvalidArgument("name is required".into()));
        }
        if !is_http_url(&urls.mcks) {
            return Err(CliError::InvalidArgument(format!(
                "invalid MCKS endpoint URL (value={})",
                urls.mcks
            )));
        }
        if self.contexts.contains_key(name) {
            return Err(CliError::InvalidArgument(format!(
                "context '{name}' already exists"
            )));
        }

        let context = Context {
            name: name.to_string(),
            namespace: namespace.unwrap_or_default().to_string(),
            urls,
        };
        Ok(self.contexts.entry(name.to_string()).or_insert(context))
    }

    /// Update fields of an existing context; `None` leaves a field as is.
    pub fn set_context(
        &mut self,
        name: &str,
        namespace: Option<&str>,
        mcks: Option<&str>,
        spider: Option<&str>,
        tumblebug: Option<&str>,
    ) -> Result<&Context, CliError> {
        let context = self
            .contexts
            .get_mut(name)
            .ok_or_else(|| CliError::InvalidArgument(format!("context '{name}' not found")))?;

        context.name = name.to_string();
        if let Some(ns) = namespace {
            context.namespace = ns.to_string();
        }
        if let Some(url) = mcks {
            context.urls.mcks = url.to_string();
        }
        if let Some(url) = spider {
            context.urls.spider = url.to_string();
        }
        if let Some(url) = tumblebug {
            context.urls.tumblebug = url.to_string();
        }
        Ok(context)
    }

    /// Select `name` as the current context.
    pub fn use_context(&mut self, name: &str) -> Result<(), CliError> {
        if !self.contexts.contains_key(name) {
            return Err(CliError::InvalidArgument(format!(
                "context '{name}' does not exist"
            )));
        }
        self.current_context = name.to_string();
        Ok(())
    }

    /// Remove a context, reselecting the current one when needed.
    ///
    /// The last remaining context cannot be deleted.
    pub fn delete_context(&mut self, name: &str) -> Result<(), CliError> {
        if !self.contexts.contains_key(name) {
            return Err(CliError::InvalidArgument(format!(
                "context '{name}' not found"
            )));
        }
        if self.contexts.len() <= 1 {
            return Err(CliError::InvalidArgument(format!(
                "cannot delete '{name}', it is the only context"
            )));
        }
        self.contexts.remove(name);
        if self.current_context == name {
            self.current_context = self.contexts.keys().next().cloned().unwrap_or_default();
        }
        Ok(())
    }
}

/// Whether `url` is an absolute http(s) URL.
pub fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// A configuration bound to the file it was loaded from.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    /// Loaded configuration.
    pub config: Config,
}

impl ConfigFile {
    /// Default config path under a home directory.
    #[must_use]
    pub fn default_path(home: &Path) -> PathBuf {
        home.join(".cbctl").join("config")
    }

    /// Load `path`, writing the defaults first when the file is missing.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CliError> {
        let path = path.into();
        if !path.exists() {
            debug!(path = %path.display(), "config file missing, writing defaults");
            let file = Self {
                path,
                config: Config::default(),
            };
            file.save()?;
            return Ok(file);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            CliError::Config(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        let config = Config::from_yaml(&content)?;
        debug!(path = %path.display(), context = %config.current_context, "loaded config");
        Ok(Self { path, config })
    }

    /// Write the configuration back to its file.
    pub fn save(&self) -> Result<(), CliError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, self.config.to_yaml()?)?;
        Ok(())
    }

    /// File this configuration is bound to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
