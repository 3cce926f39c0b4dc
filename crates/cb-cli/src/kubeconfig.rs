//! Minimal kubeconfig model for merging cluster credentials.
//!
//! Only the parts needed to merge are typed; everything else is carried
//! through untouched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::CliError;

/// A kubeconfig document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Kubeconfig {
    /// API version, normally `v1`.
    #[serde(rename = "apiVersion", default = "default_api_version")]
    pub api_version: String,
    /// Kind, normally `Config`.
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Named clusters.
    #[serde(default)]
    pub clusters: Vec<NamedCluster>,
    /// Named users.
    #[serde(default)]
    pub users: Vec<NamedUser>,
    /// Named contexts.
    #[serde(default)]
    pub contexts: Vec<NamedContext>,
    /// Selected context.
    #[serde(rename = "current-context", default)]
    pub current_context: String,
    /// Any other top-level keys (preferences, extensions).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_kind() -> String {
    "Config".to_string()
}

/// A cluster entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedCluster {
    /// Entry name.
    pub name: String,
    /// Cluster details, kept opaque.
    pub cluster: Value,
}

/// A user entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedUser {
    /// Entry name.
    pub name: String,
    /// Credentials, kept opaque.
    pub user: Value,
}

/// A context entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedContext {
    /// Entry name.
    pub name: String,
    /// Cluster and user references.
    pub context: ContextRef,
}

/// References from a context to a cluster and a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextRef {
    /// Cluster entry name.
    pub cluster: String,
    /// User entry name.
    pub user: String,
    /// Other fields, e.g. `namespace`.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for Kubeconfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            clusters: Vec::new(),
            users: Vec::new(),
            contexts: Vec::new(),
            current_context: String::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl Kubeconfig {
    /// Parse a kubeconfig from YAML.
    pub fn from_yaml(content: &str) -> Result<Self, CliError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| CliError::Config(format!("cannot load kubeconfig: {e}")))
    }

    /// Load from `path`; a missing file is an empty kubeconfig.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Write to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// Merge the current context of `source` under `name`.
    ///
    /// The cluster becomes `{name}-cluster`, the user `{name}-user`, the
    /// context `{name}`, and `{name}` becomes the current context.
    pub fn merge(&mut self, name: &str, source: &Self) -> Result<(), CliError> {
        let context = source
            .contexts
            .iter()
            .find(|c| c.name == source.current_context)
            .ok_or_else(|| {
                CliError::Config(format!(
                    "kubeconfig has no context named '{}'",
                    source.current_context
                ))
            })?;
        let cluster = source
            .clusters
            .iter()
            .find(|c| c.name == context.context.cluster)
            .ok_or_else(|| {
                CliError::Config(format!(
                    "kubeconfig has no cluster named '{}'",
                    context.context.cluster
                ))
            })?;
        let user = source
            .users
            .iter()
            .find(|u| u.name == context.context.user)
            .ok_or_else(|| {
                CliError::Config(format!(
                    "kubeconfig has no user named '{}'",
                    context.context.user
                ))
            })?;

        let cluster_name = format!("{name}-cluster");
        let user_name = format!("{name}-user");

        upsert(
            &mut self.clusters,
            NamedCluster {
                name: cluster_name.clone(),
                cluster: cluster.cluster.clone(),
            },
            |c| &c.name,
        );
        upsert(
            &mut self.users,
            NamedUser {
                name: user_name.clone(),
                user: user.user.clone(),
            },
            |u| &u.name,
        );
        upsert(
            &mut self.contexts,
            NamedContext {
                name: name.to_string(),
                context: ContextRef {
                    cluster: cluster_name,
                    user: user_name,
                    extra: context.context.extra.clone(),
                },
            },
            |c| &c.name,
        );
        self.current_context = name.to_string();
        Ok(())
    }
}

fn upsert<T>(entries: &mut Vec<T>, entry: T, name: impl Fn(&T) -> &String) {
    match entries.iter_mut().find(|e| name(e) == name(&entry)) {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}

/// The kubeconfig file to update: the first `KUBECONFIG` entry, else
/// `<home>/.kube/config`.
#[must_use]
pub fn default_kubeconfig_path(kubeconfig_var: Option<&std::ffi::OsStr>, home: &Path) -> PathBuf {
    kubeconfig_var
        .and_then(|v| std::env::split_paths(v).find(|p| !p.as_os_str().is_empty()))
        .unwrap_or_else(|| home.join(".kube").join("config"))
}
