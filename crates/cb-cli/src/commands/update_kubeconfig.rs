//! Update-kubeconfig command implementation.
//!
//! Fetches a cluster's kubeconfig from MCKS and merges it into the local
//! kubeconfig file.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::cli::NameArgs;
use crate::commands::delete::required_name;
use crate::error::CliError;
use crate::kubeconfig::Kubeconfig;
use crate::output::OutputFormat;
use crate::resource::Resource;
use crate::session::Session;

#[derive(Debug, Default, Deserialize)]
struct ClusterConfig {
    #[serde(default, rename = "clusterConfig")]
    cluster_config: String,
}

/// Handler for update-kubeconfig.
pub struct UpdateKubeconfigCommand<'a> {
    session: &'a Session,
    kubeconfig: PathBuf,
}

impl<'a> UpdateKubeconfigCommand<'a> {
    /// Creates a handler that updates the kubeconfig at `kubeconfig`.
    #[must_use]
    pub fn new(session: &'a Session, kubeconfig: impl Into<PathBuf>) -> Self {
        Self {
            session,
            kubeconfig: kubeconfig.into(),
        }
    }

    /// Kubeconfig file this handler writes.
    #[must_use]
    pub fn kubeconfig(&self) -> &Path {
        &self.kubeconfig
    }

    /// Executes the command.
    ///
    /// A cluster without a kubeconfig (still provisioning, or an error
    /// response) has its response body printed instead.
    ///
    /// # Errors
    ///
    /// Returns error if a required value is missing, the request fails, or
    /// either kubeconfig cannot be parsed or written.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &NameArgs,
    ) -> Result<(), CliError> {
        let resource = Resource::Cluster {
            namespace: self.session.namespace()?,
        };
        let name = required_name(args)?;

        let client = self.session.client(resource.backend())?;
        let body = client.get(&resource.item(&name)).await?;
        let cluster: ClusterConfig = serde_json::from_slice(&body).unwrap_or_default();
        if cluster.cluster_config.is_empty() {
            return format.write_body(out, &body);
        }

        self.merge(&name, &cluster.cluster_config)?;
        writeln!(out, "Success...")?;
        Ok(())
    }

    /// Merge a remote kubeconfig document under `name`.
    pub fn merge(&self, name: &str, remote: &str) -> Result<(), CliError> {
        let remote = Kubeconfig::from_yaml(remote)?;
        let mut local = Kubeconfig::load(&self.kubeconfig)?;
        local.merge(name, &remote)?;
        local.save(&self.kubeconfig)?;
        info!(context = name, path = %self.kubeconfig.display(), "kubeconfig updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use tempfile::TempDir;

    const REMOTE: &str = "
apiVersion: v1
kind: Config
clusters:
- name: kubernetes
  cluster:
    server: https://10.0.0.1:6443
users:
- name: kubernetes-admin
  user:
    token: abc
contexts:
- name: kubernetes-admin@kubernetes
  context:
    cluster: kubernetes
    user: kubernetes-admin
current-context: kubernetes-admin@kubernetes
";

    fn session(dir: &TempDir) -> Session {
        Session::new(
            ConfigFile::load(dir.path().join("config")).expect("load"),
            Some("ns-01".into()),
        )
    }

    #[test]
    fn merge_writes_renamed_entries() {
        let dir = TempDir::new().expect("tempdir");
        let session = session(&dir);
        let path = dir.path().join("kube").join("config");
        let command = UpdateKubeconfigCommand::new(&session, &path);

        command.merge("cb-cluster", REMOTE).expect("merge");

        let written = Kubeconfig::load(&path).expect("load");
        assert_eq!(written.current_context, "cb-cluster");
        assert_eq!(written.clusters[0].name, "cb-cluster-cluster");
        assert_eq!(written.users[0].name, "cb-cluster-user");
        assert_eq!(written.contexts[0].context.cluster, "cb-cluster-cluster");
    }

    #[test]
    fn cluster_config_field() {
        let cluster: ClusterConfig =
            serde_json::from_str(r#"{"name":"c","clusterConfig":"apiVersion: v1"}"#)
                .expect("cluster");
        assert_eq!(cluster.cluster_config, "apiVersion: v1");
    }

    #[tokio::test]
    async fn requires_name() {
        let dir = TempDir::new().expect("tempdir");
        let session = session(&dir);
        let mut out = Vec::new();
        let err = UpdateKubeconfigCommand::new(&session, dir.path().join("kubeconfig"))
            .execute(
                &mut out,
                &OutputFormat::default(),
                &NameArgs::default(),
            )
            .await
            .expect_err("name required");
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }
}
