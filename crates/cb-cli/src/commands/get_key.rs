//! Get-key command implementation.

use std::io::Write;

use serde::Deserialize;

use crate::cli::GetKeyArgs;
use crate::commands::delete::required_name;
use crate::commands::get::required_cluster;
use crate::error::CliError;
use crate::resource::Resource;
use crate::session::Session;

/// The part of an MCKS node that carries its SSH key.
#[derive(Debug, Default, Deserialize)]
struct NodeCredential {
    #[serde(default)]
    credential: String,
}

/// Prints the SSH private key of a cluster node.
pub struct GetKeyCommand<'a> {
    session: &'a Session,
}

impl<'a> GetKeyCommand<'a> {
    /// Creates a new get-key command handler.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Executes the get-key command. The key is written as-is.
    ///
    /// # Errors
    ///
    /// Returns error if a required value is missing, the request fails, or
    /// the response is not a node.
    pub async fn execute<W: Write>(&self, out: &mut W, args: &GetKeyArgs) -> Result<(), CliError> {
        let resource = Resource::Node {
            namespace: self.session.namespace()?,
            cluster: required_cluster(args.cluster.as_deref())?,
        };
        let name = required_name(&args.name)?;

        let client = self.session.client(resource.backend())?;
        let node: NodeCredential = client.get_json(&resource.item(&name)).await?;
        out.write_all(node.credential.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::NameArgs;
    use crate::config::ConfigFile;
    use tempfile::TempDir;

    #[test]
    fn credential_field_is_optional() {
        let node: NodeCredential =
            serde_json::from_str(r#"{"name":"w-1","credential":"-----BEGIN RSA"}"#).expect("node");
        assert_eq!(node.credential, "-----BEGIN RSA");

        let node: NodeCredential = serde_json::from_str(r#"{"name":"w-1"}"#).expect("node");
        assert!(node.credential.is_empty());
    }

    #[tokio::test]
    async fn requires_name_and_cluster() {
        let dir = TempDir::new().expect("tempdir");
        let session = Session::new(
            ConfigFile::load(dir.path().join("config")).expect("load"),
            Some("ns-01".into()),
        );
        let mut out = Vec::new();

        let err = GetKeyCommand::new(&session)
            .execute(
                &mut out,
                &GetKeyArgs {
                    name: NameArgs::default(),
                    cluster: Some("cb-cluster".into()),
                },
            )
            .await
            .expect_err("name required");
        assert_eq!(err.to_string(), "invalid argument: name is required");

        let err = GetKeyCommand::new(&session)
            .execute(
                &mut out,
                &GetKeyArgs {
                    name: NameArgs {
                        name: Some("w-1".into()),
                        name_flag: None,
                    },
                    cluster: None,
                },
            )
            .await
            .expect_err("cluster required");
        assert_eq!(err.to_string(), "invalid argument: cluster name is required");
    }
}
