//! Get command implementation.

use std::io::Write;

use serde_json::json;

use crate::cli::GetCommands;
use crate::client::Backend;
use crate::error::CliError;
use crate::output::OutputFormat;
use crate::resource::Resource;
use crate::session::Session;

/// Handler for get subcommands.
pub struct GetCommand<'a> {
    session: &'a Session,
}

impl<'a> GetCommand<'a> {
    /// Creates a new get command handler.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Executes the get subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if a required value is missing or the request fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &GetCommands,
    ) -> Result<(), CliError> {
        let (resource, name) = match command {
            GetCommands::Spec { connection } => return self.spec(out, format, connection).await,
            GetCommands::Cluster(args) => (
                Resource::Cluster {
                    namespace: self.session.namespace()?,
                },
                args.get().map(str::to_string),
            ),
            GetCommands::Node(args) => (
                Resource::Node {
                    namespace: self.session.namespace()?,
                    cluster: required_cluster(args.cluster.as_deref())?,
                },
                args.name.get().map(str::to_string),
            ),
            GetCommands::Driver(args) => (Resource::Driver, args.driver_name()),
            GetCommands::Region(args) => (Resource::Region, args.get().map(str::to_string)),
            GetCommands::Credential(args) => {
                (Resource::Credential, args.get().map(str::to_string))
            }
            GetCommands::Connection(args) => {
                (Resource::Connection, args.get().map(str::to_string))
            }
            GetCommands::Namespace(args) => (Resource::Namespace, args.get().map(str::to_string)),
            GetCommands::Mcis(args) => (
                Resource::Mcis {
                    namespace: self.session.namespace()?,
                },
                args.get().map(str::to_string),
            ),
        };

        let client = self.session.client(resource.backend())?;
        let body = client.get(&resource.path(name.as_deref())).await?;
        format.write_body(out, &body)
    }

    /// VM specs of a connection. Spider takes the filter as a GET body.
    async fn spec<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        connection: &str,
    ) -> Result<(), CliError> {
        let client = self.session.client(Backend::Spider)?;
        let body = client
            .get_with_body("/vmspec", &json!({ "connectionName": connection }))
            .await?;
        format.write_body(out, &body)
    }
}

/// `--cluster` value, required for node-level commands.
pub(crate) fn required_cluster(cluster: Option<&str>) -> Result<String, CliError> {
    cluster
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CliError::InvalidArgument("cluster name is required".into()))
}
