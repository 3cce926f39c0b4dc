//! Delete command implementation.

use std::io::Write;

use tracing::debug;

use crate::cli::{DeleteCommands, NameArgs};
use crate::commands::get::required_cluster;
use crate::error::CliError;
use crate::output::OutputFormat;
use crate::resource::Resource;
use crate::session::Session;

/// Handler for delete subcommands.
pub struct DeleteCommand<'a> {
    session: &'a Session,
}

impl<'a> DeleteCommand<'a> {
    /// Creates a new delete command handler.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Executes the delete subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if a required value is missing or a request fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &DeleteCommands,
    ) -> Result<(), CliError> {
        let (resource, name) = match command {
            DeleteCommands::Cluster(args) => (
                Resource::Cluster {
                    namespace: self.session.namespace()?,
                },
                required_name(args)?,
            ),
            DeleteCommands::Node(args) => (
                Resource::Node {
                    namespace: self.session.namespace()?,
                    cluster: required_cluster(args.cluster.as_deref())?,
                },
                required_name(&args.name)?,
            ),
            DeleteCommands::Driver(args) => (
                Resource::Driver,
                args.driver_name()
                    .ok_or_else(|| CliError::InvalidArgument("name is required".into()))?,
            ),
            DeleteCommands::Region(args) => (Resource::Region, required_name(args)?),
            DeleteCommands::Credential(args) => (Resource::Credential, required_name(args)?),
            DeleteCommands::Connection(args) => (Resource::Connection, required_name(args)?),
            DeleteCommands::Namespace(args) => (Resource::Namespace, required_name(args)?),
            DeleteCommands::Mcis(args) => {
                let resource = Resource::Mcis {
                    namespace: self.session.namespace()?,
                };
                return self.delete_mcis(out, format, &resource, &required_name(args)?).await;
            }
        };

        let client = self.session.client(resource.backend())?;
        let body = client.delete(&resource.item(&name)).await?;
        format.write_body(out, &body)
    }

    /// An MCIS is terminated, refined, then deleted; every response is
    /// printed.
    async fn delete_mcis<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        resource: &Resource,
        name: &str,
    ) -> Result<(), CliError> {
        let client = self.session.client(resource.backend())?;
        let item = resource.item(name);

        for path in [
            format!("{item}?action=terminate"),
            format!("{item}?action=refine"),
            item.clone(),
        ] {
            debug!(%path, "deleting mcis");
            let body = client.delete(&path).await?;
            format.write_body(out, &body)?;
        }
        Ok(())
    }
}

/// Name given positionally or with `--name`, required for deletes.
pub(crate) fn required_name(args: &NameArgs) -> Result<String, CliError> {
    args.get()
        .map(str::to_string)
        .ok_or_else(|| CliError::InvalidArgument("name is required".into()))
}
