//! Create command implementation.
//!
//! Each subcommand POSTs a JSON body. The body is read from `-f FILENAME`
//! when given, otherwise it is built from flags; flag validation only
//! applies to the flag-built form.

use std::io::Write;

use serde_json::{Value, json};
use tracing::debug;

use crate::cli::{
    CreateClusterArgs, CreateCommands, CreateConnectionArgs, CreateCredentialArgs,
    CreateDriverArgs, CreateNamespaceArgs, CreateNodeArgs, CreateRegionArgs, Csp, FileArgs,
    NameArgs, WorkerArgs,
};
use crate::commands::get::required_cluster;
use crate::error::CliError;
use crate::manifest::read_manifest;
use crate::output::OutputFormat;
use crate::resource::Resource;
use crate::session::Session;

/// Handler for create subcommands.
pub struct CreateCommand<'a> {
    session: &'a Session,
}

impl<'a> CreateCommand<'a> {
    /// Creates a new create command handler.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Executes the create subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if validation fails, the manifest cannot be read, or
    /// the request fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &CreateCommands,
    ) -> Result<(), CliError> {
        let (resource, body) = match command {
            CreateCommands::Cluster(args) => {
                let resource = Resource::Cluster {
                    namespace: self.session.namespace()?,
                };
                (resource, body_or(&args.file, || cluster_body(args)).await?)
            }
            CreateCommands::Node(args) => {
                let resource = Resource::Node {
                    namespace: self.session.namespace()?,
                    cluster: required_cluster(args.cluster.as_deref())?,
                };
                (resource, body_or(&args.file, || node_body(args)).await?)
            }
            CreateCommands::Driver(args) => {
                (Resource::Driver, body_or(&args.file, || driver_body(args)).await?)
            }
            CreateCommands::Region(args) => {
                (Resource::Region, body_or(&args.file, || region_body(args)).await?)
            }
            CreateCommands::Credential(args) => (
                Resource::Credential,
                body_or(&args.file, || credential_body(args)).await?,
            ),
            CreateCommands::Connection(args) => (
                Resource::Connection,
                body_or(&args.file, || connection_body(args)).await?,
            ),
            CreateCommands::Namespace(args) => (
                Resource::Namespace,
                body_or(&args.file, || namespace_body(args)).await?,
            ),
        };

        let client = self.session.client(resource.backend())?;
        let path = resource.collection();
        debug!(%path, backend = resource.backend().name(), "creating");
        let response = client.post(&path, &body).await?;
        format.write_body(out, &response)
    }
}

/// Manifest body when `-f` is given, otherwise the flag-built body.
async fn body_or<F>(file: &FileArgs, build: F) -> Result<Value, CliError>
where
    F: FnOnce() -> Result<Value, CliError>,
{
    match file.filename.as_deref().filter(|f| !f.is_empty()) {
        Some(filename) => read_manifest(filename).await,
        None => build(),
    }
}

fn required<'a>(value: Option<&'a str>, what: &str) -> Result<&'a str, CliError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CliError::InvalidArgument(format!("{what} is required")))
}

fn required_name(name: &NameArgs) -> Result<&str, CliError> {
    required(name.get(), "name")
}

fn required_csp(csp: Option<Csp>) -> Result<Csp, CliError> {
    csp.ok_or_else(|| CliError::InvalidArgument("csp is required".into()))
}

fn worker_pool(worker: &WorkerArgs) -> Result<Value, CliError> {
    Ok(json!([{
        "connection": required(worker.worker_connection.as_deref(), "worker connection")?,
        "count": worker.worker_count,
        "spec": required(worker.worker_spec.as_deref(), "worker spec")?,
    }]))
}

/// Cluster body with canal networking defaults.
pub fn cluster_body(args: &CreateClusterArgs) -> Result<Value, CliError> {
    let name = required_name(&args.name)?;
    let control_plane = json!([{
        "connection": required(args.control_plane_connection.as_deref(), "control-plane connection")?,
        "count": args.control_plane_count,
        "spec": required(args.control_plane_spec.as_deref(), "control-plane spec")?,
    }]);

    Ok(json!({
        "name": name,
        "label": "",
        "description": "",
        "controlPlane": control_plane,
        "worker": worker_pool(&args.worker)?,
        "config": {
            "kubernetes": {
                "networkCni": "canal",
                "podCidr": "10.244.0.0/16",
                "serviceCidr": "10.96.0.0/12",
                "serviceDnsDomain": "cluster.local",
            }
        }
    }))
}

/// Worker pool to add to an existing cluster.
pub fn node_body(args: &CreateNodeArgs) -> Result<Value, CliError> {
    Ok(json!({ "worker": worker_pool(&args.worker)? }))
}

/// Driver registration for a provider.
pub fn driver_body(args: &CreateDriverArgs) -> Result<Value, CliError> {
    let csp = required_csp(args.csp())?;
    let driver = csp.driver_name();
    Ok(json!({
        "DriverName": driver,
        "ProviderName": csp.provider_name(),
        "DriverLibFileName": format!("{driver}.so"),
    }))
}

/// Region body. Azure regions need a location and a resource group.
pub fn region_body(args: &CreateRegionArgs) -> Result<Value, CliError> {
    let csp = required_csp(args.csp)?;
    if csp == Csp::Azure {
        required(args.location.as_deref(), "location")?;
        required(args.resource_group.as_deref(), "resource-group")?;
    }

    Ok(json!({
        "RegionName": args.name.get().unwrap_or_default(),
        "ProviderName": csp.provider_name(),
        "KeyValueInfoList": key_values(&[
            ("Region", args.region.as_deref()),
            ("Zone", args.zone.as_deref()),
            ("location", args.location.as_deref()),
            ("ResourceGroup", args.resource_group.as_deref()),
        ]),
    }))
}

/// Credential body. Which fields are required depends on the provider.
pub fn credential_body(args: &CreateCredentialArgs) -> Result<Value, CliError> {
    let name = required_name(&args.name)?;
    let csp = required_csp(args.csp)?;

    let needed: Vec<(&str, Option<&String>)> = match csp {
        Csp::Aws | Csp::Alibaba | Csp::Tencent => vec![
            ("secret-id", args.secret_id.as_ref()),
            ("secret", args.secret.as_ref()),
        ],
        Csp::Gcp => vec![
            ("client-email", args.client_email.as_ref()),
            ("project-id", args.project_id.as_ref()),
            ("private-key", args.private_key.as_ref()),
        ],
        Csp::Azure => vec![
            ("secret-id", args.secret_id.as_ref()),
            ("secret", args.secret.as_ref()),
            ("tenant", args.tenant.as_ref()),
            ("subscription", args.subscription.as_ref()),
        ],
        Csp::Ibm => vec![("api-key", args.api_key.as_ref())],
        Csp::Openstack => vec![
            ("endpoint", args.endpoint.as_ref()),
            ("username", args.username.as_ref()),
            ("password", args.password.as_ref()),
            ("domain", args.domain.as_ref()),
            ("project-id", args.project_id.as_ref()),
        ],
        Csp::Cloudit => vec![
            ("endpoint", args.endpoint.as_ref()),
            ("username", args.username.as_ref()),
            ("password", args.password.as_ref()),
            ("token", args.token.as_ref()),
            ("tenant", args.tenant.as_ref()),
        ],
    };
    let missing: Vec<&str> = needed
        .iter()
        .filter(|(_, value)| value.is_none_or(String::is_empty))
        .map(|(flag, _)| *flag)
        .collect();
    if !missing.is_empty() {
        return Err(CliError::InvalidArgument(format!(
            "invalid credential flags for {}: missing --{}",
            csp.as_str(),
            missing.join(", --")
        )));
    }

    Ok(json!({
        "CredentialName": name,
        "ProviderName": csp.provider_name(),
        "KeyValueInfoList": key_values(&[
            ("ClientId", args.secret_id.as_deref()),
            ("ClientSecret", args.secret.as_deref()),
            ("ClientEmail", args.client_email.as_deref()),
            ("ProjectID", args.project_id.as_deref()),
            ("PrivateKey", args.private_key.as_deref()),
            ("TenantId", args.tenant.as_deref()),
            ("SubscriptionId", args.subscription.as_deref()),
            ("ApiKey", args.api_key.as_deref()),
            ("IdentityEndpoint", args.endpoint.as_deref()),
            ("Username", args.username.as_deref()),
            ("Password", args.password.as_deref()),
            ("DomainName", args.domain.as_deref()),
            ("AuthToken", args.token.as_deref()),
        ]),
    }))
}

/// Connection config tying a driver, credential and region together.
pub fn connection_body(args: &CreateConnectionArgs) -> Result<Value, CliError> {
    let name = required_name(&args.name)?;
    let csp = required_csp(args.csp)?;
    let credential = required(args.credential.as_deref(), "credential")?;
    let region = required(args.region.as_deref(), "region")?;

    Ok(json!({
        "ConfigName": name,
        "ProviderName": csp.provider_name(),
        "DriverName": csp.driver_name(),
        "CredentialName": credential,
        "RegionName": region,
    }))
}

/// Tumblebug namespace.
pub fn namespace_body(args: &CreateNamespaceArgs) -> Result<Value, CliError> {
    Ok(json!({
        "name": required_name(&args.name)?,
        "description": args.desc.as_deref().unwrap_or_default(),
    }))
}

/// Spider key-value list; absent values are sent as empty strings.
fn key_values(pairs: &[(&str, Option<&str>)]) -> Value {
    pairs
        .iter()
        .map(|(key, value)| json!({ "Key": key, "Value": value.unwrap_or_default() }))
        .collect()
}
