//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{DEFAULT_SPIDER_URL, DEFAULT_TUMBLEBUG_URL};

/// cbctl - Cloud-Barista multi-cloud infrastructure CLI.
#[derive(Parser, Debug, Clone)]
#[command(name = "cbctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ~/.cbctl/config).
    #[arg(long, global = true, env = "CBCTL_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Yaml)]
    pub output: Format,

    /// Namespace, overrides the current context's namespace.
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// YAML output.
    #[default]
    Yaml,
    /// Pretty-printed JSON output.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the version number of cbctl.
    Version,

    /// Configuration management.
    Config {
        /// Config subcommand to execute.
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Create an object.
    Create {
        /// Object kind to create.
        #[command(subcommand)]
        command: CreateCommands,
    },

    /// Get objects.
    Get {
        /// Object kind to get.
        #[command(subcommand)]
        command: GetCommands,
    },

    /// Delete an object.
    Delete {
        /// Object kind to delete.
        #[command(subcommand)]
        command: DeleteCommands,
    },

    /// Clean up objects of a namespace.
    Clean {
        /// What to clean.
        #[arg(value_enum)]
        target: CleanTarget,
    },

    /// Get a node's SSH private key.
    GetKey(GetKeyArgs),

    /// Merge a cluster's kubeconfig into the local kubeconfig.
    UpdateKubeconfig(NameArgs),

    /// Plugin management.
    Plugin {
        /// Plugin subcommand to execute.
        #[command(subcommand)]
        command: PluginCommands,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the whole configuration.
    View,

    /// List context names, or print one context.
    GetContext {
        /// Context to print.
        name: Option<String>,
    },

    /// Add a context.
    AddContext {
        /// Context name.
        name: String,

        /// MCKS endpoint URL (e.g. http://localhost:1470/mcks).
        #[arg(long)]
        mcks: String,

        /// Spider endpoint URL.
        #[arg(long, default_value = DEFAULT_SPIDER_URL)]
        spider: String,

        /// Tumblebug endpoint URL.
        #[arg(long, default_value = DEFAULT_TUMBLEBUG_URL)]
        tumblebug: String,
    },

    /// Update a context.
    SetContext {
        /// Context name.
        name: String,

        /// MCKS endpoint URL.
        #[arg(long)]
        mcks: Option<String>,

        /// Spider endpoint URL.
        #[arg(long)]
        spider: Option<String>,

        /// Tumblebug endpoint URL.
        #[arg(long)]
        tumblebug: Option<String>,
    },

    /// Get or set the current context.
    CurrentContext {
        /// Context to select.
        name: Option<String>,
    },

    /// Set the namespace of the current context.
    SetNamespace {
        /// Namespace.
        #[arg(value_name = "NAMESPACE")]
        name: String,
    },

    /// Delete a context.
    DeleteContext {
        /// Context name.
        name: String,
    },
}

/// Object name given positionally or with `--name`.
#[derive(Args, Debug, Clone, Default)]
pub struct NameArgs {
    /// Object name.
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Object name (alternative to the positional argument).
    #[arg(long = "name", value_name = "NAME")]
    pub name_flag: Option<String>,
}

impl NameArgs {
    /// The name, positional first.
    #[must_use]
    pub fn get(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.name_flag.as_deref())
            .filter(|n| !n.is_empty())
    }
}

/// Request body from a manifest instead of flags.
#[derive(Args, Debug, Clone, Default)]
pub struct FileArgs {
    /// YAML or JSON manifest: a path, an http(s) URL, or `-` for stdin.
    #[arg(short = 'f', long = "filename", value_name = "FILENAME")]
    pub filename: Option<String>,
}

/// Cloud service providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Csp {
    /// Amazon Web Services.
    Aws,
    /// Google Cloud Platform.
    Gcp,
    /// Microsoft Azure.
    Azure,
    /// Alibaba Cloud.
    Alibaba,
    /// Tencent Cloud.
    Tencent,
    /// IBM Cloud.
    Ibm,
    /// OpenStack.
    Openstack,
    /// Cloudit.
    Cloudit,
}

impl Csp {
    /// Lower-case identifier, as used in driver names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Gcp => "gcp",
            Self::Azure => "azure",
            Self::Alibaba => "alibaba",
            Self::Tencent => "tencent",
            Self::Ibm => "ibm",
            Self::Openstack => "openstack",
            Self::Cloudit => "cloudit",
        }
    }

    /// Provider name as Spider expects it.
    #[must_use]
    pub fn provider_name(self) -> String {
        self.as_str().to_ascii_uppercase()
    }

    /// Spider driver name for this provider.
    #[must_use]
    pub fn driver_name(self) -> String {
        format!("{}-driver-v1.0", self.as_str())
    }
}

/// Create subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum CreateCommands {
    /// Create a cluster.
    Cluster(CreateClusterArgs),
    /// Add worker nodes to a cluster.
    Node(CreateNodeArgs),
    /// Create a cloud driver.
    Driver(CreateDriverArgs),
    /// Create a cloud region.
    Region(CreateRegionArgs),
    /// Create a cloud credential.
    Credential(Box<CreateCredentialArgs>),
    /// Create a cloud connection info.
    Connection(CreateConnectionArgs),
    /// Create a namespace.
    Namespace(CreateNamespaceArgs),
}

/// Node pool flags shared by cluster and node creation.
#[derive(Args, Debug, Clone)]
pub struct WorkerArgs {
    /// Connection name of worker nodes.
    #[arg(long)]
    pub worker_connection: Option<String>,

    /// Count of worker nodes.
    #[arg(long, default_value_t = 1)]
    pub worker_count: u32,

    /// Spec of worker nodes.
    #[arg(long)]
    pub worker_spec: Option<String>,
}

/// Arguments for `create cluster`.
#[derive(Args, Debug, Clone)]
pub struct CreateClusterArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub name: NameArgs,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub file: FileArgs,

    /// Connection name of control-plane nodes.
    #[arg(long)]
    pub control_plane_connection: Option<String>,

    /// Count of control-plane nodes.
    #[arg(long, default_value_t = 1)]
    pub control_plane_count: u32,

    /// Spec of control-plane nodes.
    #[arg(long)]
    pub control_plane_spec: Option<String>,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub worker: WorkerArgs,
}

/// Arguments for `create node`.
#[derive(Args, Debug, Clone)]
pub struct CreateNodeArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub file: FileArgs,

    /// Name of the cluster.
    #[arg(long)]
    pub cluster: Option<String>,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub worker: WorkerArgs,
}

/// Arguments for `create driver`.
#[derive(Args, Debug, Clone)]
pub struct CreateDriverArgs {
    /// Cloud service provider.
    #[arg(value_enum, value_name = "CSP")]
    pub provider: Option<Csp>,

    /// Cloud service provider (alternative to the positional argument).
    #[arg(long, value_enum)]
    pub csp: Option<Csp>,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub file: FileArgs,
}

impl CreateDriverArgs {
    /// The provider, positional first.
    #[must_use]
    pub fn csp(&self) -> Option<Csp> {
        self.provider.or(self.csp)
    }
}

/// Arguments for `create region`.
#[derive(Args, Debug, Clone)]
pub struct CreateRegionArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub name: NameArgs,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub file: FileArgs,

    /// Cloud service provider.
    #[arg(long, value_enum)]
    pub csp: Option<Csp>,

    /// Region.
    #[arg(long)]
    pub region: Option<String>,

    /// Zone.
    #[arg(long)]
    pub zone: Option<String>,

    /// Location (azure).
    #[arg(long)]
    pub location: Option<String>,

    /// Resource group (azure).
    #[arg(long)]
    pub resource_group: Option<String>,
}

/// Arguments for `create credential`.
#[derive(Args, Debug, Clone)]
pub struct CreateCredentialArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub name: NameArgs,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub file: FileArgs,

    /// Cloud service provider.
    #[arg(long, value_enum)]
    pub csp: Option<Csp>,

    /// Key id (aws, azure, alibaba, tencent).
    #[arg(long)]
    pub secret_id: Option<String>,

    /// Key secret (aws, azure, alibaba, tencent).
    #[arg(long)]
    pub secret: Option<String>,

    /// Subscription id (azure).
    #[arg(long)]
    pub subscription: Option<String>,

    /// Tenant id (azure, cloudit).
    #[arg(long)]
    pub tenant: Option<String>,

    /// Client email (gcp).
    #[arg(long)]
    pub client_email: Option<String>,

    /// Project id (gcp, openstack).
    #[arg(long)]
    pub project_id: Option<String>,

    /// Private key (gcp).
    #[arg(long)]
    pub private_key: Option<String>,

    /// API key (ibm).
    #[arg(long)]
    pub api_key: Option<String>,

    /// Identity endpoint (openstack, cloudit).
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Username (openstack, cloudit).
    #[arg(long)]
    pub username: Option<String>,

    /// Password (openstack, cloudit).
    #[arg(long)]
    pub password: Option<String>,

    /// Domain name (openstack).
    #[arg(long)]
    pub domain: Option<String>,

    /// Auth token (cloudit).
    #[arg(long)]
    pub token: Option<String>,
}

/// Arguments for `create connection`.
#[derive(Args, Debug, Clone)]
pub struct CreateConnectionArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub name: NameArgs,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub file: FileArgs,

    /// Cloud service provider.
    #[arg(long, value_enum)]
    pub csp: Option<Csp>,

    /// Credential name.
    #[arg(long)]
    pub credential: Option<String>,

    /// Region name.
    #[arg(long)]
    pub region: Option<String>,
}

/// Arguments for `create namespace`.
#[derive(Args, Debug, Clone)]
pub struct CreateNamespaceArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub name: NameArgs,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub file: FileArgs,

    /// Description.
    #[arg(long)]
    pub desc: Option<String>,
}

/// Get subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum GetCommands {
    /// Get clusters.
    Cluster(NameArgs),
    /// Get nodes of a cluster.
    Node(NodeArgs),
    /// Get cloud drivers.
    Driver(DriverArgs),
    /// Get cloud regions.
    Region(NameArgs),
    /// Get cloud credentials.
    Credential(NameArgs),
    /// Get cloud connection infos.
    Connection(NameArgs),
    /// Get namespaces.
    Namespace(NameArgs),
    /// Get MCISs.
    Mcis(NameArgs),
    /// Get VM specifications of a connection.
    Spec {
        /// Name of the connection info.
        #[arg(long)]
        connection: String,
    },
}

/// Delete subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum DeleteCommands {
    /// Delete a cluster.
    Cluster(NameArgs),
    /// Delete a node.
    Node(NodeArgs),
    /// Delete a cloud driver.
    Driver(DriverArgs),
    /// Delete a cloud region.
    Region(NameArgs),
    /// Delete a cloud credential.
    Credential(NameArgs),
    /// Delete a cloud connection info.
    Connection(NameArgs),
    /// Delete a namespace.
    Namespace(NameArgs),
    /// Terminate and delete an MCIS.
    Mcis(NameArgs),
}

/// A node, addressed within its cluster.
#[derive(Args, Debug, Clone)]
pub struct NodeArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub name: NameArgs,

    /// Name of the cluster.
    #[arg(long)]
    pub cluster: Option<String>,
}

/// A driver, by name or by provider.
#[derive(Args, Debug, Clone)]
pub struct DriverArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub name: NameArgs,

    /// Cloud service provider.
    #[arg(long, value_enum)]
    pub csp: Option<Csp>,
}

impl DriverArgs {
    /// Driver name: explicit, else derived from the provider.
    #[must_use]
    pub fn driver_name(&self) -> Option<String> {
        self.name
            .get()
            .map(str::to_string)
            .or_else(|| self.csp.map(Csp::driver_name))
    }
}

/// Arguments for `get-key`.
#[derive(Args, Debug, Clone)]
pub struct GetKeyArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub name: NameArgs,

    /// Name of the cluster.
    #[arg(long)]
    pub cluster: Option<String>,
}

/// Targets for `clean`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CleanTarget {
    /// MCIS and every multi-cloud infrastructure resource of a namespace.
    Mcir,
}

/// Plugin subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum PluginCommands {
    /// List all visible plugin executables.
    List {
        /// Print only plugin names, not full paths.
        #[arg(long)]
        name_only: bool,
    },
}
