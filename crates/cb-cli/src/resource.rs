//! Backend resource addressing.

use crate::client::Backend;

/// A resource collection on one of the backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// MCKS clusters of a namespace.
    Cluster {
        /// Namespace.
        namespace: String,
    },
    /// MCKS nodes of a cluster.
    Node {
        /// Namespace.
        namespace: String,
        /// Owning cluster.
        cluster: String,
    },
    /// Spider cloud drivers.
    Driver,
    /// Spider cloud regions.
    Region,
    /// Spider cloud credentials.
    Credential,
    /// Spider connection configs.
    Connection,
    /// Tumblebug namespaces.
    Namespace,
    /// Tumblebug MCISs of a namespace.
    Mcis {
        /// Namespace.
        namespace: String,
    },
}

impl Resource {
    /// Backend serving this resource.
    #[must_use]
    pub const fn backend(&self) -> Backend {
        match self {
            Self::Cluster { .. } | Self::Node { .. } => Backend::Mcks,
            Self::Driver | Self::Region | Self::Credential | Self::Connection => Backend::Spider,
            Self::Namespace | Self::Mcis { .. } => Backend::Tumblebug,
        }
    }

    /// Path of the collection, relative to the backend root.
    #[must_use]
    pub fn collection(&self) -> String {
        match self {
            Self::Cluster { namespace } => format!("/ns/{namespace}/clusters"),
            Self::Node { namespace, cluster } => {
                format!("/ns/{namespace}/clusters/{cluster}/nodes")
            }
            Self::Driver => "/driver".to_string(),
            Self::Region => "/region".to_string(),
            Self::Credential => "/credential".to_string(),
            Self::Connection => "/connectionconfig".to_string(),
            Self::Namespace => "/ns".to_string(),
            Self::Mcis { namespace } => format!("/ns/{namespace}/mcis"),
        }
    }

    /// Path of a single item.
    #[must_use]
    pub fn item(&self, name: &str) -> String {
        format!("{}/{name}", self.collection())
    }

    /// Collection path, or the item path when a name is given.
    #[must_use]
    pub fn path(&self, name: Option<&str>) -> String {
        name.map_or_else(|| self.collection(), |n| self.item(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mcks_paths() {
        let cluster = Resource::Cluster {
            namespace: "ns-01".into(),
        };
        assert_eq!(cluster.backend(), Backend::Mcks);
        assert_eq!(cluster.collection(), "/ns/ns-01/clusters");
        assert_eq!(cluster.item("cb-cluster"), "/ns/ns-01/clusters/cb-cluster");

        let node = Resource::Node {
            namespace: "ns-01".into(),
            cluster: "cb-cluster".into(),
        };
        assert_eq!(
            node.path(Some("w-1")),
            "/ns/ns-01/clusters/cb-cluster/nodes/w-1"
        );
    }

    #[test]
    fn spider_paths() {
        assert_eq!(Resource::Connection.backend(), Backend::Spider);
        assert_eq!(Resource::Connection.path(None), "/connectionconfig");
        assert_eq!(Resource::Driver.item("aws-driver-v1.0"), "/driver/aws-driver-v1.0");
    }

    #[test]
    fn tumblebug_paths() {
        let mcis = Resource::Mcis {
            namespace: "ns-01".into(),
        };
        assert_eq!(mcis.backend(), Backend::Tumblebug);
        assert_eq!(mcis.item("mcis-01"), "/ns/ns-01/mcis/mcis-01");
        assert_eq!(Resource::Namespace.path(Some("ns-01")), "/ns/ns-01");
    }
}
