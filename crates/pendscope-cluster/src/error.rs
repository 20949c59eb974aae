use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while reading a cluster snapshot
#[derive(Error, Debug, Diagnostic)]
pub enum ClusterError {
    /// Could not build a Kubernetes client
    #[error("Failed to create Kubernetes client: {source}")]
    #[diagnostic(
        code(pendscope::cluster::client_config),
        help("Run inside a pod with a service account, or point KUBECONFIG at a valid kubeconfig file (default: ~/.kube/config)")
    )]
    ClientConfig {
        #[source]
        source: kube::Error,
    },

    /// A list call against the API server failed
    #[error("Failed to list {resource}: {source}")]
    #[diagnostic(
        code(pendscope::cluster::list_failed),
        help("Check API server connectivity and that your credentials may list {resource} (kubectl auth can-i list {resource})")
    )]
    ListFailed {
        #[allow(unused)]
        resource: String,
        #[source]
        source: kube::Error,
    },

    /// Snapshot file could not be read
    #[error("Failed to read snapshot file '{path}': {source}")]
    #[diagnostic(
        code(pendscope::cluster::snapshot_read),
        help("Verify the path exists and is readable")
    )]
    SnapshotRead {
        #[allow(unused)]
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file is not a valid document
    #[error("Failed to parse snapshot file '{path}': {message}")]
    #[diagnostic(
        code(pendscope::cluster::snapshot_parse),
        help("The snapshot must be YAML or JSON with 'nodes' and 'pods' lists of Kubernetes objects")
    )]
    SnapshotParse {
        #[allow(unused)]
        path: String,
        #[allow(unused)]
        message: String,
    },

    /// Snapshot source is unavailable for another reason
    #[error("Cluster snapshot unavailable: {message}")]
    #[diagnostic(
        code(pendscope::cluster::unavailable),
        help("Retry once the cluster API is reachable")
    )]
    Unavailable {
        #[allow(unused)]
        message: String,
    },
}

/// Result type alias for cluster operations
pub type Result<T> = std::result::Result<T, ClusterError>;

impl ClusterError {
    pub fn client_config(source: kube::Error) -> Self {
        Self::ClientConfig { source }
    }

    pub fn list_failed(resource: impl Into<String>, source: kube::Error) -> Self {
        Self::ListFailed {
            resource: resource.into(),
            source,
        }
    }

    pub fn snapshot_read(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::SnapshotRead {
            path: path.into(),
            source,
        }
    }

    pub fn snapshot_parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SnapshotParse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
