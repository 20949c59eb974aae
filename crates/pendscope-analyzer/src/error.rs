use miette::Diagnostic;
use pendscope_cluster::ClusterError;
use thiserror::Error;

/// Analyzer error type
#[derive(Error, Debug, Diagnostic)]
pub enum AnalyzerError {
    /// Pending pods could not be listed
    #[error("Failed to fetch pending pods: {source}")]
    #[diagnostic(code(pendscope::analyzer::fetch_pods_failed))]
    FetchPods {
        #[source]
        #[diagnostic_source]
        source: ClusterError,
    },

    /// Nodes could not be listed
    #[error("Failed to fetch nodes: {source}")]
    #[diagnostic(code(pendscope::analyzer::fetch_nodes_failed))]
    FetchNodes {
        #[source]
        #[diagnostic_source]
        source: ClusterError,
    },

    /// The pass was cancelled before its inputs were read
    #[error("Analysis cancelled")]
    #[diagnostic(
        code(pendscope::analyzer::cancelled),
        help("The run was interrupted; no partial results were produced")
    )]
    Cancelled,
}

/// Result type for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

impl AnalyzerError {
    pub fn fetch_pods(source: ClusterError) -> Self {
        Self::FetchPods { source }
    }

    pub fn fetch_nodes(source: ClusterError) -> Self {
        Self::FetchNodes { source }
    }
}
