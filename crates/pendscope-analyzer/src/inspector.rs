use crate::analyze::{analyze, unschedulable_count};
use crate::error::{AnalyzerError, Result};
use pendscope_cluster::SnapshotProvider;
use pendscope_core::EvaluationResult;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Configuration for one inspection pass
#[derive(Debug, Clone, Default)]
pub struct InspectorConfig {
    /// Restrict the pass to one namespace (`None` = cluster-wide)
    pub namespace: Option<String>,
    /// Judge pods on their limits where they declare any
    pub use_limits: bool,
}

/// Output of one inspection pass
#[derive(Debug, Clone)]
pub struct Inspection {
    /// One result per pending pod, in provider order
    pub results: Vec<EvaluationResult>,
    /// Number of nodes the envelope was resolved from
    pub total_nodes: usize,
}

impl Inspection {
    pub fn unschedulable_count(&self) -> usize {
        unschedulable_count(&self.results)
    }
}

/// Reads a snapshot from a provider and runs the analysis over it
pub struct Inspector {
    provider: Arc<dyn SnapshotProvider>,
    config: InspectorConfig,
}

impl Inspector {
    pub fn new(provider: Arc<dyn SnapshotProvider>, config: InspectorConfig) -> Self {
        Self { provider, config }
    }

    /// Cluster name reported by the provider, if any
    pub fn cluster_name(&self) -> Option<String> {
        self.provider.cluster_name()
    }

    /// Run one pass: pending pods first, then nodes, then the analysis.
    ///
    /// Either both lists are read and every pod is evaluated, or an error is
    /// returned and no results exist. Cancelling `token` aborts an in-flight
    /// read.
    pub async fn inspect(&self, token: &CancellationToken) -> Result<Inspection> {
        match self.config.namespace.as_deref() {
            Some(ns) => info!(namespace = ns, "Analyzing specific namespace"),
            None => info!("Analyzing cluster-wide"),
        }

        let pods = cancellable(
            token,
            self.provider
                .list_pending_pods(self.config.namespace.as_deref()),
        )
        .await?
        .map_err(AnalyzerError::fetch_pods)?;
        debug!(pending_pods = pods.len(), "Fetched pending pods");

        let nodes = cancellable(token, self.provider.list_nodes())
            .await?
            .map_err(AnalyzerError::fetch_nodes)?;
        debug!(nodes = nodes.len(), "Fetched nodes");

        let results = analyze(&pods, &nodes, self.config.use_limits);

        Ok(Inspection {
            results,
            total_nodes: nodes.len(),
        })
    }
}

async fn cancellable<F: Future>(token: &CancellationToken, fut: F) -> Result<F::Output> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(AnalyzerError::Cancelled),
        output = fut => Ok(output),
    }
}
