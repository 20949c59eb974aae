use crate::error::{ClusterError, Result};
use crate::traits::SnapshotProvider;
use async_trait::async_trait;
use pendscope_core::{NodeFact, PodFact};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// In-memory snapshot provider for tests and embedding.
///
/// Serves a fixed set of facts; either list call can be made to fail.
#[derive(Default)]
pub struct StaticSnapshotProvider {
    nodes: Vec<NodeFact>,
    pods: Vec<PodFact>,
    cluster_name: Option<String>,
    fail_nodes: Option<String>,
    fail_pods: Option<String>,
    node_calls: AtomicUsize,
}

impl StaticSnapshotProvider {
    pub fn new(nodes: Vec<NodeFact>, pods: Vec<PodFact>) -> Self {
        Self {
            nodes,
            pods,
            ..Default::default()
        }
    }

    pub fn with_cluster_name(mut self, name: impl Into<String>) -> Self {
        self.cluster_name = Some(name.into());
        self
    }

    /// Make `list_nodes` fail with the given message
    pub fn failing_nodes(mut self, message: impl Into<String>) -> Self {
        self.fail_nodes = Some(message.into());
        self
    }

    /// Make `list_pending_pods` fail with the given message
    pub fn failing_pods(mut self, message: impl Into<String>) -> Self {
        self.fail_pods = Some(message.into());
        self
    }

    /// Number of `list_nodes` calls served so far
    pub fn node_calls(&self) -> usize {
        self.node_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotProvider for StaticSnapshotProvider {
    async fn list_nodes(&self) -> Result<Vec<NodeFact>> {
        self.node_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_nodes {
            return Err(ClusterError::unavailable(message.clone()));
        }
        debug!("Static: serving {} nodes", self.nodes.len());
        Ok(self.nodes.clone())
    }

    async fn list_pending_pods(&self, namespace: Option<&str>) -> Result<Vec<PodFact>> {
        if let Some(message) = &self.fail_pods {
            return Err(ClusterError::unavailable(message.clone()));
        }
        let pods: Vec<PodFact> = self
            .pods
            .iter()
            .filter(|pod| namespace.is_none_or(|ns| pod.namespace == ns))
            .cloned()
            .collect();
        debug!("Static: serving {} pending pods", pods.len());
        Ok(pods)
    }

    fn cluster_name(&self) -> Option<String> {
        self.cluster_name.clone()
    }
}
