use crate::error::Result;
use async_trait::async_trait;
use pendscope_core::{NodeFact, PodFact};

/// Source of the two input facts an analysis pass needs.
///
/// Implementations talk to a live cluster (`KubeSnapshotProvider`), read a
/// saved document (`FileSnapshotProvider`), or serve in-memory fixtures
/// (`StaticSnapshotProvider`) so the analyzer can be tested without a cluster.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// List every node with its allocatable capacity
    async fn list_nodes(&self) -> Result<Vec<NodeFact>>;

    /// List pods in phase Pending, cluster-wide or in a single namespace
    async fn list_pending_pods(&self, namespace: Option<&str>) -> Result<Vec<PodFact>>;

    /// Human-readable cluster name, if the source knows one
    fn cluster_name(&self) -> Option<String> {
        None
    }
}
