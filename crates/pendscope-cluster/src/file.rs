use crate::convert::{node_fact_from_node, pod_fact_from_pod};
use crate::error::{ClusterError, Result};
use crate::traits::SnapshotProvider;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node, Pod};
use pendscope_core::{NodeFact, PodFact};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A saved cluster state: raw Node and Pod objects as returned by the API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    #[serde(default)]
    pub cluster_name: Option<String>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub pods: Vec<Pod>,
}

/// Snapshot provider reading a YAML or JSON document from disk.
///
/// A pod counts as pending when its `status.phase` is `Pending` or absent.
pub struct FileSnapshotProvider {
    path: PathBuf,
    document: SnapshotDocument,
}

impl FileSnapshotProvider {
    /// Read and parse the snapshot at `path`
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let display_path = path.display().to_string();

        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ClusterError::snapshot_read(&display_path, e))?;

        let document = Self::parse(&display_path, &raw)?;
        info!(
            path = display_path.as_str(),
            nodes = document.nodes.len(),
            pods = document.pods.len(),
            "Loaded cluster snapshot"
        );

        Ok(Self { path, document })
    }

    /// Parse snapshot text; JSON is accepted as a subset of YAML
    pub fn parse(path: &str, raw: &str) -> Result<SnapshotDocument> {
        pendscope_core::from_yaml(raw).map_err(|e| ClusterError::snapshot_parse(path, e.to_string()))
    }

    pub fn from_document(path: impl Into<PathBuf>, document: SnapshotDocument) -> Self {
        Self {
            path: path.into(),
            document,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn is_pending(pod: &Pod) -> bool {
    match pod.status.as_ref().and_then(|s| s.phase.as_deref()) {
        Some(phase) => phase == "Pending",
        None => true,
    }
}

#[async_trait]
impl SnapshotProvider for FileSnapshotProvider {
    async fn list_nodes(&self) -> Result<Vec<NodeFact>> {
        Ok(self.document.nodes.iter().map(node_fact_from_node).collect())
    }

    async fn list_pending_pods(&self, namespace: Option<&str>) -> Result<Vec<PodFact>> {
        let pods: Vec<PodFact> = self
            .document
            .pods
            .iter()
            .filter(|pod| is_pending(pod))
            .map(pod_fact_from_pod)
            .filter(|fact| namespace.is_none_or(|ns| fact.namespace == ns))
            .collect();

        debug!(
            namespace = namespace.unwrap_or("*"),
            pending_pods_count = pods.len(),
            "Selected pending pods from snapshot"
        );
        Ok(pods)
    }

    fn cluster_name(&self) -> Option<String> {
        self.document.cluster_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::fixtures::{container, node, pod};
    use std::io::Write;

    const SNAPSHOT: &str = r#"
clusterName: staging
nodes:
  - metadata:
      name: worker-1
    status:
      allocatable:
        cpu: "2"
        memory: 4Gi
pods:
  - metadata:
      name: big
      namespace: batch
    spec:
      containers:
        - name: main
          resources:
            requests:
              cpu: "3"
              memory: 128Mi
    status:
      phase: Pending
  - metadata:
      name: running
      namespace: batch
    spec:
      containers:
        - name: main
    status:
      phase: Running
"#;

    #[tokio::test]
    async fn test_load_yaml_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let provider = FileSnapshotProvider::load(file.path()).await.unwrap();
        assert_eq!(provider.cluster_name(), Some("staging".to_string()));

        let nodes = provider.list_nodes().await.unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].allocatable_memory.to_string(), "4Gi");

        let pods = provider.list_pending_pods(None).await.unwrap();
        assert_eq!(pods.len(), 1);
        assert_eq!(pods[0].name, "big");
        assert_eq!(pods[0].containers[0].requests.cpu.to_string(), "3");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSnapshotProvider::load(dir.path().join("absent.yaml"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ClusterError::SnapshotRead { .. }));
    }

    #[test]
    fn test_parse_error() {
        let err = FileSnapshotProvider::parse("bad.yaml", "nodes: 12").unwrap_err();
        assert!(matches!(err, ClusterError::SnapshotParse { .. }));
    }

    #[test]
    fn test_empty_document_is_valid() {
        let doc = FileSnapshotProvider::parse("empty.json", "{}").unwrap();
        assert!(doc.nodes.is_empty());
        assert!(doc.pods.is_empty());
        assert!(doc.cluster_name.is_none());
    }

    #[tokio::test]
    async fn test_pending_selection_and_namespace_filter() {
        let document = SnapshotDocument {
            cluster_name: None,
            nodes: vec![node("n1", "4", "8Gi")],
            pods: vec![
                pod("a", "default", Some("Pending"), vec![container("c", (Some("1"), None), (None, None))]),
                pod("b", "default", None, vec![]),
                pod("c", "other", Some("Pending"), vec![]),
                pod("d", "default", Some("Succeeded"), vec![]),
            ],
        };
        let provider = FileSnapshotProvider::from_document("mem", document);

        let all: Vec<String> = provider
            .list_pending_pods(None)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(all, vec!["a", "b", "c"]);

        let scoped = provider.list_pending_pods(Some("other")).await.unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].name, "c");
        assert_eq!(provider.path(), Path::new("mem"));
    }
}
