use crate::convert::{node_fact_from_node, pod_fact_from_pod};
use crate::error::{ClusterError, Result};
use crate::traits::SnapshotProvider;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::api::{Api, ListParams};
use kube::config::Kubeconfig;
use kube::Client;
use pendscope_core::{NodeFact, PodFact};
use tracing::{debug, error, info};

/// Field selector matching pods not yet bound to a node
pub const PENDING_FIELD_SELECTOR: &str = "status.phase=Pending";

/// Snapshot provider backed by a live Kubernetes API server
pub struct KubeSnapshotProvider {
    client: Client,
    cluster_name: Option<String>,
}

impl KubeSnapshotProvider {
    /// Connect using in-cluster configuration, falling back to the kubeconfig
    /// file (`KUBECONFIG` or `~/.kube/config`)
    pub async fn connect() -> Result<Self> {
        debug!("Attempting to create Kubernetes client");

        let client = Client::try_default().await.map_err(|e| {
            error!("Failed to create Kubernetes client: {}", e);
            ClusterError::client_config(e)
        })?;

        let cluster_name = Kubeconfig::read()
            .ok()
            .and_then(|config| config.current_context);

        debug!("Successfully created Kubernetes client");
        Ok(Self::with_client(client, cluster_name))
    }

    /// Wrap an existing client
    pub fn with_client(client: Client, cluster_name: Option<String>) -> Self {
        Self {
            client,
            cluster_name,
        }
    }
}

#[async_trait]
impl SnapshotProvider for KubeSnapshotProvider {
    async fn list_nodes(&self) -> Result<Vec<NodeFact>> {
        debug!("Fetching cluster nodes");

        let nodes: Api<Node> = Api::all(self.client.clone());
        let list = nodes.list(&ListParams::default()).await.map_err(|e| {
            error!("Failed to list nodes from Kubernetes API: {}", e);
            ClusterError::list_failed("nodes", e)
        })?;

        info!(nodes_count = list.items.len(), "Successfully fetched cluster nodes");

        Ok(list.items.iter().map(node_fact_from_node).collect())
    }

    async fn list_pending_pods(&self, namespace: Option<&str>) -> Result<Vec<PodFact>> {
        let pods: Api<Pod> = match namespace {
            Some(ns) => {
                debug!(namespace = ns, "Fetching pending pods from specific namespace");
                Api::namespaced(self.client.clone(), ns)
            }
            None => {
                debug!("Fetching pending pods cluster-wide");
                Api::all(self.client.clone())
            }
        };

        let params = ListParams::default().fields(PENDING_FIELD_SELECTOR);
        let list = pods.list(&params).await.map_err(|e| {
            error!(
                namespace = namespace.unwrap_or("*"),
                "Failed to list pending pods from Kubernetes API: {}", e
            );
            ClusterError::list_failed("pods", e)
        })?;

        info!(
            namespace = namespace.unwrap_or("*"),
            pending_pods_count = list.items.len(),
            "Successfully fetched pending pods"
        );

        Ok(list.items.iter().map(pod_fact_from_pod).collect())
    }

    fn cluster_name(&self) -> Option<String> {
        self.cluster_name.clone()
    }
}
