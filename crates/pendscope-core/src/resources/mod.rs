pub mod quantities;

pub use quantities::{Quantity, QuantityError, QuantityFormat};

use k8s_openapi::api::core::v1::{NodeAffinity, Taint, Toleration};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A CPU/memory pair, as declared for a container or offered by a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcePair {
    pub cpu: Quantity,
    pub memory: Quantity,
}

impl ResourcePair {
    pub fn new(cpu: Quantity, memory: Quantity) -> Self {
        Self { cpu, memory }
    }
}

/// Declared resources of a single container.
///
/// A resource without a stated request or limit is the zero quantity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerResources {
    pub name: String,
    pub requests: ResourcePair,
    pub limits: ResourcePair,
}

impl ContainerResources {
    pub fn new(name: impl Into<String>, requests: ResourcePair, limits: ResourcePair) -> Self {
        Self {
            name: name.into(),
            requests,
            limits,
        }
    }
}

/// Resource facts about one pending pod, read once per analysis pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PodFact {
    pub name: String,
    pub namespace: String,
    /// Per-container requests and limits, in spec order
    pub containers: Vec<ContainerResources>,
    /// Carried for traceability; not consulted by the analysis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_affinity: Option<NodeAffinity>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tolerations: Vec<Toleration>,
}

impl PodFact {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Append a container (builder style)
    pub fn with_container(mut self, container: ContainerResources) -> Self {
        self.containers.push(container);
        self
    }

    /// `namespace/name`, for log lines
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Capacity facts about one node, read once per analysis pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeFact {
    pub name: String,
    pub allocatable_cpu: Quantity,
    pub allocatable_memory: Quantity,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub taints: Vec<Taint>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl NodeFact {
    pub fn new(name: impl Into<String>, allocatable_cpu: Quantity, allocatable_memory: Quantity) -> Self {
        Self {
            name: name.into(),
            allocatable_cpu,
            allocatable_memory,
            ..Default::default()
        }
    }
}
