//! Conversion from Kubernetes API objects to analysis facts.
//!
//! Quantities that fail to parse, including negative ones, are clamped to
//! zero and logged rather than rejected, so one odd pod cannot abort a
//! cluster-wide diagnosis.

use k8s_openapi::api::core::v1::{Node, Pod};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity as K8sQuantity;
use pendscope_core::{
    parse_quantity, ContainerResources, NodeFact, PodFact, Quantity, ResourcePair,
};
use std::collections::BTreeMap;
use tracing::{debug, warn};

const UNKNOWN_NAME: &str = "unknown";
const DEFAULT_NAMESPACE: &str = "default";

/// Parse a Kubernetes quantity, falling back to zero
pub fn quantity_or_zero(raw: &K8sQuantity, owner: &str, field: &str) -> Quantity {
    match parse_quantity(&raw.0) {
        Ok(q) => q,
        Err(e) => {
            warn!(
                owner = owner,
                field = field,
                error = %e,
                "Unusable quantity, treating as zero"
            );
            Quantity::zero()
        }
    }
}

/// Read `cpu` and `memory` out of a resource map (requests, limits, allocatable)
pub fn resource_pair(
    resources: Option<&BTreeMap<String, K8sQuantity>>,
    owner: &str,
    prefix: &str,
) -> ResourcePair {
    let Some(resources) = resources else {
        return ResourcePair::default();
    };

    let read = |key: &str| {
        resources
            .get(key)
            .map(|q| quantity_or_zero(q, owner, &format!("{}.{}", prefix, key)))
            .unwrap_or_default()
    };

    ResourcePair::new(read("cpu"), read("memory"))
}

/// Build a `NodeFact` from a Node object
pub fn node_fact_from_node(node: &Node) -> NodeFact {
    let name = node
        .metadata
        .name
        .clone()
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());

    let allocatable = resource_pair(
        node.status.as_ref().and_then(|s| s.allocatable.as_ref()),
        &name,
        "allocatable",
    );

    let taints = node
        .spec
        .as_ref()
        .and_then(|s| s.taints.clone())
        .unwrap_or_default();

    let fact = NodeFact {
        allocatable_cpu: allocatable.cpu,
        allocatable_memory: allocatable.memory,
        taints,
        labels: node.metadata.labels.clone().unwrap_or_default(),
        name,
    };

    debug!(
        node_name = fact.name.as_str(),
        allocatable_cpu = %fact.allocatable_cpu,
        allocatable_memory = %fact.allocatable_memory,
        taints_count = fact.taints.len(),
        "Processed node information"
    );

    fact
}

/// Build a `PodFact` from a Pod object.
///
/// Only regular containers are read; init containers and pod overhead are
/// not part of the demand.
pub fn pod_fact_from_pod(pod: &Pod) -> PodFact {
    let name = pod
        .metadata
        .name
        .clone()
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());
    let namespace = pod
        .metadata
        .namespace
        .clone()
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
    let owner = format!("{}/{}", namespace, name);

    let Some(spec) = pod.spec.as_ref() else {
        warn!(pod = owner.as_str(), "Pod has no spec, treating as zero demand");
        return PodFact::new(name, namespace);
    };

    let containers = spec
        .containers
        .iter()
        .map(|container| {
            let resources = container.resources.as_ref();
            ContainerResources::new(
                container.name.clone(),
                resource_pair(
                    resources.and_then(|r| r.requests.as_ref()),
                    &owner,
                    "requests",
                ),
                resource_pair(resources.and_then(|r| r.limits.as_ref()), &owner, "limits"),
            )
        })
        .collect();

    let fact = PodFact {
        name,
        namespace,
        containers,
        node_affinity: spec.affinity.as_ref().and_then(|a| a.node_affinity.clone()),
        tolerations: spec.tolerations.clone().unwrap_or_default(),
    };

    debug!(
        pod = owner.as_str(),
        containers = fact.containers.len(),
        "Processed pending pod information"
    );

    fact
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use k8s_openapi::api::core::v1::{Affinity, NodeAffinity, Toleration};

    #[test]
    fn test_node_fact_from_node() {
        let fact = node_fact_from_node(&tainted_node("node1", "2", "4Gi"));

        assert_eq!(fact.name, "node1");
        assert_eq!(fact.allocatable_cpu.to_string(), "2");
        assert_eq!(fact.allocatable_memory.to_string(), "4Gi");
        assert_eq!(fact.taints.len(), 1);
        assert_eq!(fact.taints[0].key, "dedicated");
    }

    #[test]
    fn test_node_without_status_has_zero_capacity() {
        let mut node = Node::default();
        node.metadata.name = Some("bare".to_string());

        let fact = node_fact_from_node(&node);
        assert!(fact.allocatable_cpu.is_zero());
        assert!(fact.allocatable_memory.is_zero());
        assert!(fact.labels.is_empty());
    }

    #[test]
    fn test_pod_fact_keeps_per_container_values() {
        let pod = pod(
            "web",
            "shop",
            Some("Pending"),
            vec![
                container("app", (Some("100m"), Some("128Mi")), (Some("500m"), None)),
                container("sidecar", (Some("50m"), Some("64Mi")), (None, None)),
            ],
        );

        let fact = pod_fact_from_pod(&pod);
        assert_eq!(fact.qualified_name(), "shop/web");
        assert_eq!(fact.containers.len(), 2);
        assert_eq!(fact.containers[0].name, "app");
        assert_eq!(fact.containers[0].limits.cpu.to_string(), "500m");
        assert!(fact.containers[0].limits.memory.is_zero());
        assert_eq!(fact.containers[1].requests.memory.to_string(), "64Mi");
        assert!(fact.containers[1].limits.cpu.is_zero());
    }

    #[test]
    fn test_pod_fact_carries_scheduling_constraints() {
        let mut pod = pod("db", "default", Some("Pending"), vec![]);
        let spec = pod.spec.as_mut().unwrap();
        spec.tolerations = Some(vec![Toleration {
            key: Some("dedicated".to_string()),
            operator: Some("Exists".to_string()),
            ..Default::default()
        }]);
        spec.affinity = Some(Affinity {
            node_affinity: Some(NodeAffinity::default()),
            ..Default::default()
        });

        let fact = pod_fact_from_pod(&pod);
        assert_eq!(fact.tolerations.len(), 1);
        assert!(fact.node_affinity.is_some());
        assert!(fact.containers.is_empty());
    }

    #[test]
    fn test_bad_quantities_clamp_to_zero() {
        let pod = pod(
            "odd",
            "default",
            None,
            vec![container("c", (Some("-1"), Some("lots")), (None, None))],
        );

        let fact = pod_fact_from_pod(&pod);
        assert!(fact.containers[0].requests.cpu.is_zero());
        assert!(fact.containers[0].requests.memory.is_zero());
    }

    #[test]
    fn test_out_of_range_quantities_clamp_to_zero() {
        let pod = pod(
            "huge",
            "default",
            Some("Pending"),
            vec![
                container(
                    "exp",
                    (Some("1e2147483647"), Some("1E2147483640")),
                    (Some("1e40"), None),
                ),
                container(
                    "mantissa",
                    (None, Some("999999999999999999999999999999999999999Ei")),
                    (None, None),
                ),
            ],
        );

        let fact = pod_fact_from_pod(&pod);
        assert!(fact.containers[0].requests.cpu.is_zero());
        assert!(fact.containers[0].requests.memory.is_zero());
        assert!(fact.containers[0].limits.cpu.is_zero());
        assert!(fact.containers[1].requests.memory.is_zero());
    }

    #[test]
    fn test_node_with_out_of_range_allocatable() {
        let fact = node_fact_from_node(&node("big", "1e2147483645", "4Gi"));
        assert!(fact.allocatable_cpu.is_zero());
        assert_eq!(fact.allocatable_memory.to_string(), "4Gi");
    }

    #[test]
    fn test_pod_without_spec_or_metadata() {
        let fact = pod_fact_from_pod(&Pod::default());
        assert_eq!(fact.name, "unknown");
        assert_eq!(fact.namespace, "default");
        assert!(fact.containers.is_empty());
    }
}
