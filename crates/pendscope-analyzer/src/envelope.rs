use pendscope_core::{ClusterEnvelope, NodeFact};
use tracing::debug;

/// Largest allocatable CPU and largest allocatable memory across all nodes.
///
/// Each maximum is taken independently in a single scan, so they may come
/// from different nodes. Taints, labels and affinity are ignored: this is the
/// most any one node could offer, not what a given pod may use. An empty node
/// list yields zero for both.
pub fn resolve_envelope(nodes: &[NodeFact]) -> ClusterEnvelope {
    // Only a strictly larger value replaces the running maximum, so ties keep
    // the first node's rendering.
    let envelope = nodes.iter().fold(ClusterEnvelope::default(), |mut acc, node| {
        if node.allocatable_cpu > acc.max_allocatable_cpu {
            acc.max_allocatable_cpu = node.allocatable_cpu;
        }
        if node.allocatable_memory > acc.max_allocatable_memory {
            acc.max_allocatable_memory = node.allocatable_memory;
        }
        acc
    });

    debug!(
        nodes = nodes.len(),
        max_cpu = %envelope.max_allocatable_cpu,
        max_memory = %envelope.max_allocatable_memory,
        "Resolved cluster envelope"
    );

    envelope
}
