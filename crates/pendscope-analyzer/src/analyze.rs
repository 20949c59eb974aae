use crate::envelope::resolve_envelope;
use crate::evaluate::evaluate;
use pendscope_core::{EvaluationResult, NodeFact, PodFact};
use tracing::info;

/// Judge every pending pod against the cluster envelope.
///
/// The envelope is resolved once and shared by all pods in the pass; earlier
/// pods are not hypothetically placed before later ones are judged. Output
/// order follows input order. No pods yields an empty batch.
pub fn analyze(pods: &[PodFact], nodes: &[NodeFact], use_limits: bool) -> Vec<EvaluationResult> {
    if pods.is_empty() {
        return Vec::new();
    }

    let envelope = resolve_envelope(nodes);
    let results: Vec<EvaluationResult> = pods
        .iter()
        .map(|pod| evaluate(pod, &envelope, use_limits))
        .collect();

    info!(
        pods = results.len(),
        nodes = nodes.len(),
        unschedulable = unschedulable_count(&results),
        use_limits,
        "Pod schedulability analysis completed"
    );

    results
}

/// Number of results that failed the envelope check
pub fn unschedulable_count(results: &[EvaluationResult]) -> usize {
    results.iter().filter(|r| !r.schedulable).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pendscope_core::{ContainerResources, Quantity, ResourcePair};

    fn q(s: &str) -> Quantity {
        Quantity::parse(s).unwrap()
    }

    fn pod(name: &str, cpu: &str, memory: &str) -> PodFact {
        PodFact::new(name, "default").with_container(ContainerResources::new(
            "main",
            ResourcePair::new(q(cpu), q(memory)),
            ResourcePair::default(),
        ))
    }

    fn nodes() -> Vec<NodeFact> {
        vec![
            NodeFact::new("node1", q("2"), q("4Gi")),
            NodeFact::new("node2", q("4"), q("2Gi")),
        ]
    }

    #[test]
    fn test_empty_pod_list() {
        assert!(analyze(&[], &nodes(), false).is_empty());
        assert!(analyze(&[], &[], true).is_empty());
    }

    #[test]
    fn test_preserves_input_order() {
        let pods = vec![
            pod("zeta", "100m", "128Mi"),
            pod("alpha", "8", "128Mi"),
            pod("mid", "100m", "16Gi"),
        ];

        let results = analyze(&pods, &nodes(), false);
        let names: Vec<&str> = results.iter().map(|r| r.pod.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            results.iter().map(|r| r.schedulable).collect::<Vec<_>>(),
            vec![true, false, false]
        );
        assert_eq!(unschedulable_count(&results), 2);
    }

    #[test]
    fn test_shared_envelope_without_placement() {
        // Each pod alone fits; together they would not, but no placement is modelled.
        let pods = vec![pod("a", "4", "4Gi"), pod("b", "4", "4Gi"), pod("c", "4", "4Gi")];

        let results = analyze(&pods, &nodes(), false);
        assert!(results.iter().all(|r| r.schedulable));
        assert!(results
            .iter()
            .all(|r| r.envelope.max_allocatable_cpu == q("4")
                && r.envelope.max_allocatable_memory == q("4Gi")));
    }

    #[test]
    fn test_idempotent() {
        let pods = vec![pod("a", "3", "8Gi"), pod("b", "100m", "128Mi"), pod("c", "5", "1Gi")];
        let first = analyze(&pods, &nodes(), true);
        let second = analyze(&pods, &nodes(), true);

        assert_eq!(first, second);
        for (x, y) in first.iter().zip(&second) {
            assert_eq!(x.reason, y.reason);
            assert_eq!(x.suggestion, y.suggestion);
            assert_eq!(x.schedulable, y.schedulable);
        }
    }

    #[test]
    fn test_no_nodes_marks_demanding_pods_unschedulable() {
        let results = analyze(&[pod("a", "100m", "128Mi")], &[], false);
        assert_eq!(results.len(), 1);
        assert!(!results[0].schedulable);
        assert!(results[0].envelope.max_allocatable_cpu.is_zero());
    }
}
