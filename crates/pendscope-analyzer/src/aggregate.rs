use pendscope_core::{AggregatedDemand, ContainerResources, PodFact, Quantity};

/// Reduce a pod's per-container requests and limits to pod-level totals.
///
/// Every container contributes its requests. A container without a limit
/// for a resource contributes zero to that limit total; it does not inherit
/// the request.
pub fn aggregate(pod: &PodFact) -> AggregatedDemand {
    let total = |pick: fn(&ContainerResources) -> Quantity| -> Quantity {
        pod.containers.iter().map(pick).sum()
    };

    AggregatedDemand {
        total_request_cpu: total(|c| c.requests.cpu),
        total_request_memory: total(|c| c.requests.memory),
        total_limit_cpu: total(|c| c.limits.cpu),
        total_limit_memory: total(|c| c.limits.memory),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pendscope_core::ResourcePair;

    fn q(s: &str) -> Quantity {
        Quantity::parse(s).unwrap()
    }

    fn container(req: (&str, &str), lim: (&str, &str)) -> ContainerResources {
        ContainerResources::new(
            "c",
            ResourcePair::new(q(req.0), q(req.1)),
            ResourcePair::new(q(lim.0), q(lim.1)),
        )
    }

    #[test]
    fn test_sums_all_containers() {
        let pod = PodFact::new("p", "default")
            .with_container(container(("100m", "128Mi"), ("500m", "256Mi")))
            .with_container(container(("250m", "64Mi"), ("0", "0")));

        let demand = aggregate(&pod);
        assert_eq!(demand.total_request_cpu, q("350m"));
        assert_eq!(demand.total_request_memory, q("192Mi"));
        assert_eq!(demand.total_limit_cpu, q("500m"));
        assert_eq!(demand.total_limit_memory, q("256Mi"));
    }

    #[test]
    fn test_k_containers_sum_exactly() {
        for k in [1usize, 3, 7, 1000] {
            let mut pod = PodFact::new("p", "default");
            for _ in 0..k {
                pod = pod.with_container(container(("333m", "1Mi"), ("0", "0")));
            }
            let demand = aggregate(&pod);
            assert_eq!(demand.total_request_cpu.millis(), 333 * k as u128);
            assert_eq!(
                demand.total_request_memory.millis(),
                1024 * 1024 * 1000 * k as u128
            );
        }
    }

    #[test]
    fn test_no_containers_is_zero_demand() {
        let demand = aggregate(&PodFact::new("empty", "default"));
        assert_eq!(demand, AggregatedDemand::default());
        assert!(!demand.has_limits());
    }

    #[test]
    fn test_missing_limit_does_not_inherit_request() {
        let pod = PodFact::new("p", "default").with_container(ContainerResources::new(
            "c",
            ResourcePair::new(q("2"), q("1Gi")),
            ResourcePair::default(),
        ));

        let demand = aggregate(&pod);
        assert!(demand.total_limit_cpu.is_zero());
        assert!(demand.total_limit_memory.is_zero());
    }

    #[test]
    fn test_totals_render_in_container_units() {
        let pod = PodFact::new("p", "default")
            .with_container(container(("100m", "128Mi"), ("0", "0")))
            .with_container(container(("100m", "128Mi"), ("0", "0")));

        let demand = aggregate(&pod);
        assert_eq!(demand.total_request_cpu.to_string(), "200m");
        assert_eq!(demand.total_request_memory.to_string(), "256Mi");
    }
}
