use crate::aggregate::aggregate;
use pendscope_core::{
    AggregatedDemand, ClusterEnvelope, EvaluationResult, PodFact, Quantity, ResourceBasis,
};
use tracing::debug;

/// The CPU/memory amounts a pod is judged on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveDemand {
    pub basis: ResourceBasis,
    pub cpu: Quantity,
    pub memory: Quantity,
}

/// Pick the amounts to compare against the envelope.
///
/// With `use_limits` and at least one non-zero limit total, limits are used
/// and labelled "limits"; a resource whose limit total is zero falls back to
/// its request total (per resource, not per pod). Otherwise requests are used.
pub fn effective_demand(demand: &AggregatedDemand, use_limits: bool) -> EffectiveDemand {
    if use_limits && demand.has_limits() {
        let pick = |limit: Quantity, request: Quantity| {
            if limit.is_zero() {
                request
            } else {
                limit
            }
        };
        EffectiveDemand {
            basis: ResourceBasis::Limits,
            cpu: pick(demand.total_limit_cpu, demand.total_request_cpu),
            memory: pick(demand.total_limit_memory, demand.total_request_memory),
        }
    } else {
        EffectiveDemand {
            basis: ResourceBasis::Requests,
            cpu: demand.total_request_cpu,
            memory: demand.total_request_memory,
        }
    }
}

/// Decide whether any node could hold this pod's demand.
///
/// Equal to capacity fits. Total over its input: never fails, never panics.
pub fn evaluate(pod: &PodFact, envelope: &ClusterEnvelope, use_limits: bool) -> EvaluationResult {
    let demand = effective_demand(&aggregate(pod), use_limits);
    let max_cpu = envelope.max_allocatable_cpu;
    let max_memory = envelope.max_allocatable_memory;

    let cpu_fits = demand.cpu <= max_cpu;
    let memory_fits = demand.memory <= max_memory;

    debug!(
        pod = pod.qualified_name().as_str(),
        basis = demand.basis.as_str(),
        cpu = %demand.cpu,
        memory = %demand.memory,
        cpu_fits,
        memory_fits,
        "Evaluated pod"
    );

    let basis = demand.basis;
    let (reason, suggestion) = match (cpu_fits, memory_fits) {
        (true, true) => {
            return EvaluationResult::schedulable(pod.clone(), basis, envelope.clone());
        }
        (false, false) => (
            format!(
                "{basis}.cpu = {} and {basis}.memory = {} exceed all node allocatable resources (max CPU: {}, max memory: {})",
                demand.cpu, demand.memory, max_cpu, max_memory
            ),
            format!(
                "Lower {basis}.cpu to <= {} and {basis}.memory to <= {}, or add nodes with higher capacity",
                max_cpu, max_memory
            ),
        ),
        (false, true) => (
            format!(
                "{basis}.cpu = {} exceeds all node allocatable.cpu (max: {})",
                demand.cpu, max_cpu
            ),
            format!("Lower {basis}.cpu to <= {} or add higher-CPU node", max_cpu),
        ),
        (true, false) => (
            format!(
                "{basis}.memory = {} exceeds all node allocatable.memory (max: {})",
                demand.memory, max_memory
            ),
            format!(
                "Lower {basis}.memory to <= {} or add higher-memory node",
                max_memory
            ),
        ),
    };

    EvaluationResult::unschedulable(pod.clone(), basis, envelope.clone(), reason, suggestion)
}
