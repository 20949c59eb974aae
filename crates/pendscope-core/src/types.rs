use crate::resources::{PodFact, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which declared amounts a pod was judged on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceBasis {
    Requests,
    Limits,
}

impl ResourceBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceBasis::Requests => "requests",
            ResourceBasis::Limits => "limits",
        }
    }
}

impl fmt::Display for ResourceBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pod-level totals summed across all containers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedDemand {
    pub total_request_cpu: Quantity,
    pub total_request_memory: Quantity,
    pub total_limit_cpu: Quantity,
    pub total_limit_memory: Quantity,
}

impl AggregatedDemand {
    /// True when at least one limit total is non-zero
    pub fn has_limits(&self) -> bool {
        !self.total_limit_cpu.is_zero() || !self.total_limit_memory.is_zero()
    }
}

/// Largest allocatable CPU and memory offered by any node.
///
/// The two maxima are computed independently and may come from different
/// nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterEnvelope {
    pub max_allocatable_cpu: Quantity,
    pub max_allocatable_memory: Quantity,
}

impl ClusterEnvelope {
    pub fn new(max_allocatable_cpu: Quantity, max_allocatable_memory: Quantity) -> Self {
        Self {
            max_allocatable_cpu,
            max_allocatable_memory,
        }
    }
}

/// Outcome of judging one pod against the cluster envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub pod: PodFact,
    pub schedulable: bool,
    /// Present iff not schedulable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Present iff not schedulable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub basis: ResourceBasis,
    pub envelope: ClusterEnvelope,
}

impl EvaluationResult {
    /// A passing result
    pub fn schedulable(pod: PodFact, basis: ResourceBasis, envelope: ClusterEnvelope) -> Self {
        Self {
            pod,
            schedulable: true,
            reason: None,
            suggestion: None,
            basis,
            envelope,
        }
    }

    /// A failing result with its diagnosis
    pub fn unschedulable(
        pod: PodFact,
        basis: ResourceBasis,
        envelope: ClusterEnvelope,
        reason: String,
        suggestion: String,
    ) -> Self {
        Self {
            pod,
            schedulable: false,
            reason: Some(reason),
            suggestion: Some(suggestion),
            basis,
            envelope,
        }
    }

    pub fn reason(&self) -> &str {
        self.reason.as_deref().unwrap_or_default()
    }

    pub fn suggestion(&self) -> &str {
        self.suggestion.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_basis_display() {
        assert_eq!(ResourceBasis::Requests.to_string(), "requests");
        assert_eq!(ResourceBasis::Limits.to_string(), "limits");
    }

    #[test]
    fn test_has_limits() {
        let mut demand = AggregatedDemand::default();
        assert!(!demand.has_limits());

        demand.total_limit_memory = Quantity::parse("1Gi").unwrap();
        assert!(demand.has_limits());
    }

    #[test]
    fn test_evaluation_result_constructors() {
        let envelope = ClusterEnvelope::default();
        let pass = EvaluationResult::schedulable(
            PodFact::new("a", "default"),
            ResourceBasis::Requests,
            envelope.clone(),
        );
        assert!(pass.schedulable);
        assert!(pass.reason.is_none());
        assert_eq!(pass.reason(), "");

        let fail = EvaluationResult::unschedulable(
            PodFact::new("b", "default"),
            ResourceBasis::Limits,
            envelope,
            "too big".to_string(),
            "shrink it".to_string(),
        );
        assert!(!fail.schedulable);
        assert_eq!(fail.reason(), "too big");
        assert_eq!(fail.suggestion(), "shrink it");
    }
}
