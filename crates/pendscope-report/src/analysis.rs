use chrono::{DateTime, Utc};
use pendscope_core::EvaluationResult;
use serde::{Deserialize, Serialize};

/// Structured report: one pass's summary plus its failing pods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAnalysis {
    pub timestamp: DateTime<Utc>,
    pub cluster_name: String,
    pub total_nodes: usize,
    pub total_pending_pods: usize,
    /// Only the results that are not schedulable, in pass order
    pub unschedulable_pods: Vec<EvaluationResult>,
    pub summary: String,
}

impl ClusterAnalysis {
    /// Build the report stamped with the current time
    pub fn build(results: &[EvaluationResult], cluster_name: &str, total_nodes: usize) -> Self {
        Self::build_at(results, cluster_name, total_nodes, Utc::now())
    }

    pub fn build_at(
        results: &[EvaluationResult],
        cluster_name: &str,
        total_nodes: usize,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let unschedulable_pods: Vec<EvaluationResult> =
            results.iter().filter(|r| !r.schedulable).cloned().collect();

        let summary = format!(
            "Found {} pending pods, {} unschedulable due to resource constraints",
            results.len(),
            unschedulable_pods.len()
        );

        Self {
            timestamp,
            cluster_name: cluster_name.to_string(),
            total_nodes,
            total_pending_pods: results.len(),
            unschedulable_pods,
            summary,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use pendscope_core::{ClusterEnvelope, EvaluationResult, PodFact, Quantity, ResourceBasis};

    pub fn envelope() -> ClusterEnvelope {
        ClusterEnvelope::new(
            Quantity::from_cpu_millicores(2000),
            Quantity::parse("4Gi").unwrap(),
        )
    }

    pub fn passing(name: &str) -> EvaluationResult {
        EvaluationResult::schedulable(
            PodFact::new(name, "default"),
            ResourceBasis::Requests,
            envelope(),
        )
    }

    pub fn failing(name: &str) -> EvaluationResult {
        EvaluationResult::unschedulable(
            PodFact::new(name, "default"),
            ResourceBasis::Requests,
            envelope(),
            "requests.cpu = 3 exceeds all node allocatable.cpu (max: 2)".to_string(),
            "Lower requests.cpu to <= 2 or add higher-CPU node".to_string(),
        )
    }
}
