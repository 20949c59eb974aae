//! Pendscope Core - Resource facts and result types for pending-pod diagnosis
//!
//! This crate provides:
//! - An exact resource `Quantity` (no floating point)
//! - Node and pod fact types consumed by the analyzer
//! - Evaluation result types consumed by renderers
//! - Error types with miette diagnostics
//! - Serialization helpers

pub mod error;
pub mod resources;
pub mod types;

// Re-export commonly used types
pub use error::{PendscopeError, Result};
pub use resources::{
    ContainerResources, NodeFact, PodFact, Quantity, QuantityError, QuantityFormat, ResourcePair,
};
pub use types::{AggregatedDemand, ClusterEnvelope, EvaluationResult, ResourceBasis};

// Re-export k8s-openapi types for convenience
pub use k8s_openapi;
pub use k8s_openapi::api::core::v1::{Node, Pod};

/// Parse a quantity, wrapping the failure in a diagnostic error
pub fn parse_quantity(value: &str) -> Result<Quantity> {
    Quantity::parse(value).map_err(|e| PendscopeError::invalid_quantity(value, e))
}

/// Serialize a value to pretty JSON
pub fn to_json_pretty<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        PendscopeError::serialization_error(
            format!("Failed to serialize to JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Serialize a value to YAML
pub fn to_yaml<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| {
        PendscopeError::serialization_error(
            format!("Failed to serialize to YAML: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Deserialize a value from YAML (which also accepts JSON)
pub fn from_yaml<T: for<'de> serde::Deserialize<'de>>(data: &str) -> Result<T> {
    serde_yaml::from_str(data).map_err(|e| {
        PendscopeError::serialization_error(
            format!("Failed to deserialize from YAML: {}", e),
            Some(Box::new(e)),
        )
    })
}
