// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use crate::resources::QuantityError;
use miette::Diagnostic;
use thiserror::Error;

/// Core error type for pendscope operations
#[derive(Error, Debug, Diagnostic)]
pub enum PendscopeError {
    /// Invalid resource quantity
    #[error("Invalid quantity '{value}': {source}")]
    #[diagnostic(
        code(pendscope::invalid_quantity),
        help("Use Kubernetes quantity syntax such as '500m', '2', '128Mi' or '1Gi'")
    )]
    InvalidQuantity {
        #[allow(unused)]
        value: String,
        #[source]
        source: QuantityError,
    },

    /// Serialization error
    #[error("Serialization error: {message}")]
    #[diagnostic(
        code(pendscope::serialization_error),
        help("Ensure the document is valid JSON or YAML")
    )]
    SerializationError {
        #[allow(unused)]
        message: String,
        #[source]
        #[allow(unused)]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, PendscopeError>;

impl PendscopeError {
    /// Create an InvalidQuantity error
    pub fn invalid_quantity(value: impl Into<String>, source: QuantityError) -> Self {
        Self::InvalidQuantity {
            value: value.into(),
            source,
        }
    }

    /// Create a SerializationError
    pub fn serialization_error(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Quantity;

    #[test]
    fn test_error_creation() {
        let source = Quantity::parse("-1").unwrap_err();
        let err = PendscopeError::invalid_quantity("-1", source);
        assert!(matches!(err, PendscopeError::InvalidQuantity { .. }));
        assert!(err.to_string().contains("'-1'"));

        let err = PendscopeError::serialization_error("bad yaml", None);
        assert!(matches!(err, PendscopeError::SerializationError { .. }));
    }
}
