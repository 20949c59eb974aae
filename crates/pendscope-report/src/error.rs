use miette::Diagnostic;
use thiserror::Error;

/// Report error type
#[derive(Error, Debug, Diagnostic)]
pub enum ReportError {
    /// The requested output format does not exist
    #[error("unsupported output format: {format}")]
    #[diagnostic(
        code(pendscope::report::unsupported_format),
        help("Supported formats are: human, json, yaml")
    )]
    UnsupportedFormat { format: String },

    /// A report or payload could not be serialized
    #[error("Serialization error: {message}")]
    #[diagnostic(
        code(pendscope::report::serialization_error),
        help("This is a bug in the report model; please report it")
    )]
    Serialization { message: String },

    /// Writing the report to its destination failed
    #[error("Failed to write report: {source}")]
    #[diagnostic(
        code(pendscope::report::write_failed),
        help("Check that the output stream is still open (e.g. the pipe reader did not exit)")
    )]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// An outbound request could not be completed
    #[error("Failed to send {target}: {source}")]
    #[diagnostic(
        code(pendscope::report::http_failed),
        help("Verify the endpoint URL and network reachability from this host")
    )]
    Http {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    /// The receiving endpoint answered with an unexpected status
    #[error("{target} returned status {status}: {body}")]
    #[diagnostic(
        code(pendscope::report::unexpected_status),
        help("The endpoint rejected the payload; check the URL and its credentials")
    )]
    UnexpectedStatus {
        target: String,
        status: u16,
        body: String,
    },

    /// Metrics could not be assembled
    #[error("Metrics error: {message}")]
    #[diagnostic(code(pendscope::report::metrics_error))]
    Metrics { message: String },

    /// An outbound request was abandoned
    #[error("Sending {target} was cancelled")]
    #[diagnostic(code(pendscope::report::cancelled))]
    Cancelled { target: String },
}

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    pub fn http(target: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            target: target.into(),
            source,
        }
    }

    pub fn unexpected_status(target: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            target: target.into(),
            status,
            body: body.into(),
        }
    }

    pub fn metrics(message: impl Into<String>) -> Self {
        Self::Metrics {
            message: message.into(),
        }
    }

    pub fn cancelled(target: impl Into<String>) -> Self {
        Self::Cancelled {
            target: target.into(),
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}

impl From<prometheus::Error> for ReportError {
    fn from(e: prometheus::Error) -> Self {
        Self::metrics(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ReportError::unsupported_format("xml");
        assert_eq!(err.to_string(), "unsupported output format: xml");

        let err = ReportError::unexpected_status("Slack API", 403, "invalid_token");
        assert_eq!(err.to_string(), "Slack API returned status 403: invalid_token");
    }
}
