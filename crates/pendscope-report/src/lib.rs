// Allow unused assignments for diagnostic fields - they're used by the thiserror/miette macros
#![allow(unused_assignments)]

//! Pendscope Report - Rendering and alerting for analysis results
//!
//! This crate provides:
//! - Human, JSON and YAML renderers over a pass's results
//! - The structured `ClusterAnalysis` report model
//! - A Slack incoming-webhook notifier
//! - A Prometheus push-gateway exporter
//!
//! Notifier failures are returned to the caller and never change the
//! results they were given.

pub mod analysis;
pub mod error;
pub mod format;
pub mod metrics;
pub mod redact;
pub mod reporter;
pub mod slack;

pub use analysis::ClusterAnalysis;
pub use error::{ReportError, Result};
pub use format::OutputFormat;
pub use metrics::MetricsPusher;
pub use redact::redact_webhook_url;
pub use reporter::Reporter;
pub use slack::{build_message, SlackMessage, SlackNotifier};
