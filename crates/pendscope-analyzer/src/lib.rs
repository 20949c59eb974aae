// Allow unused assignments for diagnostic fields - they're used by the thiserror/miette macros
#![allow(unused_assignments)]

//! Pendscope Analyzer - Resource-fit diagnosis for pending pods
//!
//! A pass runs in four steps:
//! 1. Aggregate: sum each pod's requests and limits across its containers
//! 2. Envelope: take the largest allocatable CPU and memory over all nodes
//! 3. Evaluate: compare each pod's effective demand with the envelope
//! 4. Report: one result per pod, with a reason and a suggestion on failure
//!
//! The envelope maxima are taken independently, so a pod can be reported
//! schedulable even when no single node has both its CPU and its memory.

pub mod aggregate;
pub mod analyze;
pub mod envelope;
pub mod error;
pub mod evaluate;
pub mod inspector;

pub use aggregate::aggregate;
pub use analyze::{analyze, unschedulable_count};
pub use envelope::resolve_envelope;
pub use error::{AnalyzerError, Result};
pub use evaluate::{effective_demand, evaluate, EffectiveDemand};
pub use inspector::{Inspection, Inspector, InspectorConfig};
