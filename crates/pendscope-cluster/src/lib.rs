// Allow unused assignments for diagnostic fields - they're used by the thiserror/miette macros
#![allow(unused_assignments)]

//! Pendscope Cluster - Snapshot providers feeding the analyzer
//!
//! This crate provides:
//! - The `SnapshotProvider` capability (list nodes, list pending pods)
//! - A live provider on top of the `kube` client
//! - A file-backed provider for offline diagnosis
//! - An in-memory provider for tests
//! - Conversion from Kubernetes objects to analysis facts

pub mod convert;
pub mod error;
pub mod file;
pub mod kube_provider;
pub mod mock;
pub mod traits;

pub use convert::{node_fact_from_node, pod_fact_from_pod};
pub use error::{ClusterError, Result};
pub use file::{FileSnapshotProvider, SnapshotDocument};
pub use kube_provider::{KubeSnapshotProvider, PENDING_FIELD_SELECTOR};
pub use mock::StaticSnapshotProvider;
pub use traits::SnapshotProvider;
