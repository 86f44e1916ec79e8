//! orgtree: reporting-hierarchy inference
//!
//! Infers who reports to whom from an undirected social-connection graph and
//! per-employee profile attributes, without any ground-truth hierarchy.
//!
//! # Architecture
//!
//! - `features`: seniority rank from the job title, profile embedding
//! - `graph`: employees, connections and the feature-annotated social graph
//! - `inference`: candidate scoring, transactional hierarchy, greedy
//!   cycle-safe assignment, and the pipeline wiring them together
//! - `persistence`: CSV relations in and out
//! - `evaluation`: accuracy against ground truth, cycle audit
//! - `http`: the prediction API
//!
//! ## Example Usage
//!
//! ```rust
//! use orgtree::embed::NullEmbedder;
//! use orgtree::graph::{Connection, Employee, EmployeeId, ManagerAssignment};
//! use orgtree::{HierarchyPipeline, OrgTreeConfig};
//! use std::sync::Arc;
//!
//! let employees = vec![
//!     Employee::new(1, "CEO"),
//!     Employee::new(2, "Engineering Manager"),
//!     Employee::new(3, "Software Engineer"),
//! ];
//! let connections = vec![Connection::new(1, 2), Connection::new(2, 3)];
//!
//! let pipeline = HierarchyPipeline::new(OrgTreeConfig::default(), Arc::new(NullEmbedder));
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let outcome = runtime.block_on(pipeline.run(&employees, &connections)).unwrap();
//!
//! assert_eq!(outcome.predictions[0].manager_id, ManagerAssignment::Root);
//! assert_eq!(outcome.predictions[2].manager_id, ManagerAssignment::Manager(EmployeeId(2)));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod embed;
pub mod evaluation;
pub mod features;
pub mod graph;
pub mod http;
pub mod inference;
pub mod persistence;
pub mod vector;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, OrgTreeConfig, RootConfig, ScoringWeights};

pub use graph::{
    Connection, Employee, EmployeeId, GraphError, GraphResult, ManagerAssignment, Prediction,
    SocialGraph, SocialGraphBuilder,
};

pub use features::{seniority_rank, EmployeeFeatures, FeatureExtractor, SeniorityRank};

pub use embed::{EmbedError, EmbedResult, Embedder};

pub use inference::{
    AcyclicAssignmentEngine, CandidatePair, CandidateScorer, HierarchyGraph, HierarchyPipeline,
    PipelineError, PipelineReport, PipelineResult, PredictionOutcome,
};

pub use persistence::{PersistenceError, PersistenceResult};

pub use evaluation::{audit_cycles, evaluate, CycleReport, EvaluationError, EvaluationReport};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
