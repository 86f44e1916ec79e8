//! Hierarchy inference
//!
//! - [`CandidateScorer`]: proposes and scores manager candidates per employee
//! - [`HierarchyGraph`]: transactional, always-acyclic reporting edges
//! - [`AcyclicAssignmentEngine`]: global greedy, cycle-safe assignment
//! - [`HierarchyPipeline`]: the stages wired together, with the root override

pub mod assignment;
pub mod hierarchy;
pub mod pipeline;
pub mod scorer;

pub use assignment::{ranking_order, AcyclicAssignmentEngine, Assignment, AssignmentStats};
pub use hierarchy::{HierarchyEdge, HierarchyGraph, ProposedEdge, Rejection};
pub use pipeline::{
    apply_root_override, HierarchyPipeline, PipelineError, PipelineReport, PipelineResult,
    PredictionOutcome, RootSource,
};
pub use scorer::{CandidatePair, CandidatePool, CandidateScorer, ScoreBreakdown, ScoringStats};
