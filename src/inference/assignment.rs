//! Greedy cycle-safe manager assignment
//!
//! All candidate pairs are ranked once, globally. Walking the ranking from
//! the best score down, each employee takes the first candidate whose edge
//! keeps the hierarchy acyclic. Employees never reached stay unresolved.

use super::hierarchy::{HierarchyGraph, Rejection};
use super::scorer::CandidatePair;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, info};

/// Counts of one assignment run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentStats {
    pub committed: usize,
    /// Pairs skipped because the employee already had a manager
    pub skipped_assigned: usize,
    /// Pairs discarded because the edge would close a cycle
    pub rejected_cycle: usize,
}

/// Result of one assignment run
#[derive(Debug, Clone, Default)]
pub struct Assignment {
    pub hierarchy: HierarchyGraph,
    pub stats: AssignmentStats,
}

/// Global ranking order: score descending, then employee id, then candidate id.
pub fn ranking_order(a: &CandidatePair, b: &CandidatePair) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.employee.cmp(&b.employee))
        .then_with(|| a.candidate.cmp(&b.candidate))
}

/// Consumes scored candidates into an acyclic hierarchy
#[derive(Debug, Clone, Copy, Default)]
pub struct AcyclicAssignmentEngine;

impl AcyclicAssignmentEngine {
    pub fn new() -> Self {
        Self
    }

    /// Sort pairs into the global ranking
    pub fn rank_candidates(&self, pairs: &mut [CandidatePair]) {
        pairs.sort_by(ranking_order);
    }

    /// Rank the pairs and commit greedily
    pub fn assign(&self, mut pairs: Vec<CandidatePair>) -> Assignment {
        self.rank_candidates(&mut pairs);

        let mut hierarchy = HierarchyGraph::new();
        let mut stats = AssignmentStats::default();

        for pair in &pairs {
            if hierarchy.is_assigned(pair.employee) {
                stats.skipped_assigned += 1;
                continue;
            }
            match hierarchy.try_assign(pair.employee, pair.candidate) {
                Ok(_) => stats.committed += 1,
                Err(Rejection::AlreadyAssigned { .. }) => stats.skipped_assigned += 1,
                Err(rejection) => {
                    debug!(score = pair.score, %rejection, "discarded candidate edge");
                    stats.rejected_cycle += 1;
                }
            }
        }

        info!(
            committed = stats.committed,
            skipped = stats.skipped_assigned,
            rejected_cycle = stats.rejected_cycle,
            "assigned managers"
        );

        Assignment { hierarchy, stats }
    }
}
