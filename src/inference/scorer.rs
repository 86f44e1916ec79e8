//! Manager-candidate scoring
//!
//! Every employee below the root tier, other than the designated root,
//! proposes its more senior social neighbors as manager candidates (or all
//! neighbors when none is more senior) and scores each one with a weighted
//! sum of four signals.

use crate::config::ScoringWeights;
use crate::graph::{EmployeeId, SocialGraph};
use crate::vector::optional_cosine_similarity;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

/// A scored proposal that `candidate` manages `employee`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidatePair {
    pub employee: EmployeeId,
    pub candidate: EmployeeId,
    pub score: f64,
}

impl CandidatePair {
    pub fn new(employee: impl Into<EmployeeId>, candidate: impl Into<EmployeeId>, score: f64) -> Self {
        Self {
            employee: employee.into(),
            candidate: candidate.into(),
            score,
        }
    }
}

/// Unweighted score terms of one pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub similarity: f64,
    pub shared_neighbors: usize,
    pub seniority_gap_bonus: f64,
    pub location_match: bool,
}

impl ScoreBreakdown {
    pub fn total(&self, weights: &ScoringWeights) -> f64 {
        let location = if self.location_match {
            weights.location_bonus * weights.location_match
        } else {
            0.0
        };
        self.similarity * weights.embedding_similarity
            + self.shared_neighbors as f64 * weights.common_neighbors
            + self.seniority_gap_bonus * weights.seniority_gap
            + location
    }
}

/// Neighbors considered as managers of one employee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePool {
    /// Dense indices, ascending
    pub members: Vec<usize>,
    /// True when no neighbor outranks the employee and all neighbors were taken
    pub fallback: bool,
}

/// Counts of one scoring pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoringStats {
    pub employees_scored: usize,
    pub root_tier_skipped: usize,
    /// The designated root when it is below the root tier
    pub designated_root_skipped: usize,
    pub fallback_pools: usize,
    pub without_candidates: usize,
    pub candidate_pairs: usize,
}

enum PoolOutcome {
    RootTier,
    DesignatedRoot,
    Scored { fallback: bool },
}

/// Proposes and scores manager candidates
#[derive(Debug, Clone, Default)]
pub struct CandidateScorer {
    weights: ScoringWeights,
}

impl CandidateScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Candidate pool of node `idx`, or `None` for root-tier employees
    pub fn candidate_pool(&self, graph: &SocialGraph, idx: usize) -> Option<CandidatePool> {
        let rank = graph.node(idx).rank();
        if rank.is_root_tier() {
            return None;
        }

        let neighbors = graph.neighbors(idx);
        let senior: Vec<usize> = neighbors
            .iter()
            .copied()
            .filter(|&c| graph.node(c).rank() > rank)
            .collect();

        if senior.is_empty() && !neighbors.is_empty() {
            Some(CandidatePool {
                members: neighbors.to_vec(),
                fallback: true,
            })
        } else {
            Some(CandidatePool {
                members: senior,
                fallback: false,
            })
        }
    }

    /// Score terms for employee `e` and candidate `c` (dense indices)
    pub fn breakdown(&self, graph: &SocialGraph, e: usize, c: usize) -> ScoreBreakdown {
        let employee = graph.node(e);
        let candidate = graph.node(c);

        let similarity = if self.weights.embedding_similarity > 0.0 {
            optional_cosine_similarity(employee.embedding(), candidate.embedding())
        } else {
            0.0
        };
        let shared_neighbors = if self.weights.common_neighbors > 0.0 {
            graph.shared_neighbor_count(e, c)
        } else {
            0
        };
        let seniority_gap_bonus = employee
            .rank()
            .gap_to(candidate.rank())
            .map_or(0.0, |gap| 1.0 / gap as f64);

        ScoreBreakdown {
            similarity,
            shared_neighbors,
            seniority_gap_bonus,
            // blank locations never match
            location_match: !employee.location().is_empty() && employee.location() == candidate.location(),
        }
    }

    /// Scored candidates of node `idx`, in ascending candidate order
    pub fn candidates_for(&self, graph: &SocialGraph, idx: usize) -> Vec<CandidatePair> {
        match self.candidate_pool(graph, idx) {
            Some(pool) => self.score_pool(graph, idx, &pool),
            None => Vec::new(),
        }
    }

    fn score_pool(&self, graph: &SocialGraph, idx: usize, pool: &CandidatePool) -> Vec<CandidatePair> {
        let employee = graph.node(idx).id();
        pool.members
            .iter()
            .map(|&c| {
                let score = self.breakdown(graph, idx, c).total(&self.weights);
                CandidatePair::new(employee, graph.node(c).id(), score)
            })
            .collect()
    }

    /// All candidate pairs of the graph, grouped by employee in input order.
    ///
    /// The designated `root`, when given, proposes no candidates whatever its rank.
    pub fn score_all(&self, graph: &SocialGraph, root: Option<EmployeeId>) -> (Vec<CandidatePair>, ScoringStats) {
        let root_idx = root.and_then(|id| graph.index_of(id));

        let per_employee: Vec<(PoolOutcome, Vec<CandidatePair>)> = (0..graph.node_count())
            .into_par_iter()
            .map(|idx| match self.candidate_pool(graph, idx) {
                None => (PoolOutcome::RootTier, Vec::new()),
                Some(_) if Some(idx) == root_idx => (PoolOutcome::DesignatedRoot, Vec::new()),
                Some(pool) => {
                    let candidates = self.score_pool(graph, idx, &pool);
                    (PoolOutcome::Scored { fallback: pool.fallback }, candidates)
                }
            })
            .collect();

        let mut stats = ScoringStats::default();
        let mut pairs = Vec::new();
        for (outcome, candidates) in per_employee {
            match outcome {
                PoolOutcome::RootTier => stats.root_tier_skipped += 1,
                PoolOutcome::DesignatedRoot => stats.designated_root_skipped += 1,
                PoolOutcome::Scored { fallback } => {
                    stats.employees_scored += 1;
                    if fallback {
                        stats.fallback_pools += 1;
                    }
                    if candidates.is_empty() {
                        stats.without_candidates += 1;
                    }
                }
            }
            pairs.extend(candidates);
        }
        stats.candidate_pairs = pairs.len();

        info!(
            pairs = stats.candidate_pairs,
            scored = stats.employees_scored,
            fallback = stats.fallback_pools,
            without_candidates = stats.without_candidates,
            "scored manager candidates"
        );

        (pairs, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{EmployeeFeatures, SeniorityRank};
    use crate::graph::{Connection, Employee, SocialGraphBuilder};

    fn graph(rows: &[(i64, &str, &str, Option<Vec<f32>>)], links: &[(i64, i64)]) -> SocialGraph {
        let employees: Vec<Employee> = rows
            .iter()
            .map(|(id, title, loc, _)| Employee::new(*id, *title).with_location(*loc))
            .collect();
        let features = rows
            .iter()
            .map(|(_, title, _, emb)| EmployeeFeatures::new(crate::features::seniority_rank(title), emb.clone()))
            .collect();
        let connections: Vec<Connection> = links.iter().map(|&(a, b)| Connection::new(a, b)).collect();
        SocialGraphBuilder::new(&employees, features)
            .unwrap()
            .build(&connections)
            .unwrap()
    }

    #[test]
    fn test_pool_prefers_senior_neighbors() {
        let g = graph(
            &[
                (1, "Software Engineer", "", None),
                (2, "Engineering Manager", "", None),
                (3, "Associate Analyst", "", None),
            ],
            &[(1, 2), (1, 3)],
        );
        let scorer = CandidateScorer::default();
        let pool = scorer.candidate_pool(&g, 0).unwrap();
        assert_eq!(pool.members, vec![1]);
        assert!(!pool.fallback);
    }

    #[test]
    fn test_fallback_pool_takes_all_neighbors() {
        let g = graph(
            &[
                (1, "Engineering Manager", "", None),
                (2, "Software Engineer", "", None),
                (3, "Team Lead", "", None),
            ],
            &[(1, 2), (1, 3)],
        );
        let scorer = CandidateScorer::default();
        let pool = scorer.candidate_pool(&g, 0).unwrap();
        assert_eq!(pool.members, vec![1, 2]);
        assert!(pool.fallback);

        let pairs = scorer.candidates_for(&g, 0);
        assert_eq!(pairs.len(), 2);
        // no positive gap and no shared neighbors
        assert!(pairs.iter().all(|p| p.score == 0.0));
    }

    #[test]
    fn test_root_tier_and_isolated_produce_nothing() {
        let g = graph(
            &[
                (1, "CEO", "", None),
                (2, "Software Engineer", "", None),
                (3, "Designer", "", None),
            ],
            &[(1, 2)],
        );
        let scorer = CandidateScorer::default();
        assert!(scorer.candidate_pool(&g, 0).is_none());
        assert!(scorer.candidates_for(&g, 0).is_empty());
        assert!(scorer.candidates_for(&g, 2).is_empty());

        let (pairs, stats) = scorer.score_all(&g, None);
        assert_eq!(pairs, vec![CandidatePair::new(2, 1, 0.2)]);
        assert_eq!(stats.root_tier_skipped, 1);
        assert_eq!(stats.without_candidates, 1);
        assert_eq!(stats.employees_scored, 2);
    }

    #[test]
    fn test_designated_root_proposes_nothing() {
        let g = graph(
            &[
                (1, "Engineering Manager", "", None),
                (2, "Director of Engineering", "", None),
                (3, "Software Engineer", "", None),
            ],
            &[(1, 2), (1, 3)],
        );
        let scorer = CandidateScorer::default();

        let (pairs, stats) = scorer.score_all(&g, Some(EmployeeId(1)));
        assert!(pairs.iter().all(|p| p.employee != EmployeeId(1)));
        assert_eq!(pairs.len(), 2);
        assert_eq!(stats.designated_root_skipped, 1);
        assert_eq!(stats.employees_scored, 2);

        // an id outside the graph excludes nobody
        let (pairs, stats) = scorer.score_all(&g, Some(EmployeeId(99)));
        assert!(pairs.iter().any(|p| p.employee == EmployeeId(1)));
        assert_eq!(stats.designated_root_skipped, 0);
    }

    #[test]
    fn test_score_all_matches_per_employee_scoring() {
        let g = graph(
            &[
                (1, "Software Engineer", "", None),
                (2, "Engineering Manager", "", None),
                (3, "Team Lead", "", None),
                (4, "Director of Engineering", "", None),
            ],
            &[(1, 2), (1, 3), (2, 3), (2, 4), (3, 4)],
        );
        let scorer = CandidateScorer::default();
        let expected: Vec<CandidatePair> = (0..g.node_count()).flat_map(|idx| scorer.candidates_for(&g, idx)).collect();

        let (pairs, stats) = scorer.score_all(&g, None);
        assert_eq!(pairs, expected);
        assert_eq!(stats.candidate_pairs, expected.len());
        // only the director has no senior neighbor
        assert_eq!(stats.fallback_pools, 1);
    }

    #[test]
    fn test_blank_locations_never_match() {
        let g = graph(
            &[
                (1, "Software Engineer", "", None),
                (2, "Engineering Manager", "", None),
                (3, "Senior Engineer", "Lyon", None),
                (4, "Director of Sales", "Lyon", None),
            ],
            &[(1, 2), (3, 4)],
        );
        let scorer = CandidateScorer::new(ScoringWeights {
            location_match: 1.0,
            ..ScoringWeights::default()
        });

        assert!(!scorer.breakdown(&g, 0, 1).location_match);
        // only the 1/(4-2) gap bonus remains
        assert!((scorer.candidates_for(&g, 0)[0].score - 0.5).abs() < 1e-9);

        assert!(scorer.breakdown(&g, 2, 3).location_match);
        assert!((scorer.candidates_for(&g, 2)[0].score - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_composite_score() {
        // 1 (engineer) - 2 (director), both know 3
        let g = graph(
            &[
                (1, "Software Engineer", "Paris", Some(vec![1.0, 0.0])),
                (2, "Director of Engineering", "Paris", Some(vec![1.0, 0.0])),
                (3, "Designer", "Rome", None),
            ],
            &[(1, 2), (1, 3), (2, 3)],
        );
        let weights = ScoringWeights {
            location_match: 2.0,
            location_bonus: 0.5,
            ..ScoringWeights::default()
        };
        let scorer = CandidateScorer::new(weights);
        let b = scorer.breakdown(&g, 0, 1);
        assert!((b.similarity - 1.0).abs() < 1e-9);
        assert_eq!(b.shared_neighbors, 1);
        assert!((b.seniority_gap_bonus - 1.0 / 3.0).abs() < 1e-9);
        assert!(b.location_match);

        let pairs = scorer.candidates_for(&g, 0);
        assert_eq!(pairs.len(), 1);
        let expected = 1.0 + 1.0 + 1.0 / 3.0 + 0.5 * 2.0;
        assert!((pairs[0].score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_zero_weights_disable_terms() {
        let g = graph(
            &[
                (1, "Software Engineer", "X", Some(vec![1.0, 0.0])),
                (2, "Engineering Manager", "X", Some(vec![1.0, 0.0])),
            ],
            &[(1, 2)],
        );
        let scorer = CandidateScorer::new(ScoringWeights {
            embedding_similarity: 0.0,
            common_neighbors: 0.0,
            seniority_gap: 0.0,
            location_match: 0.0,
            location_bonus: 1.0,
        });
        assert_eq!(scorer.candidates_for(&g, 0)[0].score, 0.0);
    }

    #[test]
    fn test_smaller_gap_scores_higher() {
        let g = graph(
            &[
                (1, "Software Engineer", "", None),
                (2, "Senior Engineer", "", None),
                (3, "VP of Engineering", "", None),
            ],
            &[(1, 2), (1, 3)],
        );
        let pairs = CandidateScorer::default().candidates_for(&g, 0);
        assert_eq!(g.node(1).rank(), SeniorityRank::new(3).unwrap());
        assert!(pairs[0].score > pairs[1].score);
        assert_eq!(pairs[0].candidate, EmployeeId(2));
    }
}
