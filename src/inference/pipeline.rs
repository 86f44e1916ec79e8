//! End-to-end hierarchy inference
//!
//! employees + connections -> features -> social graph -> root designation
//! -> scored candidates -> greedy acyclic assignment -> root override
//! -> prediction relation. The designated root takes no part in scoring or
//! assignment.

use super::assignment::{AcyclicAssignmentEngine, AssignmentStats};
use super::scorer::{CandidateScorer, ScoringStats};
use crate::config::{ConfigError, OrgTreeConfig};
use crate::embed::{self, EmbedError, Embedder};
use crate::features::{is_chief_executive, EmployeeFeatures, FeatureExtractor};
use crate::graph::{
    Connection, Employee, EmployeeId, EmployeeNode, GraphError, GraphStatistics, ManagerAssignment, Prediction,
    SocialGraph, SocialGraphBuilder,
};
use crate::persistence::PersistenceError;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Embedding error: {0}")]
    Embed(#[from] EmbedError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// How the root of a run was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RootSource {
    /// Configured employee id
    Forced,
    /// The only root-tier title in the data, or else the only chief executive
    Inferred,
    /// No root could be designated
    None,
}

/// Summary of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub embedder: String,
    pub embedded_employees: usize,
    pub graph: GraphStatistics,
    pub scoring: ScoringStats,
    pub assignment: AssignmentStats,
    pub root: Option<EmployeeId>,
    pub root_source: RootSource,
    pub resolved: usize,
    pub unresolved: usize,
    pub elapsed_ms: u64,
}

/// Predictions in input order plus the run report
#[derive(Debug, Clone, Serialize)]
pub struct PredictionOutcome {
    pub predictions: Vec<Prediction>,
    pub report: PipelineReport,
}

/// Set the root's manager to the root sentinel. Idempotent; returns false
/// when the root is not in the relation.
pub fn apply_root_override(predictions: &mut [Prediction], root: EmployeeId) -> bool {
    match predictions.iter_mut().find(|p| p.employee_id == root) {
        Some(prediction) => {
            prediction.manager_id = ManagerAssignment::Root;
            true
        }
        None => false,
    }
}

/// The inference pipeline, configured once and run per data set
#[derive(Clone)]
pub struct HierarchyPipeline {
    config: OrgTreeConfig,
    extractor: FeatureExtractor,
    scorer: CandidateScorer,
    engine: AcyclicAssignmentEngine,
}

impl HierarchyPipeline {
    /// Pipeline with an injected embedder
    pub fn new(config: OrgTreeConfig, embedder: Arc<dyn Embedder>) -> Self {
        let scorer = CandidateScorer::new(config.scoring.clone());
        Self {
            config,
            extractor: FeatureExtractor::new(embedder),
            scorer,
            engine: AcyclicAssignmentEngine::new(),
        }
    }

    /// Pipeline with the embedder named by the config
    pub fn from_config(config: OrgTreeConfig) -> PipelineResult<Self> {
        config.validate()?;
        let embedder = embed::from_config(&config.embedding)?;
        Ok(Self::new(config, embedder))
    }

    pub fn config(&self) -> &OrgTreeConfig {
        &self.config
    }

    /// Run every stage on one data set
    pub async fn run(&self, employees: &[Employee], connections: &[Connection]) -> PipelineResult<PredictionOutcome> {
        let started = Instant::now();
        info!(employees = employees.len(), connections = connections.len(), "starting hierarchy inference");

        let features = self.extractor.extract(employees).await?;
        let mut outcome = self.infer(employees, features, connections)?;

        outcome.report.elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            resolved = outcome.report.resolved,
            unresolved = outcome.report.unresolved,
            elapsed_ms = outcome.report.elapsed_ms,
            "hierarchy inference finished"
        );
        Ok(outcome)
    }

    /// The synchronous stages, on precomputed features
    pub fn infer(
        &self,
        employees: &[Employee],
        features: Vec<EmployeeFeatures>,
        connections: &[Connection],
    ) -> PipelineResult<PredictionOutcome> {
        let embedded_employees = features.iter().filter(|f| f.embedding.is_some()).count();
        let graph = SocialGraphBuilder::new(employees, features)?.build(connections)?;

        let (root, root_source) = self.resolve_root(&graph);
        let (pairs, scoring) = self.scorer.score_all(&graph, root);
        let assignment = self.engine.assign(pairs);

        let mut predictions: Vec<Prediction> = employees
            .iter()
            .map(|e| {
                let manager = assignment
                    .hierarchy
                    .manager_of(e.id)
                    .map_or(ManagerAssignment::Unresolved, ManagerAssignment::Manager);
                Prediction::new(e.id, manager)
            })
            .collect();

        if let Some(root) = root {
            apply_root_override(&mut predictions, root);
        }

        let resolved = predictions
            .iter()
            .filter(|p| matches!(p.manager_id, ManagerAssignment::Manager(_)))
            .count();
        let unresolved = predictions
            .iter()
            .filter(|p| p.manager_id == ManagerAssignment::Unresolved)
            .count();

        let report = PipelineReport {
            embedder: self.extractor.embedder().name().to_string(),
            embedded_employees,
            graph: graph.stats().clone(),
            scoring,
            assignment: assignment.stats,
            root,
            root_source,
            resolved,
            unresolved,
            elapsed_ms: 0,
        };

        Ok(PredictionOutcome { predictions, report })
    }

    fn resolve_root(&self, graph: &SocialGraph) -> (Option<EmployeeId>, RootSource) {
        if let Some(forced) = self.config.root.employee_id {
            if graph.get(forced).is_some() {
                return (Some(forced), RootSource::Forced);
            }
            warn!(root = %forced, "configured root employee is not in the data; no root override applied");
            return (None, RootSource::None);
        }

        if self.config.root.infer_from_title {
            let root_tier: Vec<&EmployeeNode> = graph.nodes().iter().filter(|n| n.rank().is_root_tier()).collect();
            match root_tier.as_slice() {
                [] => warn!("no root-tier title found; no root designated"),
                [only] => return (Some(only.id()), RootSource::Inferred),
                several => {
                    let mut chiefs = several.iter().filter(|n| is_chief_executive(&n.employee.job_title));
                    match (chiefs.next(), chiefs.next()) {
                        (Some(chief), None) => return (Some(chief.id()), RootSource::Inferred),
                        _ => warn!(
                            root_tier = several.len(),
                            "several root-tier titles and no single chief executive; no root designated"
                        ),
                    }
                }
            }
        }

        (None, RootSource::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RootConfig;
    use crate::embed::NullEmbedder;

    fn pipeline(root: RootConfig) -> HierarchyPipeline {
        let config = OrgTreeConfig {
            root,
            ..OrgTreeConfig::default()
        };
        HierarchyPipeline::new(config, Arc::new(NullEmbedder))
    }

    fn org() -> (Vec<Employee>, Vec<Connection>) {
        let employees = vec![
            Employee::new(1, "CEO"),
            Employee::new(2, "VP of Engineering"),
            Employee::new(3, "Engineering Manager"),
            Employee::new(4, "Software Engineer"),
            Employee::new(5, "Designer"),
        ];
        let connections = vec![
            Connection::new(1, 2),
            Connection::new(2, 3),
            Connection::new(3, 4),
            Connection::new(2, 4),
        ];
        (employees, connections)
    }

    fn manager_of(outcome: &PredictionOutcome, id: i64) -> ManagerAssignment {
        outcome
            .predictions
            .iter()
            .find(|p| p.employee_id == EmployeeId(id))
            .map(|p| p.manager_id)
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_infers_chain_and_root() {
        let (employees, connections) = org();
        let outcome = pipeline(RootConfig::default()).run(&employees, &connections).await.unwrap();

        let order: Vec<i64> = outcome.predictions.iter().map(|p| p.employee_id.as_i64()).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5]);

        assert_eq!(manager_of(&outcome, 1), ManagerAssignment::Root);
        assert_eq!(manager_of(&outcome, 2), ManagerAssignment::Manager(EmployeeId(1)));
        assert_eq!(manager_of(&outcome, 3), ManagerAssignment::Manager(EmployeeId(2)));
        // 3 is the closer rank and shares neighbor 2
        assert_eq!(manager_of(&outcome, 4), ManagerAssignment::Manager(EmployeeId(3)));
        assert_eq!(manager_of(&outcome, 5), ManagerAssignment::Unresolved);

        assert_eq!(outcome.report.root, Some(EmployeeId(1)));
        assert_eq!(outcome.report.root_source, RootSource::Inferred);
        assert_eq!(outcome.report.resolved, 3);
        assert_eq!(outcome.report.unresolved, 1);
        assert_eq!(outcome.report.embedder, "none");
        assert_eq!(outcome.report.embedded_employees, 0);
    }

    #[tokio::test]
    async fn test_forced_root_overrides_computed_edge() {
        let (employees, connections) = org();
        let outcome = pipeline(RootConfig {
            employee_id: Some(EmployeeId(3)),
            infer_from_title: true,
        })
        .run(&employees, &connections)
        .await
        .unwrap();

        assert_eq!(manager_of(&outcome, 3), ManagerAssignment::Root);
        // the CEO generates no candidates and is not overridden
        assert_eq!(manager_of(&outcome, 1), ManagerAssignment::Unresolved);
        assert_eq!(outcome.report.root_source, RootSource::Forced);
    }

    #[tokio::test]
    async fn test_unknown_forced_root_is_ignored() {
        let (employees, connections) = org();
        let outcome = pipeline(RootConfig {
            employee_id: Some(EmployeeId(99)),
            infer_from_title: true,
        })
        .run(&employees, &connections)
        .await
        .unwrap();
        assert_eq!(outcome.report.root, None);
        assert!(outcome.predictions.iter().all(|p| p.manager_id != ManagerAssignment::Root));
    }

    #[tokio::test]
    async fn test_chief_executive_preferred_among_root_tier() {
        let (mut employees, connections) = org();
        employees.push(Employee::new(6, "Chief Financial Officer"));
        let outcome = pipeline(RootConfig::default()).run(&employees, &connections).await.unwrap();
        assert_eq!(outcome.report.root, Some(EmployeeId(1)));
        assert_eq!(outcome.report.root_source, RootSource::Inferred);
        assert_eq!(manager_of(&outcome, 6), ManagerAssignment::Unresolved);
    }

    #[tokio::test]
    async fn test_ambiguous_root_tier_is_not_inferred() {
        let (mut employees, connections) = org();
        employees[0] = Employee::new(1, "Chief Technology Officer");
        employees.push(Employee::new(6, "Chief Financial Officer"));
        let outcome = pipeline(RootConfig::default()).run(&employees, &connections).await.unwrap();
        assert_eq!(outcome.report.root_source, RootSource::None);
        assert!(outcome.predictions.iter().all(|p| p.manager_id != ManagerAssignment::Root));
    }

    #[tokio::test]
    async fn test_forced_root_takes_no_part_in_assignment() {
        // the forced root is junior to its only neighbor
        let employees = vec![
            Employee::new(1, "Engineering Manager"),
            Employee::new(2, "Director of Engineering"),
        ];
        let connections = vec![Connection::new(1, 2)];
        let outcome = pipeline(RootConfig {
            employee_id: Some(EmployeeId(1)),
            infer_from_title: true,
        })
        .run(&employees, &connections)
        .await
        .unwrap();

        assert_eq!(manager_of(&outcome, 1), ManagerAssignment::Root);
        assert_eq!(manager_of(&outcome, 2), ManagerAssignment::Manager(EmployeeId(1)));
        assert_eq!(outcome.report.assignment.rejected_cycle, 0);
        assert_eq!(outcome.report.scoring.designated_root_skipped, 1);
        assert_eq!(outcome.report.unresolved, 0);
    }

    #[tokio::test]
    async fn test_dangling_connection_aborts() {
        let (employees, mut connections) = org();
        connections.push(Connection::new(4, 42));
        let err = pipeline(RootConfig::default()).run(&employees, &connections).await.unwrap_err();
        assert!(matches!(err, PipelineError::Graph(GraphError::UnknownEmployee { .. })));
    }

    #[test]
    fn test_root_override_is_idempotent() {
        let mut predictions = vec![
            Prediction::new(1, ManagerAssignment::Manager(EmployeeId(2))),
            Prediction::new(2, ManagerAssignment::Unresolved),
        ];
        assert!(apply_root_override(&mut predictions, EmployeeId(1)));
        let once = predictions.clone();
        assert!(apply_root_override(&mut predictions, EmployeeId(1)));
        assert_eq!(predictions, once);
        assert_eq!(predictions[0].manager_id, ManagerAssignment::Root);
        assert!(!apply_root_override(&mut predictions, EmployeeId(3)));
    }
}
