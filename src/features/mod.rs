//! Per-employee feature derivation
//!
//! Seniority comes from the job title alone; the embedding comes from one
//! batch call to the injected [`Embedder`] over every employee's profile text.

pub mod seniority;

use crate::embed::{EmbedResult, Embedder};
use crate::graph::Employee;
use std::sync::Arc;
use tracing::{info, warn};

pub use seniority::{is_chief_executive, seniority_rank, SeniorityRank};

/// Features of one employee
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeFeatures {
    pub rank: SeniorityRank,
    /// `None` when no usable vector could be derived
    pub embedding: Option<Vec<f32>>,
}

impl EmployeeFeatures {
    pub fn new(rank: SeniorityRank, embedding: Option<Vec<f32>>) -> Self {
        Self { rank, embedding }
    }

    /// Features with a title-derived rank and no embedding
    pub fn from_title(title: &str) -> Self {
        Self::new(seniority_rank(title), None)
    }
}

/// Derives [`EmployeeFeatures`] for a whole employee table
#[derive(Clone)]
pub struct FeatureExtractor {
    embedder: Arc<dyn Embedder>,
}

impl FeatureExtractor {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Features for every employee, in input order.
    ///
    /// A failed batch call is an error. Individual vectors that are empty,
    /// non-finite, of an unexpected length, or missing from the reply become
    /// "no embedding".
    pub async fn extract(&self, employees: &[Employee]) -> EmbedResult<Vec<EmployeeFeatures>> {
        let texts: Vec<String> = employees.iter().map(Employee::profile_text).collect();
        let mut vectors = self.embedder.embed_batch(&texts).await?.into_iter();

        if vectors.len() != texts.len() {
            warn!(
                embedder = self.embedder.name(),
                expected = texts.len(),
                got = vectors.len(),
                "embedding batch size mismatch"
            );
        }

        let expected_dim = self.embedder.dimension();
        let mut missing = 0usize;

        let features: Vec<EmployeeFeatures> = employees
            .iter()
            .map(|employee| {
                let embedding = vectors
                    .next()
                    .filter(|v| is_usable(v, expected_dim));
                if embedding.is_none() {
                    missing += 1;
                }
                EmployeeFeatures::new(seniority_rank(&employee.job_title), embedding)
            })
            .collect();

        if missing > 0 && expected_dim.is_some() {
            warn!(missing, embedder = self.embedder.name(), "employees without usable embedding");
        }
        info!(
            employees = features.len(),
            embedded = features.len() - missing,
            embedder = self.embedder.name(),
            "extracted employee features"
        );

        Ok(features)
    }
}

fn is_usable(vector: &[f32], expected_dim: Option<usize>) -> bool {
    !vector.is_empty()
        && vector.iter().all(|v| v.is_finite())
        && expected_dim.map_or(true, |dim| vector.len() == dim)
}
