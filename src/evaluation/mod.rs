//! Accuracy evaluation and cycle auditing of prediction relations

pub mod audit;

pub use audit::{audit_cycles, format_cycle, CycleReport, DEFAULT_CYCLE_LIMIT};

use crate::graph::{EmployeeId, ManagerAssignment, Prediction};
use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// Evaluation errors
#[derive(Error, Debug, PartialEq)]
pub enum EvaluationError {
    #[error("Employee {id} appears more than once in the {relation} relation")]
    DuplicateEmployee { relation: &'static str, id: EmployeeId },
}

pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// Accuracy of a prediction relation against ground truth
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// `correct / evaluable`, 0 when nothing is evaluable
    pub accuracy: f64,
    pub correct: usize,
    /// Joined rows whose true manager is not the root sentinel
    pub evaluable: usize,
    /// Evaluable rows predicted as unresolved
    pub unresolved: usize,
    /// Rows present in both relations
    pub matched: usize,
    pub prediction_rows: usize,
    pub ground_truth_rows: usize,
}

fn index_by_employee(
    rows: &[Prediction],
    relation: &'static str,
) -> EvaluationResult<FxHashMap<EmployeeId, ManagerAssignment>> {
    let mut index = FxHashMap::default();
    index.reserve(rows.len());
    for row in rows {
        if index.insert(row.employee_id, row.manager_id).is_some() {
            return Err(EvaluationError::DuplicateEmployee {
                relation,
                id: row.employee_id,
            });
        }
    }
    Ok(index)
}

/// Compare predictions with ground truth, joined on employee id.
pub fn evaluate(predictions: &[Prediction], ground_truth: &[Prediction]) -> EvaluationResult<EvaluationReport> {
    let predicted = index_by_employee(predictions, "predictions")?;
    index_by_employee(ground_truth, "ground truth")?;

    let mut report = EvaluationReport {
        accuracy: 0.0,
        correct: 0,
        evaluable: 0,
        unresolved: 0,
        matched: 0,
        prediction_rows: predictions.len(),
        ground_truth_rows: ground_truth.len(),
    };

    for truth in ground_truth {
        let Some(&prediction) = predicted.get(&truth.employee_id) else {
            continue;
        };
        report.matched += 1;
        if truth.manager_id == ManagerAssignment::Root {
            continue;
        }
        report.evaluable += 1;
        if prediction == truth.manager_id {
            report.correct += 1;
        }
        if prediction == ManagerAssignment::Unresolved {
            report.unresolved += 1;
        }
    }

    if report.evaluable == 0 {
        warn!(matched = report.matched, "no evaluable employees; accuracy is 0");
    } else {
        report.accuracy = report.correct as f64 / report.evaluable as f64;
    }

    info!(
        accuracy = report.accuracy,
        correct = report.correct,
        evaluable = report.evaluable,
        "evaluated predictions"
    );
    Ok(report)
}
