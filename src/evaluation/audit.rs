//! Cycle audit of a prediction relation
//!
//! Edges run employee -> manager; root and unresolved rows contribute no
//! edge. Strongly connected components localise the cycles, which are then
//! enumerated per component.

use crate::algo::{hierarchy_view, is_acyclic, simple_cycles, strongly_connected_components};
use crate::graph::{EmployeeId, Prediction};
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{info, warn};

/// Maximum number of cycles listed by default
pub const DEFAULT_CYCLE_LIMIT: usize = 1000;

/// Result of a cycle audit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    /// Distinct employees of the relation
    pub employees: usize,
    /// Rows repeating an employee id seen earlier
    pub duplicate_rows: usize,
    /// employee -> manager edges between employees of the relation
    pub edges: usize,
    /// Rows naming a manager that is not itself in the relation
    pub dangling_managers: usize,
    /// Strongly connected components that contain at least one cycle
    pub cyclic_components: usize,
    /// Cycles with the smallest id first, sorted
    pub cycles: Vec<Vec<EmployeeId>>,
    /// More cycles exist than were listed
    pub truncated: bool,
}

impl CycleReport {
    pub fn is_acyclic(&self) -> bool {
        self.cycles.is_empty()
    }
}

/// `a -> b -> c -> a`
pub fn format_cycle(cycle: &[EmployeeId]) -> String {
    let mut parts: Vec<String> = cycle.iter().map(EmployeeId::to_string).collect();
    if let Some(first) = cycle.first() {
        parts.push(first.to_string());
    }
    parts.join(" -> ")
}

/// Report every directed cycle of the relation, up to `limit` of them.
pub fn audit_cycles(predictions: &[Prediction], limit: usize) -> CycleReport {
    let known: FxHashSet<EmployeeId> = predictions.iter().map(|p| p.employee_id).collect();
    let duplicate_rows = predictions.len() - known.len();
    if duplicate_rows > 0 {
        warn!(duplicate_rows, "prediction relation repeats employee ids");
    }
    let dangling_managers = predictions
        .iter()
        .filter_map(|p| p.manager_id.manager())
        .filter(|m| !known.contains(m))
        .count();

    let view = hierarchy_view(predictions.iter().map(|p| (p.employee_id, p.manager_id)));
    let (cyclic_components, mut cycles) = if is_acyclic(&view) {
        (0, Vec::new())
    } else {
        let scc = strongly_connected_components(&view);
        (
            scc.cyclic_components(&view).count(),
            simple_cycles(&view, limit.saturating_add(1)),
        )
    };
    let truncated = cycles.len() > limit;
    cycles.truncate(limit);

    let report = CycleReport {
        employees: view.node_count,
        duplicate_rows,
        edges: view.arc_count(),
        dangling_managers,
        cyclic_components,
        cycles: cycles
            .into_iter()
            .map(|c| c.into_iter().map(EmployeeId::new).collect())
            .collect(),
        truncated,
    };

    if report.is_acyclic() {
        info!(employees = report.employees, edges = report.edges, "hierarchy is acyclic");
    } else {
        warn!(
            cycles = report.cycles.len(),
            components = report.cyclic_components,
            truncated = report.truncated,
            "hierarchy contains cycles"
        );
    }
    report
}
