//! Graph algorithms module
//!
//! Algorithms are implemented in the `orgtree-graph-algorithms` crate.
//! This module provides the integration/adapter layer: it turns prediction
//! relations into directed [`GraphView`]s the algorithms can run on.

use crate::graph::{EmployeeId, ManagerAssignment};
use orgtree_graph_algorithms::NodeId as AlgoNodeId;
use rustc_hash::FxHashSet;

// Re-export algorithms
pub use orgtree_graph_algorithms::{
    common_neighbor_count, is_acyclic, simple_cycles, strongly_connected_components,
    topological_sort, weakly_connected_components, GraphView, SccResult, WccResult,
};

/// Build the directed employee -> manager view of a prediction relation.
///
/// Every distinct employee is one node, in first-seen order; repeated rows
/// add their edges to that node. Root and unresolved sentinels carry no edge,
/// and managers outside the relation are dropped since they cannot close a
/// cycle.
pub fn hierarchy_view<I>(assignments: I) -> GraphView
where
    I: IntoIterator<Item = (EmployeeId, ManagerAssignment)>,
{
    let assignments: Vec<(EmployeeId, ManagerAssignment)> = assignments.into_iter().collect();

    let mut seen = FxHashSet::default();
    let nodes: Vec<AlgoNodeId> = assignments
        .iter()
        .map(|(e, _)| e.as_i64())
        .filter(|&id| seen.insert(id))
        .collect();
    let edges = assignments
        .iter()
        .filter_map(|(e, m)| m.manager().map(|m| (e.as_i64(), m.as_i64())));

    GraphView::from_edge_list(&nodes, edges, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relation(rows: &[(i64, i64)]) -> Vec<(EmployeeId, ManagerAssignment)> {
        rows.iter()
            .map(|&(e, m)| (EmployeeId(e), ManagerAssignment::from_i64(m)))
            .collect()
    }

    #[test]
    fn test_sentinels_carry_no_edge() {
        let view = hierarchy_view(relation(&[(1, -1), (2, 1), (3, 0), (4, 99)]));
        assert_eq!(view.node_count, 4);
        assert_eq!(view.arc_count(), 1);
        assert!(is_acyclic(&view));
    }

    #[test]
    fn test_repeated_employee_is_one_node() {
        let view = hierarchy_view(relation(&[(1, -1), (2, 1), (2, 3), (3, 2)]));
        assert_eq!(view.node_count, 3);
        assert_eq!(view.index_to_node, vec![1, 2, 3]);
        assert_eq!(view.arc_count(), 3);
        assert_eq!(simple_cycles(&view, 10), vec![vec![2, 3]]);
    }

    #[test]
    fn test_cycle_is_visible() {
        let view = hierarchy_view(relation(&[(1, 2), (2, 3), (3, 1), (4, 4)]));
        assert!(!is_acyclic(&view));
        assert_eq!(simple_cycles(&view, 10), vec![vec![1, 2, 3], vec![4]]);
    }
}
