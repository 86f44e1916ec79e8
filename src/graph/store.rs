//! In-memory social graph of employees
//!
//! Nodes are all employees (isolated ones included) with their features;
//! edges are the deduplicated, undirected connections without self-loops.
//! Adjacency lives in a CSR [`GraphView`] with sorted neighbor slices.

use super::employee::{Connection, Employee};
use super::types::EmployeeId;
use crate::features::{EmployeeFeatures, SeniorityRank};
use orgtree_graph_algorithms::{common_neighbor_count, weakly_connected_components, GraphView};
use rustc_hash::FxHashSet;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while building the social graph
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Employee id {0} is invalid: ids must be positive integers")]
    InvalidEmployeeId(EmployeeId),

    #[error("Employee {0} appears more than once")]
    DuplicateEmployee(EmployeeId),

    #[error("Connection ({a}, {b}) references unknown employee {missing}")]
    UnknownEmployee {
        a: EmployeeId,
        b: EmployeeId,
        missing: EmployeeId,
    },

    #[error("Feature count {got} does not match employee count {expected}")]
    FeatureCountMismatch { expected: usize, got: usize },
}

pub type GraphResult<T> = Result<T, GraphError>;

/// One node of the social graph
#[derive(Debug, Clone)]
pub struct EmployeeNode {
    pub employee: Employee,
    pub features: EmployeeFeatures,
}

impl EmployeeNode {
    pub fn id(&self) -> EmployeeId {
        self.employee.id
    }

    pub fn rank(&self) -> SeniorityRank {
        self.features.rank
    }

    pub fn embedding(&self) -> Option<&[f32]> {
        self.features.embedding.as_deref()
    }

    pub fn location(&self) -> &str {
        &self.employee.location
    }
}

/// Counts gathered while building the graph
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphStatistics {
    pub employees: usize,
    pub connections: usize,
    pub duplicate_connections: usize,
    pub self_loops: usize,
    pub isolated_employees: usize,
    pub components: usize,
}

/// Undirected, feature-annotated employee graph
#[derive(Debug)]
pub struct SocialGraph {
    nodes: Vec<EmployeeNode>,
    view: GraphView,
    stats: GraphStatistics,
}

impl SocialGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct undirected edges
    pub fn edge_count(&self) -> usize {
        self.view.arc_count() / 2
    }

    /// Nodes in input order; node `i` has dense index `i`
    pub fn nodes(&self) -> &[EmployeeNode] {
        &self.nodes
    }

    pub fn node(&self, idx: usize) -> &EmployeeNode {
        &self.nodes[idx]
    }

    pub fn index_of(&self, id: EmployeeId) -> Option<usize> {
        self.view.index_of(id.as_i64())
    }

    pub fn get(&self, id: EmployeeId) -> Option<&EmployeeNode> {
        self.index_of(id).map(|idx| &self.nodes[idx])
    }

    /// Dense indices of the neighbors of node `idx`, ascending
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        self.view.successors(idx)
    }

    /// Employees adjacent to both `u` and `v`
    pub fn shared_neighbor_count(&self, u: usize, v: usize) -> usize {
        common_neighbor_count(&self.view, u, v)
    }

    pub fn view(&self) -> &GraphView {
        &self.view
    }

    pub fn stats(&self) -> &GraphStatistics {
        &self.stats
    }
}

/// Assembles a [`SocialGraph`] from employees, their features and connections
pub struct SocialGraphBuilder {
    nodes: Vec<EmployeeNode>,
}

impl SocialGraphBuilder {
    /// Pair each employee with its features (same order, same length).
    pub fn new(employees: &[Employee], features: Vec<EmployeeFeatures>) -> GraphResult<Self> {
        if employees.len() != features.len() {
            return Err(GraphError::FeatureCountMismatch {
                expected: employees.len(),
                got: features.len(),
            });
        }

        let mut seen: FxHashSet<EmployeeId> = FxHashSet::default();
        let mut nodes = Vec::with_capacity(employees.len());
        for (employee, features) in employees.iter().zip(features) {
            if !employee.id.is_valid() {
                return Err(GraphError::InvalidEmployeeId(employee.id));
            }
            if !seen.insert(employee.id) {
                return Err(GraphError::DuplicateEmployee(employee.id));
            }
            nodes.push(EmployeeNode {
                employee: employee.clone(),
                features,
            });
        }

        Ok(Self { nodes })
    }

    /// Add the connections and freeze the graph.
    ///
    /// A connection naming an employee outside the table is rejected;
    /// duplicates and self-loops are dropped and counted.
    pub fn build(self, connections: &[Connection]) -> GraphResult<SocialGraph> {
        let ids: Vec<i64> = self.nodes.iter().map(|n| n.id().as_i64()).collect();
        let known: FxHashSet<EmployeeId> = self.nodes.iter().map(EmployeeNode::id).collect();

        let mut stats = GraphStatistics {
            employees: self.nodes.len(),
            ..GraphStatistics::default()
        };
        let mut unique: FxHashSet<(EmployeeId, EmployeeId)> = FxHashSet::default();
        let mut edges: Vec<(i64, i64)> = Vec::with_capacity(connections.len());

        for connection in connections {
            for endpoint in [connection.a, connection.b] {
                if !known.contains(&endpoint) {
                    return Err(GraphError::UnknownEmployee {
                        a: connection.a,
                        b: connection.b,
                        missing: endpoint,
                    });
                }
            }
            if connection.is_self_loop() {
                stats.self_loops += 1;
                continue;
            }
            let (a, b) = connection.normalized();
            if !unique.insert((a, b)) {
                stats.duplicate_connections += 1;
                continue;
            }
            edges.push((a.as_i64(), b.as_i64()));
        }

        let view = GraphView::from_edge_list(&ids, edges, false);
        stats.connections = view.arc_count() / 2;
        stats.isolated_employees = (0..view.node_count).filter(|&i| view.out_degree(i) == 0).count();
        stats.components = weakly_connected_components(&view).component_count();

        if stats.duplicate_connections > 0 || stats.self_loops > 0 {
            warn!(
                duplicates = stats.duplicate_connections,
                self_loops = stats.self_loops,
                "dropped degenerate connections"
            );
        }
        info!(
            employees = stats.employees,
            connections = stats.connections,
            isolated = stats.isolated_employees,
            components = stats.components,
            "built social graph"
        );

        Ok(SocialGraph {
            nodes: self.nodes,
            view,
            stats,
        })
    }
}
