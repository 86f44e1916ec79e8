//! Transactional reporting hierarchy
//!
//! Edges go through propose -> validate -> commit. A proposal is validated
//! against the committed edges when it is made; committing a proposal that
//! was made against an older generation re-validates it first, so no
//! cyclic or multi-manager state is ever observable.

use crate::graph::EmployeeId;
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

/// A committed `employee -> manager` edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HierarchyEdge {
    pub employee: EmployeeId,
    pub manager: EmployeeId,
}

/// Why a proposed edge was not accepted
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("employee {employee} already reports to {current}")]
    AlreadyAssigned {
        employee: EmployeeId,
        current: EmployeeId,
    },

    #[error("employee {0} cannot manage itself")]
    SelfLoop(EmployeeId),

    #[error("edge {employee} -> {manager} would close a cycle")]
    WouldCycle {
        employee: EmployeeId,
        manager: EmployeeId,
    },
}

/// An edge validated against a given generation of the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposedEdge {
    edge: HierarchyEdge,
    generation: u64,
}

impl ProposedEdge {
    pub fn edge(&self) -> HierarchyEdge {
        self.edge
    }
}

/// Committed reporting edges; at most one manager per employee, never cyclic
#[derive(Debug, Clone, Default)]
pub struct HierarchyGraph {
    // commit order is kept for stable iteration
    managers: IndexMap<EmployeeId, EmployeeId>,
    generation: u64,
}

impl HierarchyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    /// Number of commits so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn manager_of(&self, employee: EmployeeId) -> Option<EmployeeId> {
        self.managers.get(&employee).copied()
    }

    pub fn is_assigned(&self, employee: EmployeeId) -> bool {
        self.managers.contains_key(&employee)
    }

    /// True when `to` lies on the manager chain starting at `from`
    /// (`from` itself included).
    ///
    /// Each employee has at most one manager, so the committed edges form a
    /// forest of in-trees and the walk visits at most one chain.
    pub fn reaches(&self, from: EmployeeId, to: EmployeeId) -> bool {
        let mut current = from;
        loop {
            if current == to {
                return true;
            }
            match self.managers.get(&current) {
                Some(&next) => current = next,
                None => return false,
            }
        }
    }

    /// Validate `employee -> manager` against the committed edges.
    pub fn propose(&self, employee: EmployeeId, manager: EmployeeId) -> Result<ProposedEdge, Rejection> {
        self.validate(employee, manager)?;
        Ok(ProposedEdge {
            edge: HierarchyEdge { employee, manager },
            generation: self.generation,
        })
    }

    /// Commit a proposal. Proposals from an older generation are validated again.
    pub fn commit(&mut self, proposal: ProposedEdge) -> Result<HierarchyEdge, Rejection> {
        let edge = proposal.edge;
        if proposal.generation != self.generation {
            self.validate(edge.employee, edge.manager)?;
        }
        self.managers.insert(edge.employee, edge.manager);
        self.generation += 1;
        Ok(edge)
    }

    /// Propose and commit in one step
    pub fn try_assign(&mut self, employee: EmployeeId, manager: EmployeeId) -> Result<HierarchyEdge, Rejection> {
        let proposal = self.propose(employee, manager)?;
        self.commit(proposal)
    }

    /// Committed edges in commit order
    pub fn edges(&self) -> impl Iterator<Item = HierarchyEdge> + '_ {
        self.managers
            .iter()
            .map(|(&employee, &manager)| HierarchyEdge { employee, manager })
    }

    fn validate(&self, employee: EmployeeId, manager: EmployeeId) -> Result<(), Rejection> {
        if let Some(current) = self.manager_of(employee) {
            return Err(Rejection::AlreadyAssigned { employee, current });
        }
        if employee == manager {
            return Err(Rejection::SelfLoop(employee));
        }
        if self.reaches(manager, employee) {
            return Err(Rejection::WouldCycle { employee, manager });
        }
        Ok(())
    }
}
