//! Core type definitions for the employee graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Manager id written for the organizational root.
pub const ROOT_SENTINEL: i64 = -1;

/// Manager id written for employees no acyclic edge could be committed for.
pub const UNRESOLVED_SENTINEL: i64 = 0;

/// Unique identifier for an employee
///
/// Valid ids are strictly positive so they never collide with the
/// root and unresolved sentinels of the prediction relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EmployeeId(pub i64);

impl EmployeeId {
    pub fn new(id: i64) -> Self {
        EmployeeId(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// True when the id can name an employee (not a sentinel, not negative)
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EmployeeId {
    fn from(id: i64) -> Self {
        EmployeeId(id)
    }
}

/// Final manager value of one employee in the prediction relation
///
/// Serialized as the sentinel-encoded integer of the `manager_id` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", from = "i64")]
pub enum ManagerAssignment {
    /// Reports to the given employee
    Manager(EmployeeId),
    /// Is the organizational root
    Root,
    /// No manager could be committed
    Unresolved,
}

impl ManagerAssignment {
    /// Encode with the `-1` / `0` sentinels
    pub fn as_i64(&self) -> i64 {
        match self {
            ManagerAssignment::Manager(id) => id.as_i64(),
            ManagerAssignment::Root => ROOT_SENTINEL,
            ManagerAssignment::Unresolved => UNRESOLVED_SENTINEL,
        }
    }

    /// Decode a sentinel-encoded manager id. Any other negative value is
    /// treated as unresolved.
    pub fn from_i64(value: i64) -> Self {
        match value {
            ROOT_SENTINEL => ManagerAssignment::Root,
            v if v > 0 => ManagerAssignment::Manager(EmployeeId(v)),
            _ => ManagerAssignment::Unresolved,
        }
    }

    pub fn manager(&self) -> Option<EmployeeId> {
        match self {
            ManagerAssignment::Manager(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<ManagerAssignment> for i64 {
    fn from(value: ManagerAssignment) -> Self {
        value.as_i64()
    }
}

impl From<i64> for ManagerAssignment {
    fn from(value: i64) -> Self {
        ManagerAssignment::from_i64(value)
    }
}

impl fmt::Display for ManagerAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagerAssignment::Manager(id) => write!(f, "{}", id),
            ManagerAssignment::Root => write!(f, "root"),
            ManagerAssignment::Unresolved => write!(f, "unresolved"),
        }
    }
}
