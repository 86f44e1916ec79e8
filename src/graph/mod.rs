//! Employee social graph
//!
//! - Employee records, undirected connections and prediction rows
//! - Sentinel-aware identifiers for the prediction relation
//! - The feature-annotated social graph and its builder

pub mod employee;
pub mod store;
pub mod types;

// Re-export main types
pub use employee::{Connection, Employee, Prediction};
pub use store::{EmployeeNode, GraphError, GraphResult, GraphStatistics, SocialGraph, SocialGraphBuilder};
pub use types::{EmployeeId, ManagerAssignment, ROOT_SENTINEL, UNRESOLVED_SENTINEL};
