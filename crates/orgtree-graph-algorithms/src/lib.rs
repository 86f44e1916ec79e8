pub mod common;
pub mod community;
pub mod cycles;
pub mod topology;

pub use common::{GraphView, NodeId};
pub use community::{weakly_connected_components, WccResult, strongly_connected_components, SccResult};
pub use cycles::{is_acyclic, simple_cycles, topological_sort};
pub use topology::common_neighbor_count;
