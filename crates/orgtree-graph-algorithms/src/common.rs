//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of the graph topology for algorithm execution.

use rustc_hash::{FxHashMap, FxHashSet};

/// Node Identifier type (i64, matching employee ids)
pub type NodeId = i64;

/// A dense, integer-indexed view of the graph topology using Compressed Sparse Row (CSR) format.
///
/// Neighbor slices are sorted by dense index and free of duplicates, which lets
/// set operations such as shared-neighbor counting run as linear merges.
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: FxHashMap<NodeId, usize>,

    /// Outgoing edges CSR structure
    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<usize>,

    /// Incoming edges CSR structure (Compressed Sparse Column effectively)
    /// Offsets into `in_sources`. Size = node_count + 1
    pub in_offsets: Vec<usize>,
    /// Contiguous array of source node indices
    pub in_sources: Vec<usize>,
}

impl GraphView {
    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get the in-degree of a node (by index)
    pub fn in_degree(&self, idx: usize) -> usize {
        self.in_offsets[idx + 1] - self.in_offsets[idx]
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: usize) -> &[usize] {
        let start = self.out_offsets[idx];
        let end = self.out_offsets[idx + 1];
        &self.out_targets[start..end]
    }

    /// Get incoming neighbors (predecessors) of a node
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        let start = self.in_offsets[idx];
        let end = self.in_offsets[idx + 1];
        &self.in_sources[start..end]
    }

    /// Dense index of a node id, if the node is part of the view
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.node_to_index.get(&node).copied()
    }

    /// Number of stored directed arcs (an undirected edge counts twice)
    pub fn arc_count(&self) -> usize {
        self.out_targets.len()
    }

    /// Build a view from a node list and an edge list.
    ///
    /// Edges whose endpoints are not in `nodes` are ignored, as are duplicate
    /// arcs. When `directed` is false every edge is stored in both directions so
    /// `successors` yields the undirected neighborhood, and self-loops are
    /// dropped; directed views keep them.
    pub fn from_edge_list<I>(nodes: &[NodeId], edges: I, directed: bool) -> Self
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let node_count = nodes.len();
        let index_to_node = nodes.to_vec();
        let mut node_to_index = FxHashMap::default();
        node_to_index.reserve(node_count);
        for (idx, &node_id) in index_to_node.iter().enumerate() {
            node_to_index.insert(node_id, idx);
        }

        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        let mut seen: FxHashSet<(usize, usize)> = FxHashSet::default();

        let mut push_arc = |u: usize, v: usize| {
            if seen.insert((u, v)) {
                outgoing[u].push(v);
                incoming[v].push(u);
            }
        };

        for (a, b) in edges {
            let (Some(&u), Some(&v)) = (node_to_index.get(&a), node_to_index.get(&b)) else {
                continue;
            };
            if u == v && !directed {
                continue;
            }
            push_arc(u, v);
            if !directed {
                push_arc(v, u);
            }
        }

        for list in outgoing.iter_mut().chain(incoming.iter_mut()) {
            list.sort_unstable();
        }

        Self::from_adjacency_list(node_count, index_to_node, node_to_index, outgoing, incoming)
    }

    /// Helper to create GraphView from adjacency lists
    pub fn from_adjacency_list(
        node_count: usize,
        index_to_node: Vec<NodeId>,
        node_to_index: FxHashMap<NodeId, usize>,
        outgoing: Vec<Vec<usize>>,
        incoming: Vec<Vec<usize>>,
    ) -> Self {
        let mut out_offsets = Vec::with_capacity(node_count + 1);
        let mut out_targets = Vec::new();
        let mut in_offsets = Vec::with_capacity(node_count + 1);
        let mut in_sources = Vec::new();

        out_offsets.push(0);
        for neighbors in outgoing {
            out_targets.extend(neighbors);
            out_offsets.push(out_targets.len());
        }

        in_offsets.push(0);
        for sources in incoming {
            in_sources.extend(sources);
            in_offsets.push(in_sources.len());
        }

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            out_offsets,
            out_targets,
            in_offsets,
            in_sources,
        }
    }
}
