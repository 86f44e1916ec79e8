//! Community detection algorithms
//!
//! Weakly connected components (union-find) and strongly connected
//! components (Tarjan).

use super::common::{GraphView, NodeId};
use rustc_hash::FxHashMap;

/// Result of WCC algorithm
pub struct WccResult {
    /// Map of Component ID -> List of NodeIds
    pub components: FxHashMap<usize, Vec<NodeId>>,
    /// Map of NodeId -> Component ID
    pub node_component: FxHashMap<NodeId, usize>,
}

impl WccResult {
    /// Number of components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

/// Union-Find data structure
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut cur = i;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);

        if root_i != root_j {
            if self.rank[root_i] < self.rank[root_j] {
                self.parent[root_i] = root_j;
            } else if self.rank[root_i] > self.rank[root_j] {
                self.parent[root_j] = root_i;
            } else {
                self.parent[root_j] = root_i;
                self.rank[root_i] += 1;
            }
        }
    }
}

/// Weakly Connected Components (WCC)
///
/// Finds all disjoint subgraphs in the graph.
/// Ignores edge direction.
pub fn weakly_connected_components(view: &GraphView) -> WccResult {
    let n = view.node_count;
    let mut uf = UnionFind::new(n);

    for u_idx in 0..n {
        for &v_idx in view.successors(u_idx) {
            uf.union(u_idx, v_idx);
        }
    }

    let mut components = FxHashMap::default();
    let mut node_component = FxHashMap::default();

    for i in 0..n {
        let root = uf.find(i);
        let node_id = view.index_to_node[i];

        components.entry(root).or_insert_with(Vec::new).push(node_id);
        node_component.insert(node_id, root);
    }

    WccResult {
        components,
        node_component,
    }
}

/// Result of SCC algorithm
pub struct SccResult {
    /// Components as lists of dense indices, in Tarjan completion order
    pub components: Vec<Vec<usize>>,
    /// Dense index -> position in `components`
    pub index_component: Vec<usize>,
}

impl SccResult {
    /// Components that can hold a cycle: more than one node, or a node with a self-loop.
    pub fn cyclic_components<'a>(&'a self, view: &'a GraphView) -> impl Iterator<Item = &'a Vec<usize>> + 'a {
        self.components.iter().filter(move |c| {
            c.len() > 1 || view.successors(c[0]).binary_search(&c[0]).is_ok()
        })
    }
}

/// Strongly Connected Components (Tarjan, iterative)
pub fn strongly_connected_components(view: &GraphView) -> SccResult {
    const UNVISITED: usize = usize::MAX;

    let n = view.node_count;
    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut components: Vec<Vec<usize>> = Vec::new();
    let mut index_component = vec![0; n];
    let mut next_index = 0;

    // (node, position in its successor slice)
    let mut call_stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..n {
        if index[start] != UNVISITED {
            continue;
        }

        index[start] = next_index;
        lowlink[start] = next_index;
        next_index += 1;
        stack.push(start);
        on_stack[start] = true;
        call_stack.push((start, 0));

        while let Some(&(v, pos)) = call_stack.last() {
            let succ = view.successors(v);
            if pos < succ.len() {
                let w = succ[pos];
                if let Some(top) = call_stack.last_mut() {
                    top.1 += 1;
                }
                if index[w] == UNVISITED {
                    index[w] = next_index;
                    lowlink[w] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    call_stack.push((w, 0));
                } else if on_stack[w] {
                    lowlink[v] = lowlink[v].min(index[w]);
                }
                continue;
            }

            call_stack.pop();
            if let Some(&(parent, _)) = call_stack.last() {
                lowlink[parent] = lowlink[parent].min(lowlink[v]);
            }

            if lowlink[v] == index[v] {
                let mut component = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    index_component[w] = components.len();
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                component.sort_unstable();
                components.push(component);
            }
        }
    }

    SccResult {
        components,
        index_component,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wcc() {
        // Nodes: 1, 2, 3, 4, 5, 6
        // Edges: 1->2, 3->4->5, 6 (isolated)
        let view = GraphView::from_edge_list(
            &[1, 2, 3, 4, 5, 6],
            vec![(1, 2), (3, 4), (4, 5)],
            true,
        );

        let result = weakly_connected_components(&view);

        assert_eq!(result.component_count(), 3);

        let c1 = result.node_component[&1];
        let c2 = result.node_component[&2];
        assert_eq!(c1, c2);

        let c3 = result.node_component[&3];
        let c4 = result.node_component[&4];
        let c5 = result.node_component[&5];
        assert_eq!(c3, c4);
        assert_eq!(c4, c5);
        assert_ne!(c1, c3);
    }

    #[test]
    fn test_scc() {
        // 1 -> 2 -> 3 -> 1, 3 -> 4, 4 -> 5 -> 4, 6
        let view = GraphView::from_edge_list(
            &[1, 2, 3, 4, 5, 6],
            vec![(1, 2), (2, 3), (3, 1), (3, 4), (4, 5), (5, 4)],
            true,
        );

        let result = strongly_connected_components(&view);
        assert_eq!(result.components.len(), 3);

        let cyclic: Vec<_> = result.cyclic_components(&view).cloned().collect();
        assert_eq!(cyclic.len(), 2);
        assert!(cyclic.contains(&vec![0, 1, 2]));
        assert!(cyclic.contains(&vec![3, 4]));
        assert_eq!(result.index_component[0], result.index_component[2]);
        assert_ne!(result.index_component[0], result.index_component[5]);
    }

    #[test]
    fn test_scc_deep_chain_does_not_overflow() {
        let nodes: Vec<NodeId> = (0..50_000).collect();
        let edges: Vec<_> = (0..49_999).map(|i| (i, i + 1)).collect();
        let view = GraphView::from_edge_list(&nodes, edges, true);

        let result = strongly_connected_components(&view);
        assert_eq!(result.components.len(), 50_000);
        assert_eq!(result.cyclic_components(&view).count(), 0);
    }
}
