//! Cycle detection and enumeration on directed views

use super::common::{GraphView, NodeId};
use super::community::strongly_connected_components;
use std::collections::VecDeque;

/// Topological order of the view (Kahn), or `None` if the view has a cycle.
pub fn topological_sort(view: &GraphView) -> Option<Vec<NodeId>> {
    let n = view.node_count;
    let mut in_degree: Vec<usize> = (0..n).map(|i| view.in_degree(i)).collect();
    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while let Some(u) = queue.pop_front() {
        order.push(view.index_to_node[u]);
        for &v in view.successors(u) {
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                queue.push_back(v);
            }
        }
    }

    (order.len() == n).then_some(order)
}

/// True when the directed view contains no cycle.
pub fn is_acyclic(view: &GraphView) -> bool {
    topological_sort(view).is_some()
}

/// Enumerate elementary cycles of a directed view.
///
/// The search is confined to strongly connected components that can hold a
/// cycle, and each cycle is found once: from its member with the smallest
/// dense index, visiting only members with larger indices. Cycles are returned
/// as node id sequences rotated so the smallest id leads, sorted, and capped at
/// `limit` entries. Functional graphs (out-degree at most one) enumerate in
/// linear time; dense components can be exponential, hence the cap.
pub fn simple_cycles(view: &GraphView, limit: usize) -> Vec<Vec<NodeId>> {
    if limit == 0 {
        return Vec::new();
    }

    let scc = strongly_connected_components(view);
    let mut cycles: Vec<Vec<NodeId>> = Vec::new();

    'components: for component in scc.cyclic_components(view) {
        let comp_id = scc.index_component[component[0]];

        // component is sorted ascending
        for &start in component {
            let allowed = |w: usize| scc.index_component[w] == comp_id && w >= start;

            let mut path: Vec<usize> = vec![start];
            let mut on_path = vec![false; view.node_count];
            on_path[start] = true;
            let mut frames: Vec<usize> = vec![0];

            while let Some(&v) = path.last() {
                let pos = frames.last().copied().unwrap_or(0);
                let succ = view.successors(v);

                if pos >= succ.len() {
                    path.pop();
                    frames.pop();
                    on_path[v] = false;
                    continue;
                }

                if let Some(top) = frames.last_mut() {
                    *top += 1;
                }

                let w = succ[pos];
                if !allowed(w) {
                    continue;
                }
                if w == start {
                    cycles.push(path.iter().map(|&i| view.index_to_node[i]).collect());
                    if cycles.len() >= limit {
                        break 'components;
                    }
                } else if !on_path[w] {
                    on_path[w] = true;
                    path.push(w);
                    frames.push(0);
                }
            }
        }
    }

    for cycle in &mut cycles {
        if let Some(min_pos) = cycle
            .iter()
            .enumerate()
            .min_by_key(|&(_, id)| *id)
            .map(|(pos, _)| pos)
        {
            cycle.rotate_left(min_pos);
        }
    }
    cycles.sort();
    cycles
}
