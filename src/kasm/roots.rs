use crate::kasm::graph::{Graph, NodeId};

/// Mark and collect contig starting points.
///
/// A root has no incoming edges at all, or exactly one incoming edge that is
/// a self-loop (the loop is broken during contig building). Filtered nodes
/// never qualify.
pub fn identify_roots(graph: &mut Graph) -> Vec<NodeId> {
    let mut roots = Vec::new();
    for id in graph.live_ids() {
        let node = graph.node(id);
        if node.is_filtered {
            continue;
        }
        let is_root = node.from.is_empty() || (node.from.len() == 1 && node.from[0] == id);
        if is_root {
            graph.node_mut(id).is_root = true;
            roots.push(id);
        }
    }
    roots
}
