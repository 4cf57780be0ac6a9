use crate::kasm::config::MAX_CONTIG_SIZE;
use crate::kasm::graph::{Graph, NodeId};
use smallvec::SmallVec;

fn has_one_incoming(graph: &Graph, id: NodeId) -> bool {
    graph.node(id).from.len() == 1
}

fn has_one_outgoing(graph: &Graph, id: NodeId) -> bool {
    graph.node(id).to.len() == 1
}

/// True when the node's unique predecessor bifurcates.
fn prev_has_multiple_outgoing(graph: &Graph, id: NodeId) -> bool {
    if !has_one_incoming(graph, id) {
        return false;
    }
    let prev = graph.node(id).from[0];
    graph.node(prev).to.len() > 1
}

/// Collapse every maximal linear chain into its head node.
///
/// The head keeps its own k-mer key but gains a condensed sequence spelling
/// the whole chain (first base of each member, full k-mer of the terminal
/// member) and adopts the chain end's outgoing edges. Consumed members are
/// tombstoned with `is_filtered`; their `from` links are stale from here on
/// and later stages consult only `to` links of non-filtered nodes.
pub fn condense_graph(graph: &mut Graph) {
    for id in graph.live_ids() {
        if graph.node(id).is_filtered {
            continue;
        }
        // Chain heads: entry point (no unique predecessor, or predecessor
        // forks) with exactly one successor that has exactly one
        // predecessor.
        let is_head = (!has_one_incoming(graph, id) || prev_has_multiple_outgoing(graph, id))
            && has_one_outgoing(graph, id);
        if !is_head {
            continue;
        }
        let first = graph.node(id).to[0];
        if !has_one_incoming(graph, first) {
            continue;
        }

        let mut seq: Vec<u8> = Vec::new();
        seq.push(graph.kmer_bytes(id)[0]);

        let mut last_to: SmallVec<[NodeId; 2]> = graph.node(first).to.clone();
        let mut next = Some(first);
        let mut nodes_condensed = 1usize;

        while let Some(n) = next {
            if !has_one_incoming(graph, n) || nodes_condensed >= MAX_CONTIG_SIZE {
                break;
            }
            last_to = graph.node(n).to.clone();

            if graph.node(n).to.is_empty() {
                // End of path: spell the entire terminal k-mer
                seq.extend_from_slice(graph.kmer_bytes(n));
            } else {
                seq.push(graph.kmer_bytes(n)[0]);
            }

            let follow = if has_one_outgoing(graph, n) {
                Some(graph.node(n).to[0])
            } else {
                None
            };
            graph.node_mut(n).is_filtered = true;
            next = follow;
            nodes_condensed += 1;
        }

        graph.store_condensed(id, &seq);
        graph.node_mut(id).to = last_to;
    }
}
