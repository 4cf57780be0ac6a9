use crate::kasm::config::AssemblyConfig;
use crate::kasm::graph::{Graph, NodeId};

/// Run all pruning stages in their fixed order.
pub fn prune_graph(graph: &mut Graph, cfg: &AssemblyConfig) {
    quality_sweep(graph, cfg);
    frequency_sweep(graph, cfg);
    edge_ratio_sweep(graph, cfg);
    orphan_sweep(graph);
}

/// Stage 1: drop nodes whose summed quality dips below the threshold at any
/// k-mer position.
pub fn quality_sweep(graph: &mut Graph, cfg: &AssemblyConfig) {
    for id in graph.live_ids() {
        let low = graph
            .node(id)
            .qual_sums
            .iter()
            .any(|&q| (q as u16) < cfg.min_base_quality);
        if low {
            graph.remove_node(id);
        }
    }
}

/// Stage 2: drop infrequent or single-source nodes. Skipped entirely when
/// `min_node_freq` is 1.
pub fn frequency_sweep(graph: &mut Graph, cfg: &AssemblyConfig) {
    if cfg.min_node_freq <= 1 {
        return;
    }
    for id in graph.live_ids() {
        let node = graph.node(id);
        if node.frequency < cfg.min_node_freq || !node.has_multiple_unique_reads {
            graph.remove_node(id);
        }
    }
}

/// True when any sample carries enough of the side's total mass through
/// `neighbor`.
fn reaches_min_ratio(graph: &Graph, neighbor: NodeId, totals: &[u64], min_edge_ratio: f64) -> bool {
    let freqs = &graph.node(neighbor).sample_frequency;
    for (s, &total) in totals.iter().enumerate() {
        if total > 0 && freqs[s] as f64 / total as f64 >= min_edge_ratio {
            return true;
        }
    }
    false
}

/// Stage 3: remove low-ratio edges, judged per sample against the summed
/// neighbor frequencies of each adjacency side.
pub fn edge_ratio_sweep(graph: &mut Graph, cfg: &AssemblyConfig) {
    for id in graph.live_ids() {
        // Outgoing side
        let mut totals = vec![0u64; graph.n_samples];
        for &to in &graph.node(id).to {
            for (s, &f) in graph.node(to).sample_frequency.iter().enumerate() {
                totals[s] += f as u64;
            }
        }
        let doomed: Vec<NodeId> = graph
            .node(id)
            .to
            .iter()
            .copied()
            .filter(|&to| !reaches_min_ratio(graph, to, &totals, cfg.min_edge_ratio))
            .collect();
        for to in doomed {
            graph.unlink(id, to);
        }

        // Incoming side
        let mut totals = vec![0u64; graph.n_samples];
        for &from in &graph.node(id).from {
            for (s, &f) in graph.node(from).sample_frequency.iter().enumerate() {
                totals[s] += f as u64;
            }
        }
        let doomed: Vec<NodeId> = graph
            .node(id)
            .from
            .iter()
            .copied()
            .filter(|&from| !reaches_min_ratio(graph, from, &totals, cfg.min_edge_ratio))
            .collect();
        for from in doomed {
            graph.unlink(from, id);
        }
    }
}

/// Stage 4: drop nodes left with no edges on either side.
pub fn orphan_sweep(graph: &mut Graph) {
    for id in graph.live_ids() {
        let node = graph.node(id);
        if node.to.is_empty() && node.from.is_empty() {
            graph.remove_node(id);
        }
    }
}
