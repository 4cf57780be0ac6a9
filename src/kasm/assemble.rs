use crate::kasm::build::{build_graph, detect_sample_count};
use crate::kasm::condense::condense_graph;
use crate::kasm::config::AssemblyConfig;
use crate::kasm::contig::{build_contigs, Enumeration, Status};
use crate::kasm::graph::Graph;
use crate::kasm::prune::prune_graph;
use crate::kasm::roots::identify_roots;
use anyhow::Result;

/// Returned in place of contig text when the traversal hit a repeat under
/// `truncate_on_repeat`.
pub const REPEAT_SENTINEL: &str = "<REPEAT>";
/// Returned in place of contig text when the region was too complex
/// (too many nodes or too many contigs).
pub const ERROR_SENTINEL: &str = "<ERROR>";

/// Assemble one region's record batch into contig text.
///
/// Runs the full pipeline - build, prune, condense, root identification,
/// per-root enumeration - against a fresh graph whose arenas are released
/// when this function returns, on every path. The result is FASTA-shaped
/// contig text, or one of the sentinels; malformed input (bad strand or
/// sample byte) is a caller bug and surfaces as `Err`.
pub fn assemble(input: &[u8], prefix: &str, cfg: &AssemblyConfig) -> Result<String> {
    cfg.validate()?;

    if cfg.debug {
        eprintln!("Assembling: {}", prefix);
    }

    let n_samples = detect_sample_count(input, cfg.record_len())?;
    let mut graph = Graph::new(cfg.kmer_size, cfg.read_length, n_samples);
    build_graph(input, &mut graph, cfg)?;

    let mut status = Status::Ok;
    if graph.node_count() >= cfg.max_nodes {
        status = Status::TooManyNodes;
        if cfg.debug {
            eprintln!("Graph too complex for region: {}", prefix);
        }
    }

    let mut state = Enumeration::new(prefix);

    if status != Status::TooManyNodes {
        prune_graph(&mut graph, cfg);
        condense_graph(&mut graph);
        let roots = identify_roots(&mut graph);

        for root in roots {
            status = build_contigs(&graph, root, cfg, &mut state);
            match status {
                Status::TooManyContigs => {
                    eprintln!("TOO_MANY_CONTIGS: {}", prefix);
                    break;
                }
                Status::StoppedOnRepeat => {
                    if cfg.debug {
                        eprintln!("STOPPED_ON_REPEAT: {}", prefix);
                    }
                    break;
                }
                Status::TooManyPathsFromRoot => {
                    // Soft cap: keep what previous roots emitted, move on
                    eprintln!(
                        "TOO_MANY_PATHS_FROM_ROOT: {} - {}",
                        prefix,
                        String::from_utf8_lossy(graph.kmer_bytes(root))
                    );
                }
                _ => {}
            }
        }
    }

    if cfg.debug {
        eprintln!("Done assembling: {}, {}", prefix, state.contig_count);
    }

    match status {
        Status::Ok | Status::TooManyPathsFromRoot => Ok(state.out),
        Status::StoppedOnRepeat => Ok(REPEAT_SENTINEL.to_string()),
        Status::TooManyContigs | Status::TooManyNodes => Ok(ERROR_SENTINEL.to_string()),
    }
}
