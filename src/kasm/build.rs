use crate::kasm::config::{AssemblyConfig, MAX_SAMPLES, MIN_WINDOW_BASE_QUALITY};
use crate::kasm::graph::{phred33, Graph, NodeId, Strand};
use anyhow::{bail, Result};

/// Scan the batch for the highest sample id.
///
/// Sample ids are one-based; the returned count sizes every per-sample
/// frequency vector for the invocation. An id outside 1..=MAX_SAMPLES is a
/// caller bug, not bad data.
pub fn detect_sample_count(input: &[u8], record_len: usize) -> Result<usize> {
    let num_records = input.len() / record_len;
    let mut max_sample = 0usize;
    for record in 0..num_records {
        let sample = input[record * record_len] as usize;
        if sample < 1 || sample > MAX_SAMPLES {
            bail!("Sample id {} out of range 1..={}", sample, MAX_SAMPLES);
        }
        max_sample = max_sample.max(sample);
    }
    Ok(max_sample)
}

/// Accept a window only when it is N-free and every base clears the
/// absolute quality floor.
fn include_window(bases: &[u8], quals: &[u8]) -> bool {
    for (&b, &q) in bases.iter().zip(quals) {
        if b == b'N' || phred33(q) < MIN_WINDOW_BASE_QUALITY {
            return false;
        }
    }
    true
}

/// Consume the record batch into `graph`.
///
/// Each record contributes one arena read plus one k-mer node per valid
/// window, with edges chaining consecutive valid windows. A skipped window
/// breaks the chain. Building stops once the live node count reaches
/// `max_nodes`, checked per record.
pub fn build_graph(input: &[u8], graph: &mut Graph, cfg: &AssemblyConfig) -> Result<()> {
    let record_len = cfg.record_len();
    let num_records = input.len() / record_len;

    for record in 0..num_records {
        if graph.node_count() >= cfg.max_nodes {
            break;
        }
        let rec = &input[record * record_len..(record + 1) * record_len];
        let sample = rec[0] as usize;
        if sample < 1 || sample > graph.n_samples {
            bail!("Sample id {} out of range 1..={}", sample, graph.n_samples);
        }
        let sample_idx = sample - 1;
        let strand = match rec[1] {
            b'0' => Strand::Forward,
            b'1' => Strand::Reverse,
            other => bail!("Invalid strand character in input: {}", other as char),
        };
        let bases = &rec[2..2 + cfg.read_length];
        let quals = &rec[2 + cfg.read_length..2 + 2 * cfg.read_length];
        add_read(graph, cfg, sample_idx, strand, bases, quals)?;
    }
    Ok(())
}

/// Slide the k-window along one read, inserting or updating nodes and
/// linking consecutive windows.
fn add_read(
    graph: &mut Graph,
    cfg: &AssemblyConfig,
    sample_idx: usize,
    strand: Strand,
    bases: &[u8],
    quals: &[u8],
) -> Result<()> {
    let k = cfg.kmer_size;
    let read_off = graph.alloc_read(bases)?;

    let mut prev: Option<NodeId> = None;
    for i in 0..=cfg.read_length - k {
        let window = &bases[i..i + k];
        let window_quals = &quals[i..i + k];
        if !include_window(window, window_quals) {
            prev = None;
            continue;
        }

        let curr = match graph.find_node(window) {
            Some(id) => {
                graph.absorb_observation(id, sample_idx, read_off, strand, window_quals);
                id
            }
            None => graph.new_node(
                read_off + i as u32,
                read_off,
                sample_idx,
                strand,
                window_quals,
            )?,
        };

        if let Some(p) = prev {
            graph.link(p, curr);
        }
        prev = Some(curr);
    }
    Ok(())
}
