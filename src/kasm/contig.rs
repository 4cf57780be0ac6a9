use crate::kasm::config::{AssemblyConfig, MAX_CONTIG_SIZE, MAX_TOTAL_CONTIG_LEN};
use crate::kasm::graph::{Graph, NodeId};
use fxhash::FxHashSet;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::Write as _;

/// Enumeration outcome for one root (and, via the driver, one invocation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    TooManyPathsFromRoot,
    TooManyContigs,
    StoppedOnRepeat,
    TooManyNodes,
}

/// Number of top contig scores retained; branches below the worst of these
/// are pruned immediately.
const TOP_SCORES: usize = 128;

/// Total-ordered f64 so scores can live in a BinaryHeap. All scores are
/// finite sums of log10 terms.
#[derive(PartialEq)]
struct Score(f64);

impl Eq for Score {}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Bounded min-heap over the best emitted contig scores.
#[derive(Default)]
pub struct ScoreBoard {
    heap: BinaryHeap<Reverse<Score>>,
}

impl ScoreBoard {
    /// Whether a contig carrying `score` is still competitive.
    pub fn is_score_ok(&self, score: f64) -> bool {
        if self.heap.len() < TOP_SCORES {
            return true;
        }
        match self.heap.peek() {
            Some(Reverse(min)) => score >= min.0,
            None => true,
        }
    }

    /// Record a contig score, displacing the current minimum when full.
    pub fn update(&mut self, score: f64) {
        if self.heap.len() == TOP_SCORES {
            if let Some(Reverse(min)) = self.heap.peek() {
                if score >= min.0 {
                    self.heap.pop();
                    self.heap.push(Reverse(Score(score)));
                }
            }
        } else {
            self.heap.push(Reverse(Score(score)));
        }
    }

    /// Current minimum retained score, if the board is non-empty.
    pub fn min(&self) -> Option<f64> {
        self.heap.peek().map(|Reverse(s)| s.0)
    }
}

/// One piece of a contig body, referencing graph-owned bytes.
#[derive(Debug, Clone, Copy)]
enum Fragment {
    /// First base of a plain node's k-mer
    Lead(NodeId),
    /// Entire k-mer of a terminal node
    Kmer(NodeId),
    /// Condensed chain sequence carried by the node
    Condensed(NodeId),
}

impl Fragment {
    fn resolve<'g>(&self, graph: &'g Graph) -> &'g [u8] {
        match *self {
            Fragment::Lead(id) => &graph.kmer_bytes(id)[..1],
            Fragment::Kmer(id) => graph.kmer_bytes(id),
            Fragment::Condensed(id) => graph.condensed_seq(id),
        }
    }
}

/// An in-flight path through the graph.
#[derive(Debug, Clone)]
struct Contig {
    fragments: Vec<Fragment>,
    real_size: usize,
    visited: FxHashSet<NodeId>,
    score: f64,
    node: NodeId,
    is_repeat: bool,
}

impl Contig {
    fn new(root: NodeId) -> Self {
        Contig {
            fragments: Vec::new(),
            real_size: 0,
            visited: FxHashSet::default(),
            score: 0.0,
            node: root,
            is_repeat: false,
        }
    }

    /// Append the frontier node's lead base (or condensed sequence).
    fn append_step(&mut self, graph: &Graph) {
        if graph.node(self.node).is_condensed() {
            self.fragments.push(Fragment::Condensed(self.node));
            self.real_size += graph.condensed_seq(self.node).len();
        } else {
            self.fragments.push(Fragment::Lead(self.node));
            self.real_size += 1;
        }
    }

    /// Append the frontier node's full k-mer (or condensed sequence).
    fn append_terminal(&mut self, graph: &Graph) {
        if graph.node(self.node).is_condensed() {
            self.fragments.push(Fragment::Condensed(self.node));
            self.real_size += graph.condensed_seq(self.node).len();
        } else {
            self.fragments.push(Fragment::Kmer(self.node));
            self.real_size += graph.k;
        }
    }
}

/// State shared across every root of one invocation: the accumulated FASTA
/// text, the running contig count and the score board.
pub struct Enumeration {
    pub prefix: String,
    pub contig_count: usize,
    pub out: String,
    pub scores: ScoreBoard,
}

impl Enumeration {
    pub fn new(prefix: &str) -> Self {
        Enumeration {
            prefix: prefix.to_string(),
            contig_count: 0,
            out: String::new(),
            scores: ScoreBoard::default(),
        }
    }
}

/// Depth-first branching traversal from one root.
///
/// A LIFO stack holds in-flight contigs; each step either discards a
/// revisiting branch, finishes a terminal contig, or advances the frontier
/// and clones one branch per extra successor. Scores change only at forks:
/// the branch toward successor i gains log10(freq_i) - log10(total mass).
/// Queued contigs are emitted after the root finishes cleanly, newest
/// first, re-checked against the score board.
pub fn build_contigs(
    graph: &Graph,
    root: NodeId,
    cfg: &AssemblyConfig,
    state: &mut Enumeration,
) -> Status {
    let mut status = Status::Ok;
    let mut stack: Vec<Contig> = vec![Contig::new(root)];
    let mut to_emit: Vec<Contig> = Vec::new();
    let mut paths_from_root = 1usize;

    while !stack.is_empty() && status == Status::Ok {
        let frontier = {
            let top = stack.last().expect("non-empty stack");
            top.node
        };
        let revisited = stack
            .last()
            .map(|c| c.visited.contains(&frontier))
            .unwrap_or(false);

        if revisited {
            let mut contig = stack.pop().expect("non-empty stack");
            contig.is_repeat = true;
            if cfg.truncate_on_repeat {
                status = Status::StoppedOnRepeat;
            }
            // Repeat branches are never emitted
        } else if graph.node(frontier).to.is_empty()
            || stack.last().expect("non-empty stack").real_size >= MAX_CONTIG_SIZE - 1
        {
            let mut contig = stack.pop().expect("non-empty stack");
            contig.append_terminal(graph);
            state.scores.update(contig.score);
            to_emit.push(contig);
        } else {
            let mut contig = stack.pop().expect("non-empty stack");
            contig.append_step(graph);
            if contig.real_size >= MAX_CONTIG_SIZE {
                // A condensed fragment can overshoot the cap in one step
                if cfg.debug {
                    eprintln!(
                        "Max contig size exceeded at node: {}",
                        String::from_utf8_lossy(graph.kmer_bytes(contig.node))
                    );
                }
                status = Status::TooManyContigs;
                break;
            }
            contig.visited.insert(contig.node);

            let successors = &graph.node(contig.node).to;
            let total_mass: u64 = successors
                .iter()
                .map(|&n| graph.node(n).frequency as u64)
                .sum();
            let prev_score = contig.score;
            let forked = successors.len() > 1;
            let log10_total = if forked { (total_mass as f64).log10() } else { 0.0 };

            // The current contig follows the first successor
            let first = successors[0];
            let rest: Vec<NodeId> = successors[1..].to_vec();
            contig.node = first;
            paths_from_root += 1;
            if forked {
                contig.score =
                    prev_score + (graph.node(first).frequency as f64).log10() - log10_total;
            }

            // Each extra successor gets a cloned branch, pushed above the
            // current contig so it is explored first
            let mut branches: Vec<Contig> = Vec::new();
            for next in rest {
                let branch_score =
                    prev_score + (graph.node(next).frequency as f64).log10() - log10_total;
                if state.scores.is_score_ok(branch_score) {
                    let mut branch = contig.clone();
                    branch.node = next;
                    branch.score = branch_score;
                    branches.push(branch);
                }
                paths_from_root += 1;
            }

            if state.scores.is_score_ok(contig.score) {
                stack.push(contig);
            }
            stack.extend(branches);
        }

        if state.contig_count >= cfg.max_contigs {
            status = Status::TooManyContigs;
        }
        if paths_from_root >= cfg.max_paths_from_root {
            status = Status::TooManyPathsFromRoot;
        }
    }

    if status == Status::Ok {
        while let Some(contig) = to_emit.pop() {
            if state.scores.is_score_ok(contig.score) {
                output_contig(&contig, graph, cfg, state);
            }
        }
    }

    status
}

/// Append one finished contig to the invocation output.
///
/// Bodies shorter than the minimum contig length are dropped silently;
/// repeat-flagged contigs never reach the output. The body is capped at
/// MAX_CONTIG_SIZE bytes, the whole output at MAX_TOTAL_CONTIG_LEN.
fn output_contig(contig: &Contig, graph: &Graph, cfg: &AssemblyConfig, state: &mut Enumeration) {
    if contig.real_size < cfg.min_contig_length() || contig.is_repeat {
        return;
    }

    let mut body: Vec<u8> = Vec::with_capacity(contig.real_size.min(MAX_CONTIG_SIZE));
    for fragment in &contig.fragments {
        let bytes = fragment.resolve(graph);
        let room = MAX_CONTIG_SIZE - body.len();
        if room == 0 {
            break;
        }
        body.extend_from_slice(&bytes[..bytes.len().min(room)]);
    }

    let mut record = String::with_capacity(body.len() + 64);
    let _ = writeln!(
        record,
        ">{}_{}_{:.6}",
        state.prefix, state.contig_count, contig.score
    );
    record.push_str(&String::from_utf8_lossy(&body));
    record.push('\n');

    if state.out.len() + record.len() > MAX_TOTAL_CONTIG_LEN {
        return;
    }
    state.out.push_str(&record);
    state.contig_count += 1;
}
