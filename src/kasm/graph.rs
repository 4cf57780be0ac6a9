use crate::kasm::config::MAX_FREQUENCY;
use crate::kasm::kmer::{kmer_hash, KmerIndex};
use crate::kasm::pool::{NodePool, ReadPool};
use anyhow::Result;
use smallvec::SmallVec;
use std::fmt::Write as _;

/// Dense-arena node handle. Unique for the lifetime of one assembly and
/// never reused, which makes it safe as a visited-set key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Originating strand of a read, as marked in the input record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

/// Byte range into the condensed-sequence buffer.
#[derive(Debug, Clone, Copy)]
pub struct CondensedSeq {
    pub start: u32,
    pub len: u32,
}

/// One k-mer vertex.
///
/// `kmer` addresses the first k bytes of a window inside the read arena;
/// `seq` is only present once the condenser has collapsed a chain into this
/// node. Adjacency lists are unordered and deduplicated.
#[derive(Debug)]
pub struct Node {
    pub kmer: u32,
    pub seq: Option<CondensedSeq>,
    pub to: SmallVec<[NodeId; 2]>,
    pub from: SmallVec<[NodeId; 2]>,
    pub contributing_read: u32,
    pub contributing_strand: Strand,
    pub qual_sums: SmallVec<[u8; 64]>,
    pub frequency: u16,
    pub sample_frequency: SmallVec<[u16; 8]>,
    pub has_multiple_unique_reads: bool,
    pub is_filtered: bool,
    pub is_root: bool,
}

impl Node {
    fn new(
        kmer_off: u32,
        read_off: u32,
        sample_idx: usize,
        strand: Strand,
        kmer_quals: &[u8],
        n_samples: usize,
    ) -> Self {
        let mut sample_frequency: SmallVec<[u16; 8]> = SmallVec::from_elem(0, n_samples);
        sample_frequency[sample_idx] = 1;
        Node {
            kmer: kmer_off,
            seq: None,
            to: SmallVec::new(),
            from: SmallVec::new(),
            contributing_read: read_off,
            contributing_strand: strand,
            qual_sums: kmer_quals.iter().map(|&q| phred33(q)).collect(),
            frequency: 1,
            sample_frequency,
            has_multiple_unique_reads: false,
            is_filtered: false,
            is_root: false,
        }
    }

    pub fn is_condensed(&self) -> bool {
        self.seq.is_some()
    }
}

/// Phred+33 decoding; '!' is quality zero.
#[inline]
pub fn phred33(ch: u8) -> u8 {
    ch.saturating_sub(b'!')
}

#[inline]
fn saturating_bump(freq: &mut u16) {
    *freq = freq.saturating_add(1).min(MAX_FREQUENCY);
}

/// Per-invocation k-mer graph: node arena, read arena, k-mer index and the
/// condensed-sequence buffer. Dropping the graph releases everything at
/// once, on every exit path.
#[derive(Debug)]
pub struct Graph {
    nodes: NodePool,
    reads: ReadPool,
    index: KmerIndex,
    condensed: Vec<u8>,
    pub k: usize,
    pub n_samples: usize,
}

impl Graph {
    pub fn new(k: usize, read_length: usize, n_samples: usize) -> Self {
        Graph {
            nodes: NodePool::new(),
            reads: ReadPool::new(read_length),
            index: KmerIndex::new(),
            condensed: Vec::new(),
            k,
            n_samples,
        }
    }

    /// Number of nodes currently reachable through the index.
    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        self.nodes.get(id)
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes.get_mut(id)
    }

    /// The k bytes keying `id`.
    #[inline]
    pub fn kmer_bytes(&self, id: NodeId) -> &[u8] {
        self.reads.window(self.nodes.get(id).kmer, self.k)
    }

    /// Condensed sequence of `id`; empty unless the condenser ran.
    pub fn condensed_seq(&self, id: NodeId) -> &[u8] {
        match self.nodes.get(id).seq {
            Some(seq) => {
                let start = seq.start as usize;
                &self.condensed[start..start + seq.len as usize]
            }
            None => &[],
        }
    }

    /// Copy one read into the arena and return its record-start offset.
    pub fn alloc_read(&mut self, read: &[u8]) -> Result<u32> {
        self.reads.alloc(read)
    }

    /// Look up the node holding `kmer`, comparing exactly k bytes.
    pub fn find_node(&self, kmer: &[u8]) -> Option<NodeId> {
        debug_assert_eq!(kmer.len(), self.k);
        self.index
            .find(kmer_hash(kmer), |id| self.kmer_bytes(id) == kmer)
    }

    /// Allocate and index a node for the window at `kmer_off`.
    pub fn new_node(
        &mut self,
        kmer_off: u32,
        read_off: u32,
        sample_idx: usize,
        strand: Strand,
        kmer_quals: &[u8],
    ) -> Result<NodeId> {
        let n_samples = self.n_samples;
        let node = Node::new(kmer_off, read_off, sample_idx, strand, kmer_quals, n_samples);
        let id = self.nodes.alloc(node)?;
        let hash = kmer_hash(self.kmer_bytes(id));
        self.index.insert(hash, id);
        Ok(id)
    }

    /// Fold another read observation into an existing node.
    ///
    /// Frequencies saturate at `MAX_FREQUENCY`, per-position quality sums at
    /// 255; a differing contributing read or strand flips
    /// `has_multiple_unique_reads`.
    pub fn absorb_observation(
        &mut self,
        id: NodeId,
        sample_idx: usize,
        read_off: u32,
        strand: Strand,
        kmer_quals: &[u8],
    ) {
        let same_read = {
            let node = self.nodes.get(id);
            self.reads.read_at(node.contributing_read) == self.reads.read_at(read_off)
        };
        let node = self.nodes.get_mut(id);
        saturating_bump(&mut node.frequency);
        saturating_bump(&mut node.sample_frequency[sample_idx]);
        if !node.has_multiple_unique_reads && (!same_read || node.contributing_strand != strand) {
            node.has_multiple_unique_reads = true;
        }
        for (sum, &q) in node.qual_sums.iter_mut().zip(kmer_quals) {
            *sum = sum.saturating_add(phred33(q));
        }
    }

    /// Add the edge `from -> to`, deduplicating by scanning both adjacency
    /// lists.
    pub fn link(&mut self, from: NodeId, to: NodeId) {
        if !self.nodes.get(from).to.contains(&to) {
            self.nodes.get_mut(from).to.push(to);
        }
        if !self.nodes.get(to).from.contains(&from) {
            self.nodes.get_mut(to).from.push(from);
        }
    }

    /// Remove the edge `from -> to` from both adjacency lists.
    pub fn unlink(&mut self, from: NodeId, to: NodeId) {
        let to_list = &mut self.nodes.get_mut(from).to;
        if let Some(pos) = to_list.iter().position(|&n| n == to) {
            to_list.remove(pos);
        }
        let from_list = &mut self.nodes.get_mut(to).from;
        if let Some(pos) = from_list.iter().position(|&n| n == from) {
            from_list.remove(pos);
        }
    }

    /// Detach `id` from all neighbors, drop it from the index and tombstone
    /// it. The arena slot itself lives on until the graph is dropped.
    pub fn remove_node(&mut self, id: NodeId) {
        let to = std::mem::take(&mut self.nodes.get_mut(id).to);
        for t in to {
            let from_list = &mut self.nodes.get_mut(t).from;
            if let Some(pos) = from_list.iter().position(|&n| n == id) {
                from_list.remove(pos);
            }
        }
        let from = std::mem::take(&mut self.nodes.get_mut(id).from);
        for f in from {
            let to_list = &mut self.nodes.get_mut(f).to;
            if let Some(pos) = to_list.iter().position(|&n| n == id) {
                to_list.remove(pos);
            }
        }
        let hash = kmer_hash(self.kmer_bytes(id));
        self.index.remove(hash, id);
        self.nodes.get_mut(id).is_filtered = true;
    }

    /// Ids of every node still in the index.
    pub fn live_ids(&self) -> Vec<NodeId> {
        self.index.ids()
    }

    /// Store a condensed chain sequence and attach it to `id`.
    pub fn store_condensed(&mut self, id: NodeId, seq: &[u8]) {
        let start = self.condensed.len() as u32;
        self.condensed.extend_from_slice(seq);
        self.nodes.get_mut(id).seq = Some(CondensedSeq {
            start,
            len: seq.len() as u32,
        });
    }

    /// Render the traversable portion of the graph as GraphViz.
    pub fn dump_dot(&self) -> String {
        let mut out = String::from("digraph kasm {\n//\tEdges\n");
        let ids = self.live_ids();
        for &id in &ids {
            let node = self.node(id);
            if node.is_filtered {
                continue;
            }
            for &to in &node.to {
                let _ = writeln!(out, "\tv_{} -> v_{}", id.0, to.0);
            }
        }
        let _ = writeln!(out, "//\tVertices");
        for &id in &ids {
            let node = self.node(id);
            if node.is_filtered {
                continue;
            }
            let color = if node.is_root { ",color=red" } else { "" };
            if node.is_condensed() {
                let seq = String::from_utf8_lossy(self.condensed_seq(id)).into_owned();
                let color = if node.is_root { ",color=green" } else { ",color=blue" };
                let _ = writeln!(out, "\tv_{} [label=\"{}\",shape=box{}]", id.0, seq, color);
            } else {
                let base = self.kmer_bytes(id)[0] as char;
                let _ = writeln!(out, "\tv_{} [label=\"{}\",shape=box{}]", id.0, base, color);
            }
        }
        out.push_str("}\n");
        out
    }
}
