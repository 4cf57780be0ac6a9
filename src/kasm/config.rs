use anyhow::{bail, Result};

/// Longest read the record layout supports.
pub const MAX_READ_LENGTH: usize = 1000;

/// Longest k-mer the graph supports.
pub const MAX_KMER_SIZE: usize = 200;

/// Hard ceiling on a single contig body, in bases.
pub const MAX_CONTIG_SIZE: usize = 5000;

/// Hard ceiling on the concatenated FASTA text returned per invocation.
pub const MAX_TOTAL_CONTIG_LEN: usize = 10_000_000;

/// Node and per-sample frequencies saturate here.
pub const MAX_FREQUENCY: u16 = 32766;

/// K-mer windows containing any base below this phred value are excluded
/// from assembly outright, independent of the configurable qual-sum sweep.
pub const MIN_WINDOW_BASE_QUALITY: u8 = 13;

/// Upper bound on distinct sample ids in one record batch.
pub const MAX_SAMPLES: usize = 8;

/// Per-invocation assembly parameters.
///
/// One instance is threaded through builder, pruner, condenser and
/// enumerator; nothing is ambient, so assemblies on different threads can
/// carry different settings.
#[derive(Debug, Clone)]
pub struct AssemblyConfig {
    /// Length of every read in the batch
    pub read_length: usize,
    /// K-mer window length (odd)
    pub kmer_size: usize,
    /// Minimum reads per k-mer; 1 disables the frequency sweep
    pub min_node_freq: u16,
    /// Per-position qual-sum threshold for the quality sweep
    pub min_base_quality: u16,
    /// Minimum per-sample edge frequency fraction, 0..=1
    pub min_edge_ratio: f64,
    /// Hard cap on live graph nodes
    pub max_nodes: usize,
    /// Hard cap on emitted contigs
    pub max_contigs: usize,
    /// Hard cap on branches explored per root
    pub max_paths_from_root: usize,
    /// Abort the whole enumeration when a contig revisits a node
    pub truncate_on_repeat: bool,
    /// Verbose per-invocation diagnostics on stderr
    pub debug: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        AssemblyConfig {
            read_length: 100,
            kmer_size: 43,
            min_node_freq: 2,
            min_base_quality: 60,
            min_edge_ratio: 0.02,
            max_nodes: 900_000,
            max_contigs: 500_000,
            max_paths_from_root: 5000,
            truncate_on_repeat: false,
            debug: false,
        }
    }
}

impl AssemblyConfig {
    /// Contigs must extend past a single read to be worth reporting.
    pub fn min_contig_length(&self) -> usize {
        self.read_length + 1
    }

    /// Fixed width of one input record: sample + strand + bases + quals.
    pub fn record_len(&self) -> usize {
        2 * self.read_length + 2
    }

    /// Reject parameter combinations the assembler cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.read_length < 1 || self.read_length > MAX_READ_LENGTH {
            bail!(
                "Illegal read length {}. Must be 1..={}",
                self.read_length,
                MAX_READ_LENGTH
            );
        }
        if self.kmer_size < 1 || self.kmer_size > MAX_KMER_SIZE {
            bail!(
                "Illegal k-mer size {}. Must be 1..={}",
                self.kmer_size,
                MAX_KMER_SIZE
            );
        }
        if self.kmer_size % 2 == 0 {
            bail!("Illegal k-mer size {}. Must be odd", self.kmer_size);
        }
        if self.kmer_size >= self.read_length {
            bail!(
                "k-mer size {} does not fit read length {}",
                self.kmer_size,
                self.read_length
            );
        }
        if !(0.0..=1.0).contains(&self.min_edge_ratio) {
            bail!(
                "Illegal min edge ratio {}. Must be within [0, 1]",
                self.min_edge_ratio
            );
        }
        Ok(())
    }
}
