use crate::kasm::align::Scoring;
use crate::kasm::config::AssemblyConfig;
use clap::{value_parser, Args};

#[derive(Debug, Args)]
pub struct AssemblyArgs {
    /// Length of every read in the input batches [integer]
    #[clap(long, alias = "rl", default_value = "100", value_parser = value_parser!(u16).range(1..=1000), help_heading="Assembly")]
    pub read_length: u16,

    /// K-mer size; must be odd and smaller than the read length [integer]
    #[clap(short = 'k', long, default_value = "43", value_parser = value_parser!(u16).range(1..=200), help_heading="Assembly")]
    pub kmer_size: u16,

    /// Minimum reads per k-mer; 1 disables the frequency sweep [integer]
    #[clap(long, alias = "mnf", default_value = "2", value_parser = value_parser!(u16).range(1..), help_heading="Assembly")]
    pub min_node_freq: u16,

    /// Per-position quality-sum threshold for pruning [integer]
    #[clap(long, alias = "mbq", default_value = "60", value_parser = value_parser!(u16).range(0..), help_heading="Assembly")]
    pub min_base_quality: u16,

    /// Minimum per-sample edge frequency ratio, 0..=1 [float]
    #[clap(long, alias = "mer", default_value = "0.02", help_heading = "Assembly")]
    pub min_edge_ratio: f64,

    /// Hard cap on live graph nodes per region [integer]
    #[clap(long, default_value = "900000", help_heading = "Limits")]
    pub max_nodes: usize,

    /// Hard cap on emitted contigs per region [integer]
    #[clap(long, default_value = "500000", help_heading = "Limits")]
    pub max_contigs: usize,

    /// Hard cap on branches explored per root node [integer]
    #[clap(long, default_value = "5000", help_heading = "Limits")]
    pub max_paths_from_root: usize,

    /// Abort a region when a contig revisits a node [flag]
    #[clap(long, help_heading = "Assembly")]
    pub truncate_on_repeat: bool,

    /// Verbose per-region diagnostics on stderr [flag]
    #[clap(long, help_heading = "Assembly")]
    pub debug: bool,
}

impl AssemblyArgs {
    pub fn to_config(&self) -> AssemblyConfig {
        AssemblyConfig {
            read_length: self.read_length as usize,
            kmer_size: self.kmer_size as usize,
            min_node_freq: self.min_node_freq,
            min_base_quality: self.min_base_quality,
            min_edge_ratio: self.min_edge_ratio,
            max_nodes: self.max_nodes,
            max_contigs: self.max_contigs,
            max_paths_from_root: self.max_paths_from_root,
            truncate_on_repeat: self.truncate_on_repeat,
            debug: self.debug,
        }
    }
}

#[derive(Debug, Args)]
pub struct AlignerArgs {
    /// Match score [integer]
    #[clap(long, default_value = "8", help_heading = "Alignment")]
    pub match_score: i32,

    /// Mismatch penalty [integer]
    #[clap(long, default_value = "-32", allow_hyphen_values = true, help_heading = "Alignment")]
    pub mismatch_penalty: i32,

    /// Gap open penalty [integer]
    #[clap(long, default_value = "-48", allow_hyphen_values = true, help_heading = "Alignment")]
    pub gap_open: i32,

    /// Gap extend penalty [integer]
    #[clap(long, default_value = "-1", allow_hyphen_values = true, help_heading = "Alignment")]
    pub gap_extend: i32,
}

impl AlignerArgs {
    pub fn to_scoring(&self) -> Scoring {
        Scoring {
            match_score: self.match_score,
            mismatch_penalty: self.mismatch_penalty,
            gap_open: self.gap_open,
            gap_extend: self.gap_extend,
        }
    }
}
