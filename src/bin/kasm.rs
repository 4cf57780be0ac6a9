use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use kasm::cli::counters::RegionCounters;
use kasm::cli::io::{parse_fasta, read_batch, read_reference};
use kasm::cli::opts::{AlignerArgs, AssemblyArgs};
use kasm::kasm::align::{align, MAX_QUERY_LEN, MAX_REF_LEN};
use kasm::kasm::assemble::{assemble, ERROR_SENTINEL, REPEAT_SENTINEL};
use rayon::prelude::*;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Command-line options for the localized assembler
#[derive(Parser)]
#[command(
    name = "kasm",
    about = "Assemble localized read batches into contigs",
    long_about = "Assemble localized read batches into contigs.


EXAMPLES:
    // Assemble two regions and align the contigs against a reference window
    $ kasm -i region1.reads -i region2.reads -o out/ -k 43 --read-length 100 -r region.ref.fa -t 4
    ",
    version = "0.1.0"
)]
struct Cli {
    /// Read batch files, one region per file [path]
    #[clap(short = 'i', long, num_args = 1.., required = true, help_heading = "Core")]
    pub reads: Vec<PathBuf>,

    /// Output directory for results [path]
    #[clap(short = 'o', long, value_parser, required = true, help_heading = "Core")]
    pub output_dir: PathBuf,

    /// Number of threads to use (one region per thread) [integer]
    #[clap(short = 't', long, default_value = "1", help_heading = "Core")]
    pub n_threads: usize,

    /// Reference sequence to align contigs against [path]
    #[clap(short = 'r', long, help_heading = "Alignment")]
    pub reference: Option<PathBuf>,

    #[command(flatten)]
    pub assembly: AssemblyArgs,

    #[command(flatten)]
    pub aligner: AlignerArgs,
}

fn main() {
    // Catch and handle errors
    if let Err(e) = run() {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
    std::process::exit(0);
}

fn run() -> Result<()> {
    let start_time = Instant::now();
    let opt = Cli::parse();
    let cfg = opt.assembly.to_config();
    cfg.validate()?;
    let scoring = opt.aligner.to_scoring();

    create_dir_all(&opt.output_dir).context("Cannot create output_dir")?;

    let reference = match &opt.reference {
        Some(path) => {
            println!("Start: Loading reference");
            let refseq = read_reference(path)?;
            if refseq.len() > MAX_REF_LEN {
                bail!(
                    "Reference {:?} is {} bp; the aligner accepts at most {}",
                    path,
                    refseq.len(),
                    MAX_REF_LEN
                );
            }
            Some(refseq)
        }
        None => None,
    };

    // Configure global thread-pool size
    rayon::ThreadPoolBuilder::new()
        .num_threads(opt.n_threads)
        .build_global()
        .context("building Rayon thread pool")?;

    let pb = Arc::new(ProgressBar::new(opt.reads.len() as u64));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("       {bar:40} {pos}/{len} [{elapsed_precise}] {msg}")
            .unwrap(),
    );

    println!("Start: Assembling regions");
    pb.set_position(0);

    let counters: Vec<RegionCounters> = opt
        .reads
        .par_iter()
        .map(|path| -> Result<RegionCounters> {
            let prefix = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "region".to_string());

            let batch = read_batch(path, cfg.read_length)?;
            let contigs = assemble(&batch, &prefix, &cfg)?;

            let mut counts = RegionCounters {
                regions: 1,
                ..Default::default()
            };

            if contigs == REPEAT_SENTINEL {
                counts.repeats = 1;
            } else if contigs == ERROR_SENTINEL {
                counts.errors = 1;
            } else if contigs.is_empty() {
                counts.empty = 1;
            } else {
                counts.assembled = 1;
                let records = parse_fasta(&contigs);
                counts.contigs = records.len() as u64;

                let fa_path = opt.output_dir.join(format!("{}.fa", prefix));
                let mut fa = BufWriter::new(
                    File::create(&fa_path).context(format!("Create {:?} fail", fa_path))?,
                );
                fa.write_all(contigs.as_bytes())
                    .context("Write contigs fail")?;

                if let Some(refseq) = &reference {
                    let aln_path = opt.output_dir.join(format!("{}.aln.tsv", prefix));
                    let mut aln = BufWriter::new(
                        File::create(&aln_path).context(format!("Create {:?} fail", aln_path))?,
                    );
                    for (name, seq) in &records {
                        if seq.len() > MAX_QUERY_LEN {
                            eprintln!(
                                "Skipping alignment of {} ({} bp exceeds {})",
                                name,
                                seq.len(),
                                MAX_QUERY_LEN
                            );
                            continue;
                        }
                        let alignment = align(seq.as_bytes(), refseq, &scoring)?;
                        writeln!(aln, "{}\t{}", name, alignment)
                            .context("Write alignment fail")?;
                    }
                }
            }

            pb.inc(1);
            Ok(counts)
        })
        .collect::<Result<_>>()?; // short-circuits on the first Err

    pb.finish_with_message("| Finished assembling");

    let mut totals = RegionCounters::default();
    for c in counters {
        totals += c;
    }

    println!(
        "Regions: {} | assembled: {} ({} contigs) | empty: {} | repeats: {} | errors: {}",
        totals.regions,
        totals.assembled,
        totals.contigs,
        totals.empty,
        totals.repeats,
        totals.errors
    );

    let elapsed = start_time.elapsed();
    println!("Elapsed time: {:.2?}", elapsed);
    Ok(())
}
