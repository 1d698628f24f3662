//! Command-line interface for path-merge.
//!
//! One executable, two modes selected by the positional arguments:
//!
//! ```text
//! # Merge path records only
//! path-merge paths.txt
//!
//! # Merge paths and splice the contigs into FASTA (requires -k and -o)
//! path-merge contigs.fa paths.txt -k 25 -o merged.fa
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser};

pub mod merge;

#[derive(Parser)]
#[command(name = "path-merge")]
#[command(version)]
#[command(about = "Merge consistent contig paths, and optionally the contigs themselves")]
#[command(
    long_about = "Merge paths and contigs. With CONTIGS the output is FASTA;\n\
                  with only PATHS the merged path records are printed.\n\n\
                  CONTIGS  contigs in FASTA format (.fa or .fa.gz)\n\
                  PATHS    paths through these contigs"
)]
pub struct Cli {
    /// Input files: [CONTIGS] PATHS
    #[arg(required = true, num_args = 1..=2, value_name = "[CONTIGS] PATHS")]
    pub inputs: Vec<PathBuf>,

    /// k-mer size (required with CONTIGS)
    #[arg(short, long = "kmer", value_name = "KMER_SIZE")]
    pub kmer: Option<u32>,

    /// Write result to FILE (required with CONTIGS)
    #[arg(short, long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Display verbose output (repeat for debug traces)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
