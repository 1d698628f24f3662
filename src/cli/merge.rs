//! The merge pipeline behind the CLI: parse inputs, link to a fixed
//! point, emit.

use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{bail, Context};
use tracing::info;

use crate::cli::Cli;
use crate::core::contig::ContigSet;
use crate::core::registry::ContigRegistry;
use crate::merging::{merge_paths, unique_paths};
use crate::output::{write_merged_fasta, write_path_records};
use crate::parsing::fasta::read_contigs;
use crate::parsing::paths::read_paths;

/// Execute a merge invocation.
///
/// # Errors
///
/// Returns an error for usage violations (missing `-k`/`-o` in FASTA
/// mode), unreadable inputs, grammar violations, or any merge failure;
/// `main` reports it as a single diagnostic and exits non-zero.
pub fn run(args: &Cli) -> anyhow::Result<()> {
    let (contig_file, path_file) = match args.inputs.as_slice() {
        [paths] => (None, paths.as_path()),
        [contigs, paths] => (Some(contigs.as_path()), paths.as_path()),
        _ => bail!("expected [CONTIGS] PATHS"),
    };

    let mut registry = ContigRegistry::new();

    let contigs: Option<ContigSet> = match contig_file {
        Some(file) => {
            if args.kmer.unwrap_or(0) == 0 {
                bail!("missing -k,--kmer option");
            }
            if args.out.is_none() {
                bail!("missing -o,--out option");
            }
            let set = read_contigs(file, &mut registry)
                .with_context(|| format!("{}", file.display()))?;
            registry.lock();
            info!("read {} contigs", set.len());
            Some(set)
        }
        None => None,
    };

    let original = read_paths(path_file, &mut registry)
        .with_context(|| format!("{}", path_file.display()))?;
    info!("read {} path records", original.len());

    let results = merge_paths(&original)?;
    let unique = unique_paths(&results);
    info!("{} canonical paths after linking", unique.len());

    match contigs {
        None => {
            // Paths-only mode writes to -o when given, stdout otherwise.
            let mut out: Box<dyn Write> = match &args.out {
                Some(file) => Box::new(BufWriter::new(
                    File::create(file).with_context(|| format!("{}", file.display()))?,
                )),
                None => Box::new(std::io::stdout().lock()),
            };
            write_path_records(&mut out, &unique, &registry)?;
            out.flush()?;
        }
        Some(contigs) => {
            let (Some(k), Some(out_file)) = (args.kmer, &args.out) else {
                bail!("missing -k,--kmer or -o,--out option");
            };
            for path in &unique {
                info!("merging {}", path.to_text(&registry, ',')?);
            }

            let file = File::create(out_file)
                .with_context(|| format!("{}", out_file.display()))?;
            let mut out = BufWriter::new(file);
            let summary = write_merged_fasta(&mut out, &unique, &contigs, &registry, k)?;
            out.flush()?;

            eprintln!(
                "The minimum coverage of single-end contigs is {}.",
                summary.min_all
            );
            eprintln!(
                "The minimum coverage of merged contigs is {}.",
                summary.min_used
            );
            if summary.min_all < summary.min_used {
                eprintln!(
                    "Consider increasing the coverage threshold parameter, c, to {}.",
                    summary.min_used
                );
            }
        }
    }

    Ok(())
}
