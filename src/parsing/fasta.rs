//! Contig input in FASTA format, using noodles.
//!
//! Deflines carry a `<length> <coverage>` comment after the id. Names are
//! interned into the registry in file order, so the dense key of a contig
//! equals its index in the returned table. Plain and gzip-compressed files
//! are supported (`.gz`).

use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use noodles::fasta;
use thiserror::Error;

use crate::core::contig::{Contig, ContigSet};
use crate::core::registry::ContigRegistry;

#[derive(Error, Debug)]
pub enum ContigFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid FASTA record: {0}")]
    InvalidRecord(String),

    #[error("duplicate contig name '{0}'")]
    DuplicateName(String),

    #[error("no contigs found in FASTA input")]
    Empty,
}

/// Check if the path is a gzipped file
fn is_gzipped(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().ends_with(".gz")
}

/// Read every contig from a FASTA file, interning names densely.
///
/// # Errors
///
/// Returns `ContigFileError::Io` if the file cannot be read,
/// `ContigFileError::InvalidRecord` if a record fails to parse,
/// `ContigFileError::DuplicateName` if a contig name repeats, or
/// `ContigFileError::Empty` if the file holds no records.
pub fn read_contigs(
    path: &Path,
    registry: &mut ContigRegistry,
) -> Result<ContigSet, ContigFileError> {
    if is_gzipped(path) {
        let file = std::fs::File::open(path)?;
        let decoder = GzDecoder::new(file);
        let mut reader = fasta::io::Reader::new(BufReader::new(decoder));
        read_contigs_from(&mut reader, registry)
    } else {
        let file = std::fs::File::open(path)?;
        let mut reader = fasta::io::Reader::new(BufReader::new(file));
        read_contigs_from(&mut reader, registry)
    }
}

fn read_contigs_from<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
    registry: &mut ContigRegistry,
) -> Result<ContigSet, ContigFileError> {
    let mut contigs = Vec::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ContigFileError::InvalidRecord(format!("failed to parse record: {e}")))?;

        let name = String::from_utf8_lossy(record.name()).to_string();
        let coverage = record
            .description()
            .map(|d| String::from_utf8_lossy(d).to_string())
            .unwrap_or_default()
            .split_whitespace()
            .nth(1)
            .and_then(|field| field.parse::<u32>().ok())
            .unwrap_or(0);

        // Dense interning in file order: a fresh name gets key == index,
        // anything smaller is a repeated defline.
        let key = registry
            .intern(&name)
            .map_err(|e| ContigFileError::InvalidRecord(e.to_string()))?;
        if key.0 as usize != contigs.len() {
            return Err(ContigFileError::DuplicateName(name));
        }

        let seq = record.sequence().as_ref().to_vec();
        contigs.push(Contig::new(name, seq, coverage));
    }

    if contigs.is_empty() {
        return Err(ContigFileError::Empty);
    }

    Ok(ContigSet::new(contigs))
}
