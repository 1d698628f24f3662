//! Emission of merged paths and merged contigs.
//!
//! Paths-only mode prints one numbered record per unique canonical path.
//! FASTA mode splices every canonical path into a merged record, re-emits
//! the input contigs no path used, and summarises per-k-mer coverage so
//! the caller can report threshold advice.

use std::collections::HashSet;
use std::io::Write;

use thiserror::Error;

use crate::core::contig::ContigSet;
use crate::core::path::{ContigKey, ContigPath};
use crate::core::registry::{ContigRegistry, RegistryError};
use crate::merging::{splice_path, MergeError};

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Minimum per-k-mer coverage across the contig set.
///
/// A contig contributes `coverage / (length − k + 1)` when its coverage is
/// non-zero and it is longer than k−1 symbols; others are excluded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageSummary {
    /// Minimum over all input contigs.
    pub min_all: f64,
    /// Minimum over contigs that appear in some canonical path.
    pub min_used: f64,
}

/// Write one `<ordinal> <elem><sign> …` line per canonical path, ordinals
/// from 0.
///
/// # Errors
///
/// Returns `OutputError::Io` on write failure or `OutputError::Registry`
/// if a path references an unallocated key.
pub fn write_path_records<W: Write>(
    out: &mut W,
    paths: &[ContigPath],
    registry: &ContigRegistry,
) -> Result<(), OutputError> {
    for (ordinal, path) in paths.iter().enumerate() {
        writeln!(out, "{ordinal} {}", path.to_text(registry, ' ')?)?;
    }
    Ok(())
}

/// Write FASTA output: unused input contigs unchanged, then one merged
/// record per canonical path, returning the coverage summary.
///
/// Merged record ids continue one past the highest numeric contig name;
/// the comment is `<length> <coverage> <path>` with a comma-joined path.
///
/// # Errors
///
/// Returns `OutputError::Io` on write failure, `OutputError::Merge` if
/// splicing fails, or `OutputError::Registry` on an unallocated key.
pub fn write_merged_fasta<W: Write>(
    out: &mut W,
    paths: &[ContigPath],
    contigs: &ContigSet,
    registry: &ContigRegistry,
    k: u32,
) -> Result<CoverageSummary, OutputError> {
    let used: HashSet<ContigKey> = paths
        .iter()
        .flat_map(|path| path.nodes().iter().map(|node| node.id))
        .collect();

    let mut min_all = f64::INFINITY;
    let mut min_used = f64::INFINITY;

    for (key, contig) in contigs.iter() {
        let is_used = used.contains(&key);
        if !is_used {
            writeln!(out, ">{} {} {}", contig.name, contig.seq.len(), contig.coverage)?;
            out.write_all(&contig.seq)?;
            writeln!(out)?;
        }

        if contig.coverage > 0 {
            let windows = contig.seq.len() as i64 - i64::from(k) + 1;
            if windows > 0 {
                #[allow(clippy::cast_precision_loss)]
                let per_kmer = f64::from(contig.coverage) / windows as f64;
                min_all = min_all.min(per_kmer);
                if is_used {
                    min_used = min_used.min(per_kmer);
                }
            }
        }
    }

    let mut next_id = next_output_id(contigs);
    for path in paths {
        let spliced = splice_path(path, contigs, k)?;
        let text = path.to_text(registry, ',')?;
        writeln!(
            out,
            ">{next_id} {} {} {text}",
            spliced.seq.len(),
            spliced.coverage
        )?;
        out.write_all(&spliced.seq)?;
        writeln!(out)?;
        next_id += 1;
    }

    Ok(CoverageSummary { min_all, min_used })
}

/// First id for merged records: one past the highest numeric contig name,
/// or the contig count when no name is numeric.
fn next_output_id(contigs: &ContigSet) -> u64 {
    contigs
        .iter()
        .filter_map(|(_, contig)| contig.name.parse::<u64>().ok())
        .max()
        .map_or(contigs.len() as u64, |highest| highest + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::contig::Contig;
    use crate::core::path::PathNode;

    fn registry_with(names: &[&str]) -> ContigRegistry {
        let mut registry = ContigRegistry::new();
        for name in names {
            registry.intern(name).unwrap();
        }
        registry
    }

    fn path(nodes: &[(u32, bool)]) -> ContigPath {
        ContigPath::from_nodes(
            nodes
                .iter()
                .map(|&(id, reverse)| PathNode::new(ContigKey(id), reverse))
                .collect(),
        )
    }

    #[test]
    fn test_path_records() {
        let registry = registry_with(&["a", "b", "c"]);
        let paths = vec![
            path(&[(0, false), (1, false), (2, true)]),
            path(&[(1, false), (2, false)]),
        ];
        let mut out = Vec::new();
        write_path_records(&mut out, &paths, &registry).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0 a+ b+ c-\n1 b+ c+\n"
        );
    }

    #[test]
    fn test_merged_fasta_output() {
        let registry = registry_with(&["0", "1", "2"]);
        let contigs = ContigSet::new(vec![
            Contig::new("0", b"ACGTA".to_vec(), 6),
            Contig::new("1", b"TACCG".to_vec(), 3),
            Contig::new("2", b"GGGG".to_vec(), 8),
        ]);
        let paths = vec![path(&[(0, false), (1, false)])];

        let mut out = Vec::new();
        let summary =
            write_merged_fasta(&mut out, &paths, &contigs, &registry, 3).unwrap();

        let text = String::from_utf8(out).unwrap();
        // Contig 2 is unused and passes through unchanged; the merged
        // record takes id 3 (one past the highest numeric name).
        assert_eq!(text, ">2 4 8\nGGGG\n>3 8 9 0+,1+\nACGTACCG\n");

        // Per-k-mer coverage: 6/3, 3/3 (used), 8/2 (unused).
        assert!((summary.min_all - 1.0).abs() < 1e-9);
        assert!((summary.min_used - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_and_zero_coverage_contigs_excluded_from_summary() {
        let registry = registry_with(&["a", "b"]);
        let contigs = ContigSet::new(vec![
            Contig::new("a", b"AC".to_vec(), 50),
            Contig::new("b", b"ACGTA".to_vec(), 0),
        ]);
        let mut out = Vec::new();
        let summary =
            write_merged_fasta(&mut out, &[], &contigs, &registry, 3).unwrap();
        // "a" is shorter than k−1 windows allow, "b" has zero coverage.
        assert!(summary.min_all.is_infinite());
        assert!(summary.min_used.is_infinite());
    }

    #[test]
    fn test_output_id_falls_back_to_contig_count() {
        let contigs = ContigSet::new(vec![
            Contig::new("ctg_a", b"ACGT".to_vec(), 1),
            Contig::new("ctg_b", b"ACGT".to_vec(), 1),
        ]);
        assert_eq!(next_output_id(&contigs), 2);

        let contigs = ContigSet::new(vec![
            Contig::new("7", b"ACGT".to_vec(), 1),
            Contig::new("3", b"ACGT".to_vec(), 1),
        ]);
        assert_eq!(next_output_id(&contigs), 8);
    }
}
