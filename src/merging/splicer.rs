//! Splicing contig sequences along a merged path.
//!
//! Adjacent contigs in a path overlap by exactly k−1 symbols. The splicer
//! seeds the accumulator with the oriented root sequence and, for every
//! following node, verifies that the accumulator's k−1 suffix equals the
//! incoming sequence's k−1 prefix before appending the remainder. Coverage
//! is summed across all members.

use crate::core::contig::{Contig, ContigSet};
use crate::core::path::{ContigPath, PathNode};
use crate::core::sequence::reverse_complement;
use crate::merging::MergeError;

/// A spliced sequence and the summed coverage of its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplicedContig {
    pub seq: Vec<u8>,
    pub coverage: u64,
}

/// Splice the oriented sequences of `path` into one sequence under the
/// k−1 overlap contract.
///
/// # Errors
///
/// Returns `MergeError::MissingContig` if a node is outside the contig
/// table, or `MergeError::OverlapViolation` naming both sequences when a
/// k−1 window disagrees (or is shorter than k−1 symbols).
pub fn splice_path(
    path: &ContigPath,
    contigs: &ContigSet,
    k: u32,
) -> Result<SplicedContig, MergeError> {
    let overlap = k.saturating_sub(1) as usize;

    let root = path.first();
    let root_contig = lookup(contigs, root)?;
    let mut seq = oriented_seq(root_contig, root, contigs);
    let mut coverage = u64::from(root_contig.coverage);
    let mut left_name = root_contig.name.as_str();

    for &node in &path.nodes()[1..] {
        let contig = lookup(contigs, node)?;
        let incoming = oriented_seq(contig, node, contigs);

        if seq.len() < overlap || incoming.len() < overlap {
            return Err(overlap_violation(left_name, contig, &seq, &incoming, overlap));
        }
        let left_end = &seq[seq.len() - overlap..];
        let right_begin = &incoming[..overlap];
        if left_end != right_begin {
            return Err(overlap_violation(left_name, contig, &seq, &incoming, overlap));
        }

        seq.extend_from_slice(&incoming[overlap..]);
        coverage += u64::from(contig.coverage);
        left_name = contig.name.as_str();
    }

    Ok(SplicedContig { seq, coverage })
}

fn lookup<'a>(contigs: &'a ContigSet, node: PathNode) -> Result<&'a Contig, MergeError> {
    contigs.get(node.id).ok_or(MergeError::MissingContig(node.id))
}

fn oriented_seq(contig: &Contig, node: PathNode, contigs: &ContigSet) -> Vec<u8> {
    if node.reverse {
        reverse_complement(&contig.seq, contigs.alphabet())
    } else {
        contig.seq.clone()
    }
}

fn overlap_violation(
    left_name: &str,
    right: &Contig,
    seq: &[u8],
    incoming: &[u8],
    overlap: usize,
) -> MergeError {
    let window = |s: &[u8], from_end: bool| -> String {
        if s.len() < overlap {
            String::from_utf8_lossy(s).into_owned()
        } else if from_end {
            String::from_utf8_lossy(&s[s.len() - overlap..]).into_owned()
        } else {
            String::from_utf8_lossy(&s[..overlap]).into_owned()
        }
    };
    MergeError::OverlapViolation {
        left: left_name.to_string(),
        right: right.name.clone(),
        left_end: window(seq, true),
        right_begin: window(incoming, false),
    }
}
