//! Pairwise path consistency.
//!
//! Two paths are consistent when they share an identical subpath that is
//! terminal with respect to both: the overlap must run into a path
//! boundary on each side, so neither path claims flanking material the
//! other contradicts. The check enumerates every index pair at which the
//! second path's root occurs in both paths, reconciles orientation by
//! reverse-complementing the second path when the seed orientations
//! disagree, extends each seed outward as far as the paths agree, and
//! keeps the longest overlap found.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::path::{ContigKey, ContigPath};
use crate::merging::MergeError;

/// The maximal common subpath of two paths: inclusive index ranges on each
/// path, plus whether path 2 must be reverse-complemented to align.
///
/// `start2`/`end2` index into path 2 *after* applying `flip2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    pub start1: usize,
    pub end1: usize,
    pub start2: usize,
    pub end2: usize,
    pub flip2: bool,
}

struct Candidate {
    start1: usize,
    end1: usize,
    start2: usize,
    end2: usize,
    flipped: bool,
    duplicate: bool,
}

/// Decide whether `path2` (rooted at `path2_root`) is consistent with
/// `path1`, returning the winning alignment if so.
///
/// Pure with respect to its arguments: orientation reconciliation happens
/// on an internal copy, and the returned `flip2` tells the caller whether
/// the stored path must be reverse-complemented before using the range.
///
/// # Errors
///
/// Returns `MergeError::InconsistentState` when the winning overlap fails
/// the boundary invariant (it must touch index 0 in at least one path and
/// the last index in at least one path).
pub fn check_path_consistency(
    path1: &ContigPath,
    path2: &ContigPath,
    path2_root: ContigKey,
) -> Result<Option<Alignment>, MergeError> {
    // A single-node second path overlaps everywhere its root occurs and
    // can contribute nothing; treat it as inconsistent.
    if path1.is_empty() || path2.len() < 2 {
        return Ok(None);
    }

    let anchors1 = path1.positions_of(path2_root);
    let anchors2 = path2.positions_of(path2_root);
    if anchors1.is_empty() || anchors2.is_empty() {
        return Ok(None);
    }

    let max1 = path1.len() - 1;
    let max2 = path2.len() - 1;

    // The flip state persists across seed pairs; an odd number of flips
    // survives the loop. Anchor indices into path 2 were taken on the
    // original orientation and are mirrored while flipped.
    let mut p2 = path2.clone();
    let mut flipped = false;
    let mut candidates: BTreeMap<usize, Candidate> = BTreeMap::new();

    for &i in &anchors1 {
        for &j in &anchors2 {
            let mut start1 = i;
            let mut end1 = i;
            let mut start2 = if flipped { max2 - j } else { j };

            if path1[start1].reverse != p2[start2].reverse {
                p2.reverse_complement();
                flipped = !flipped;
                start2 = max2 - start2;
            }
            let mut end2 = start2;

            let mut low_valid = true;
            loop {
                if path1[start1] != p2[start2] {
                    low_valid = false;
                    break;
                }
                if start1 == 0 || start2 == 0 {
                    break;
                }
                start1 -= 1;
                start2 -= 1;
            }

            let mut high_valid = true;
            loop {
                if path1[end1] != p2[end2] {
                    high_valid = false;
                    break;
                }
                if end1 == max1 || end2 == max2 {
                    break;
                }
                end1 += 1;
                end2 += 1;
            }

            if low_valid && high_valid {
                let span = end1 - start1;
                candidates
                    .entry(span)
                    .and_modify(|c| c.duplicate = true)
                    .or_insert(Candidate {
                        start1,
                        end1,
                        start2,
                        end2,
                        flipped,
                        duplicate: false,
                    });
            }
        }
    }

    let Some((&span, winner)) = candidates.iter().next_back() else {
        debug!(root = %path2_root, "no consistent overlap");
        return Ok(None);
    };

    // Terminal extension bottomed out on a boundary, not a mismatch, so
    // the winner must touch the start of one path and the end of one.
    if !(winner.start1 == 0 || winner.start2 == 0)
        || !(winner.end1 == max1 || winner.end2 == max2)
    {
        return Err(MergeError::InconsistentState(format!(
            "winning overlap [{}..{}]/[{}..{}] touches no path boundary",
            winner.start1, winner.end1, winner.start2, winner.end2
        )));
    }

    // Equal-length overlaps at different positions are ambiguous unless
    // the winner already covers the whole of the shorter path.
    if winner.duplicate && span != max1.min(max2) {
        debug!(root = %path2_root, "ambiguous overlap of duplicated length");
        return Ok(None);
    }

    if winner.flipped != flipped {
        p2.reverse_complement();
    }

    for offset in 0..=span {
        if path1[winner.start1 + offset].id != p2[winner.start2 + offset].id {
            debug!(root = %path2_root, "interior id mismatch");
            return Ok(None);
        }
    }

    Ok(Some(Alignment {
        start1: winner.start1,
        end1: winner.end1,
        start2: winner.start2,
        end2: winner.end2,
        flip2: winner.flipped,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::path::PathNode;

    fn path(nodes: &[(u32, bool)]) -> ContigPath {
        ContigPath::from_nodes(
            nodes
                .iter()
                .map(|&(id, reverse)| PathNode::new(ContigKey(id), reverse))
                .collect(),
        )
    }

    const A: u32 = 0;
    const B: u32 = 1;
    const C: u32 = 2;
    const D: u32 = 3;
    const E: u32 = 4;

    #[test]
    fn test_suffix_prefix_overlap() {
        let p1 = path(&[(A, false), (B, false), (C, false)]);
        let p2 = path(&[(C, false), (D, false), (E, false)]);
        let alignment = check_path_consistency(&p1, &p2, ContigKey(C))
            .unwrap()
            .unwrap();
        assert_eq!(
            alignment,
            Alignment {
                start1: 2,
                end1: 2,
                start2: 0,
                end2: 0,
                flip2: false
            }
        );
    }

    #[test]
    fn test_reverse_complement_alignment() {
        // Path 2 is the reverse-complement rendering of path 1.
        let p1 = path(&[(A, false), (B, false), (C, false)]);
        let p2 = path(&[(C, true), (B, true), (A, true)]);
        let alignment = check_path_consistency(&p1, &p2, ContigKey(C))
            .unwrap()
            .unwrap();
        assert!(alignment.flip2);
        assert_eq!((alignment.start1, alignment.end1), (0, 2));
        assert_eq!((alignment.start2, alignment.end2), (0, 2));
    }

    #[test]
    fn test_disagreeing_flank_rejected() {
        // Path 2 claims E after C where path 1 claims D: the overlap ends
        // on a mismatch, not a boundary.
        let p1 = path(&[(A, false), (B, false), (C, false), (D, false)]);
        let p2 = path(&[(C, false), (E, false), (A, false)]);
        assert_eq!(
            check_path_consistency(&p1, &p2, ContigKey(C)).unwrap(),
            None
        );
    }

    #[test]
    fn test_orientation_disagreement_rejected() {
        // Ids agree but path 2 reads C reverse-complemented where path 1
        // reads it forward.
        let p1 = path(&[(A, false), (B, false), (C, false)]);
        let p2 = path(&[(B, false), (C, true)]);
        assert_eq!(
            check_path_consistency(&p1, &p2, ContigKey(B)).unwrap(),
            None
        );
    }

    #[test]
    fn test_root_absent_from_path1() {
        let p1 = path(&[(A, false), (B, false)]);
        let p2 = path(&[(C, false), (D, false)]);
        assert_eq!(
            check_path_consistency(&p1, &p2, ContigKey(C)).unwrap(),
            None
        );
    }

    #[test]
    fn test_singleton_second_path_rejected() {
        // Scenario: two trivial alignments of a lone root at different
        // positions carry no usable overlap.
        let p1 = path(&[(A, false), (B, false), (C, false), (B, false), (D, false)]);
        let p2 = path(&[(B, false)]);
        assert_eq!(
            check_path_consistency(&p1, &p2, ContigKey(B)).unwrap(),
            None
        );
    }

    #[test]
    fn test_ambiguous_duplicate_length_rejected() {
        // The root D occurs at both ends of both paths; the two seed pairs
        // that survive produce equal-length overlaps at different
        // positions, shorter than either path.
        let p1 = path(&[(D, false), (A, false), (D, false)]);
        let p2 = path(&[(D, false), (B, false), (D, false)]);
        assert_eq!(
            check_path_consistency(&p1, &p2, ContigKey(D)).unwrap(),
            None
        );
    }

    #[test]
    fn test_duplicate_length_covering_shorter_path_accepted() {
        // Both seeds align the whole of path 2; the ambiguity is benign.
        let p1 = path(&[(B, false), (C, false), (B, false), (C, false)]);
        let p2 = path(&[(B, false), (C, false)]);
        let alignment = check_path_consistency(&p1, &p2, ContigKey(B))
            .unwrap()
            .unwrap();
        assert_eq!(alignment.end1 - alignment.start1, 1);
    }

    #[test]
    fn test_interior_overlap_is_terminal_in_shorter_path() {
        let p1 = path(&[(A, false), (B, false), (C, false), (D, false)]);
        let p2 = path(&[(B, false), (C, false)]);
        let alignment = check_path_consistency(&p1, &p2, ContigKey(B))
            .unwrap()
            .unwrap();
        assert_eq!((alignment.start1, alignment.end1), (1, 2));
        assert_eq!((alignment.start2, alignment.end2), (0, 1));
        assert!(!alignment.flip2);
    }

    #[test]
    fn test_caller_paths_not_mutated() {
        let p1 = path(&[(A, false), (B, false), (C, false)]);
        let p2 = path(&[(C, true), (B, true), (A, true)]);
        let before = p2.clone();
        let _ = check_path_consistency(&p1, &p2, ContigKey(C)).unwrap();
        assert_eq!(p2, before);
    }
}
