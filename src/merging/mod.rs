//! The path consistency and merging engine.
//!
//! `consistency` decides whether two paths agree on a shared subpath,
//! `linker` drives pairwise merging to a fixed point, and `splicer` turns a
//! linear path into a single spliced sequence.

pub mod consistency;
pub mod linker;
pub mod splicer;

use thiserror::Error;

use crate::core::path::ContigKey;

pub use consistency::{check_path_consistency, Alignment};
pub use linker::{merge_paths, unique_paths};
pub use splicer::{splice_path, SplicedContig};

#[derive(Error, Debug)]
pub enum MergeError {
    #[error(
        "cannot splice '{left}' onto '{right}': overlap mismatch ({left_end} != {right_begin})"
    )]
    OverlapViolation {
        left: String,
        right: String,
        left_end: String,
        right_begin: String,
    },

    #[error("path references contig key {0} outside the contig table")]
    MissingContig(ContigKey),

    #[error("inconsistent merge state: {0}")]
    InconsistentState(String),
}
