//! # path-merge
//!
//! A contig-path merger: given linear paths through a set of genome
//! contigs, each anchored at a root contig, decide which paths are
//! mutually consistent, merge them transitively into larger canonical
//! paths, and optionally splice the underlying contig sequences into
//! merged FASTA records at fixed k−1 overlaps.
//!
//! Two paths are consistent when they agree on an identical subpath that
//! is terminal with respect to both, after reconciling orientation
//! (forward vs reverse-complement). Linking grows a canonical path per
//! root to a fixed point, then prunes paths subsumed by the merged
//! results, so repeated evidence collapses to one record per assembly.
//!
//! ## Example
//!
//! ```rust,no_run
//! use path_merge::core::registry::ContigRegistry;
//! use path_merge::merging::{merge_paths, unique_paths};
//! use path_merge::parsing::paths::read_paths;
//!
//! let mut registry = ContigRegistry::new();
//! let store = read_paths("paths.txt".as_ref(), &mut registry)?;
//! let results = merge_paths(&store)?;
//! for (ordinal, path) in unique_paths(&results).iter().enumerate() {
//!     println!("{ordinal} {}", path.to_text(&registry, ' ')?);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`core`]: contigs, keys, oriented paths, and the path store
//! - [`parsing`]: contig FASTA and path record input
//! - [`merging`]: the consistency check, linking driver, and splicer
//! - [`output`]: path record and merged FASTA emission
//! - [`cli`]: command-line interface implementation

pub mod cli;
pub mod core;
pub mod merging;
pub mod output;
pub mod parsing;

// Re-export commonly used types for convenience
pub use crate::core::contig::{Contig, ContigSet};
pub use crate::core::path::{ContigKey, ContigPath, PathNode, PathStore};
pub use crate::core::registry::ContigRegistry;
pub use crate::merging::{Alignment, MergeError, SplicedContig};
