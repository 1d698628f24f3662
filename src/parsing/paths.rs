//! Parser for path records.
//!
//! One record per line, `@ <root><sign> -> <elem><sign> …`, where `+` is
//! forward and `-` is reverse-complement. The `@` sigil may be glued to the
//! root token or separated by whitespace. Each record extends the stored
//! path for its root: forward records append their tail after the root,
//! reverse records describe the tail in the root's reversed frame, so the
//! tail is reverse-complemented back into the forward frame and prepended.
//! The root is the fulcrum around which both kinds of evidence are glued.

use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::core::path::{ContigKey, ContigPath, PathNode, PathStore};
use crate::core::registry::{ContigRegistry, RegistryError};

#[derive(Error, Debug)]
pub enum PathFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: malformed path record: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("line {line}: path references unknown contig '{name}'")]
    UnknownContig { line: usize, name: String },
}

/// Read every path record from `path` into a fresh store.
///
/// With a locked registry (FASTA mode) any name absent from the contig
/// input is an `UnknownContig` error; with an unlocked registry names are
/// interned on first sight.
///
/// # Errors
///
/// Returns `PathFileError::Io` if the file cannot be read, or a
/// `Malformed`/`UnknownContig` error naming the offending line.
pub fn read_paths(
    path: &Path,
    registry: &mut ContigRegistry,
) -> Result<PathStore, PathFileError> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);

    let mut store = PathStore::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        parse_record(&line, idx + 1, registry, &mut store)?;
    }
    Ok(store)
}

/// Parse a single record and merge it into the store.
///
/// # Errors
///
/// See [`read_paths`].
pub fn parse_record(
    line: &str,
    line_no: usize,
    registry: &mut ContigRegistry,
    store: &mut PathStore,
) -> Result<(), PathFileError> {
    let malformed = |reason: &str| PathFileError::Malformed {
        line: line_no,
        reason: reason.to_string(),
    };

    let rest = line
        .trim()
        .strip_prefix('@')
        .ok_or_else(|| malformed("expected leading '@'"))?;

    let mut tokens = rest.split_whitespace();
    let root_token = tokens.next().ok_or_else(|| malformed("missing root"))?;
    let (root_name, root_reverse) = split_sign(root_token)
        .ok_or_else(|| malformed("root must be '<name>+' or '<name>-'"))?;

    match tokens.next() {
        Some("->") => {}
        _ => return Err(malformed("expected '->' after root")),
    }

    let root_key = resolve(registry, root_name, line_no)?;

    let mut tail = Vec::new();
    for token in tokens {
        let (name, reverse) = split_sign(token)
            .ok_or_else(|| malformed("elements must be '<name>+' or '<name>-'"))?;
        let key = resolve(registry, name, line_no)?;
        tail.push(PathNode::new(key, reverse));
    }
    if tail.is_empty() {
        return Err(malformed("record has no elements after '->'"));
    }

    let root_node = PathNode::new(root_key, false);
    let stored = store.entry_or_root(root_key);

    if root_reverse {
        // Reverse evidence must arrive while the root is still first; a
        // second reverse record for the same root would have displaced it.
        if stored.first() != root_node {
            return Err(malformed(
                "reverse record for a root that is no longer the path head",
            ));
        }
        let mut tail = ContigPath::from_nodes(tail);
        tail.reverse_complement();
        stored.prepend(tail.nodes());
    } else {
        if stored.len() != 1 || stored.first() != root_node {
            return Err(malformed("duplicate forward record for root"));
        }
        stored.append(&tail);
    }

    Ok(())
}

fn split_sign(token: &str) -> Option<(&str, bool)> {
    if let Some(name) = token.strip_suffix('+') {
        (!name.is_empty()).then_some((name, false))
    } else if let Some(name) = token.strip_suffix('-') {
        (!name.is_empty()).then_some((name, true))
    } else {
        None
    }
}

fn resolve(
    registry: &mut ContigRegistry,
    name: &str,
    line_no: usize,
) -> Result<ContigKey, PathFileError> {
    registry.intern(name).map_err(|e| match e {
        RegistryError::Locked(name) => PathFileError::UnknownContig {
            line: line_no,
            name,
        },
        RegistryError::UnknownKey(key) => PathFileError::Malformed {
            line: line_no,
            reason: format!("unallocated contig key {key}"),
        },
    })
}
