//! Contig records and the loaded contig table.

use crate::core::path::ContigKey;
use crate::core::sequence::Alphabet;

/// A single input contig: created once at load time, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contig {
    /// Name as it appears on the FASTA defline.
    pub name: String,

    /// Nucleotide or colour-space sequence.
    pub seq: Vec<u8>,

    /// k-mer coverage reported by the defline comment.
    pub coverage: u32,
}

impl Contig {
    pub fn new(name: impl Into<String>, seq: Vec<u8>, coverage: u32) -> Self {
        Self {
            name: name.into(),
            seq,
            coverage,
        }
    }
}

/// The full contig table, indexed by dense `ContigKey`, plus the alphabet
/// inferred from the first contig.
#[derive(Debug)]
pub struct ContigSet {
    contigs: Vec<Contig>,
    alphabet: Alphabet,
}

impl ContigSet {
    #[must_use]
    pub fn new(contigs: Vec<Contig>) -> Self {
        let alphabet = contigs
            .first()
            .map_or(Alphabet::Nucleotide, |c| Alphabet::detect(&c.seq));
        Self { contigs, alphabet }
    }

    #[must_use]
    pub fn get(&self, key: ContigKey) -> Option<&Contig> {
        self.contigs.get(key.0 as usize)
    }

    #[must_use]
    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    /// Contigs paired with their keys, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (ContigKey, &Contig)> {
        self.contigs.iter().enumerate().map(|(idx, contig)| {
            #[allow(clippy::cast_possible_truncation)] // dense keys are u32 by construction
            let key = ContigKey(idx as u32);
            (key, contig)
        })
    }
}
