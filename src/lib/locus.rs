//! Genomic loci and the chromosome order used to compare them.

use std::cmp::Ordering;
use std::fmt;

use ahash::AHashMap;
use noodles::sam::Header;

use crate::errors::{CadabraError, Result};

/// A 1-based position on a named chromosome.
///
/// Loci have no intrinsic order: chromosome order comes from a sequence dictionary, so
/// comparisons go through [`ChromosomeOrder::compare`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locus {
    /// Reference sequence name
    pub chromosome: String,
    /// 1-based position
    pub position: usize,
}

impl Locus {
    /// Creates a locus.
    #[must_use]
    pub fn new(chromosome: impl Into<String>, position: usize) -> Self {
        Self { chromosome: chromosome.into(), position }
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chromosome, self.position)
    }
}

/// Rank of every chromosome in a sequence dictionary.
#[derive(Debug, Clone, Default)]
pub struct ChromosomeOrder {
    ranks: AHashMap<String, usize>,
}

impl ChromosomeOrder {
    /// Builds the order from chromosome names, first name ranked lowest.
    ///
    /// A repeated name keeps its first rank.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ranks = AHashMap::new();
        for name in names {
            let next = ranks.len();
            ranks.entry(name.into()).or_insert(next);
        }
        Self { ranks }
    }

    /// Builds the order from the reference sequences of a SAM header, in header order.
    #[must_use]
    pub fn from_header(header: &Header) -> Self {
        Self::from_names(header.reference_sequences().keys().map(ToString::to_string))
    }

    /// Number of chromosomes in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// True if the table holds no chromosomes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Rank of a chromosome.
    ///
    /// # Errors
    /// Returns [`CadabraError::UnknownChromosome`] if the name is not in the table.
    pub fn rank(&self, chromosome: &str) -> Result<usize> {
        self.ranks
            .get(chromosome)
            .copied()
            .ok_or_else(|| CadabraError::UnknownChromosome { name: chromosome.to_string() })
    }

    /// Compares two loci by chromosome rank, then position.
    ///
    /// # Errors
    /// Returns [`CadabraError::UnknownChromosome`] if either chromosome is not in the table.
    pub fn compare(&self, a: &Locus, b: &Locus) -> Result<Ordering> {
        let by_chromosome = if a.chromosome == b.chromosome {
            Ordering::Equal
        } else {
            self.rank(&a.chromosome)?.cmp(&self.rank(&b.chromosome)?)
        };
        Ok(by_chromosome.then(a.position.cmp(&b.position)))
    }
}
