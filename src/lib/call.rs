//! Accepted somatic indel calls and their tab-delimited output.

use std::fmt;
use std::io::{self, Write};

use crate::indel::IndelSignature;
use crate::locus::Locus;

/// A somatic indel accepted at one locus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Locus the indel is anchored at
    pub locus: Locus,
    /// Operator and length of the called indel
    pub signature: IndelSignature,
    /// Number of normal reads at the locus
    pub normal_depth: usize,
    /// Number of tumor reads at the locus
    pub tumor_depth: usize,
    /// Number of tumor reads supporting the indel
    pub tumor_support: usize,
}

impl fmt::Display for Call {
    /// Formats the call as one tab-delimited line without the trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.locus.chromosome,
            self.locus.position,
            self.signature.kind,
            self.signature.len,
            self.normal_depth,
            self.tumor_depth,
            self.tumor_support
        )
    }
}

/// Writes calls one per line, in the order they are emitted.
pub struct CallEmitter<W: Write> {
    writer: W,
    emitted: u64,
}

impl<W: Write> CallEmitter<W> {
    /// Creates an emitter over `writer`. Callers should pass a buffered writer.
    pub fn new(writer: W) -> Self {
        Self { writer, emitted: 0 }
    }

    /// Writes one call line.
    ///
    /// # Errors
    /// Returns an error if the underlying writer fails.
    pub fn emit(&mut self, call: &Call) -> io::Result<()> {
        writeln!(self.writer, "{call}")?;
        self.emitted += 1;
        Ok(())
    }

    /// Number of calls written so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    /// Returns an error if the flush fails.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
