//! Per-locus somatic decision.
//!
//! A locus is called when the tumor reads agree on exactly one indel identity, at least
//! `min_supporting_reads` of them support it with at least one supporting read placing the
//! indel away from its read ends, and no normal read shows an indel at the locus that
//! passes the same distance filter.

use std::fmt;
use std::ops::ControlFlow;

use crate::alignment::AlignmentView;
use crate::call::Call;
use crate::errors::{CadabraError, Result};
use crate::indel::{DistanceFilter, IndelLocator, IndelSignature, locate_in_read};
use crate::locus::Locus;

/// Default minimum number of tumor reads supporting a call.
pub const DEFAULT_MIN_SUPPORTING_READS: usize = 2;

/// Why a matched locus produced no call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    /// No tumor read shows an indel at the locus
    NoTumorEvidence,
    /// Tumor reads show more than one indel identity
    AmbiguousTumorEvidence,
    /// Fewer supporting tumor reads than required
    InsufficientSupport,
    /// No supporting tumor read places the indel far enough from its read ends
    TooCloseToReadEnd,
    /// A normal read shows an indel at the locus
    NormalEvidence,
}

impl RejectionReason {
    /// Short human-readable description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            RejectionReason::NoTumorEvidence => "no tumor indel evidence",
            RejectionReason::AmbiguousTumorEvidence => "conflicting tumor indel evidence",
            RejectionReason::InsufficientSupport => "too few supporting tumor reads",
            RejectionReason::TooCloseToReadEnd => "indel too close to read ends",
            RejectionReason::NormalEvidence => "indel evidence in normal",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Outcome of evaluating one matched locus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// The locus carries a somatic indel
    Called(Call),
    /// The locus was rejected
    Rejected(RejectionReason),
}

impl Evaluation {
    /// The call, if the locus was called.
    #[must_use]
    pub fn call(&self) -> Option<&Call> {
        match self {
            Evaluation::Called(call) => Some(call),
            Evaluation::Rejected(_) => None,
        }
    }
}

/// Running state of the tumor pass.
#[derive(Debug, Default)]
struct TumorTally {
    candidate: Option<IndelSignature>,
    support: usize,
    passes_distance: bool,
}

/// Why the tumor pass stopped early.
enum Halt {
    Ambiguous,
    Failed(CadabraError),
}

/// Decides whether a matched locus carries a somatic indel.
#[derive(Debug, Clone)]
pub struct LocusEvaluator {
    locator: IndelLocator,
    distance: DistanceFilter,
    min_supporting_reads: usize,
}

impl Default for LocusEvaluator {
    fn default() -> Self {
        Self::new(IndelLocator::default(), DistanceFilter::default(), DEFAULT_MIN_SUPPORTING_READS)
    }
}

impl LocusEvaluator {
    /// Creates an evaluator.
    #[must_use]
    pub fn new(locator: IndelLocator, distance: DistanceFilter, min_supporting_reads: usize) -> Self {
        Self { locator, distance, min_supporting_reads }
    }

    /// Evaluates the reads of both samples at `locus`.
    ///
    /// # Errors
    /// Returns an error if a tumor read carries a malformed contig tag under the strict
    /// tag policy.
    pub fn evaluate<V: AlignmentView>(
        &self,
        locus: &Locus,
        normal: &[V],
        tumor: &[V],
    ) -> Result<Evaluation> {
        let target = locus.position;

        let tally = match tumor.iter().try_fold(TumorTally::default(), |tally, read| {
            self.tally_tumor_read(tally, read, target)
        }) {
            ControlFlow::Continue(tally) => tally,
            ControlFlow::Break(Halt::Ambiguous) => {
                return Ok(Evaluation::Rejected(RejectionReason::AmbiguousTumorEvidence));
            }
            ControlFlow::Break(Halt::Failed(e)) => return Err(e),
        };

        let Some(signature) = tally.candidate else {
            return Ok(Evaluation::Rejected(RejectionReason::NoTumorEvidence));
        };
        if tally.support < self.min_supporting_reads {
            return Ok(Evaluation::Rejected(RejectionReason::InsufficientSupport));
        }
        if !tally.passes_distance {
            return Ok(Evaluation::Rejected(RejectionReason::TooCloseToReadEnd));
        }

        let vetoed = normal.iter().any(|read| {
            locate_in_read(read, target)
                .is_some_and(|evidence| self.distance.passes(evidence.read_offset, read.read_length()))
        });
        if vetoed {
            return Ok(Evaluation::Rejected(RejectionReason::NormalEvidence));
        }

        Ok(Evaluation::Called(Call {
            locus: locus.clone(),
            signature,
            normal_depth: normal.len(),
            tumor_depth: tumor.len(),
            tumor_support: tally.support,
        }))
    }

    fn tally_tumor_read<V: AlignmentView>(
        &self,
        mut tally: TumorTally,
        read: &V,
        target: usize,
    ) -> ControlFlow<Halt, TumorTally> {
        let evidence = match self.locator.locate_with_contig(read, target) {
            Ok(Some(evidence)) => evidence,
            Ok(None) => return ControlFlow::Continue(tally),
            Err(e) => return ControlFlow::Break(Halt::Failed(e)),
        };

        match tally.candidate {
            Some(candidate) if candidate != evidence.signature => {
                return ControlFlow::Break(Halt::Ambiguous);
            }
            Some(_) => {}
            None => tally.candidate = Some(evidence.signature),
        }

        tally.support += 1;
        tally.passes_distance |= self.distance.passes(evidence.read_offset, read.read_length());
        ControlFlow::Continue(tally)
    }
}
