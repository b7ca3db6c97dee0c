//! Counts collected over one somatic calling run.

use serde::{Deserialize, Serialize};

use super::{Metric, ProcessingMetrics};
use crate::evaluator::{Evaluation, RejectionReason};
use crate::indel::IndelKind;

/// Locus, call and rejection counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallingMetrics {
    /// Normal loci visited while merging the two inputs
    pub normal_loci: u64,
    /// Tumor loci visited while merging the two inputs
    pub tumor_loci: u64,
    /// Loci present in both inputs and evaluated
    pub matched_loci: u64,
    /// Loci called as somatic indels
    pub calls: u64,
    /// Calls that are insertions
    pub insertions: u64,
    /// Calls that are deletions
    pub deletions: u64,
    /// Loci without tumor indel evidence
    pub no_tumor_evidence: u64,
    /// Loci where tumor reads disagreed on the indel
    pub ambiguous_tumor_evidence: u64,
    /// Loci with too few supporting tumor reads
    pub insufficient_support: u64,
    /// Loci where every supporting read had the indel near a read end
    pub too_close_to_read_end: u64,
    /// Loci vetoed by normal evidence
    pub normal_evidence: u64,
    /// Normal reads that entered the pileup
    pub normal_reads: u64,
    /// Normal reads skipped by the read filter or lacking a placed alignment
    pub normal_reads_skipped: u64,
    /// Tumor reads that entered the pileup
    pub tumor_reads: u64,
    /// Tumor reads skipped by the read filter or lacking a placed alignment
    pub tumor_reads_skipped: u64,
}

impl CallingMetrics {
    /// Counts one evaluated locus.
    pub fn record(&mut self, evaluation: &Evaluation) {
        self.matched_loci += 1;
        match evaluation {
            Evaluation::Called(call) => {
                self.calls += 1;
                match call.signature.kind {
                    IndelKind::Insertion => self.insertions += 1,
                    IndelKind::Deletion => self.deletions += 1,
                }
            }
            Evaluation::Rejected(reason) => *self.rejection_count_mut(*reason) += 1,
        }
    }

    fn rejection_count_mut(&mut self, reason: RejectionReason) -> &mut u64 {
        match reason {
            RejectionReason::NoTumorEvidence => &mut self.no_tumor_evidence,
            RejectionReason::AmbiguousTumorEvidence => &mut self.ambiguous_tumor_evidence,
            RejectionReason::InsufficientSupport => &mut self.insufficient_support,
            RejectionReason::TooCloseToReadEnd => &mut self.too_close_to_read_end,
            RejectionReason::NormalEvidence => &mut self.normal_evidence,
        }
    }

    /// Rejection counts by reason, in decision order.
    #[must_use]
    pub fn rejection_summary(&self) -> [(RejectionReason, u64); 5] {
        [
            (RejectionReason::NoTumorEvidence, self.no_tumor_evidence),
            (RejectionReason::AmbiguousTumorEvidence, self.ambiguous_tumor_evidence),
            (RejectionReason::InsufficientSupport, self.insufficient_support),
            (RejectionReason::TooCloseToReadEnd, self.too_close_to_read_end),
            (RejectionReason::NormalEvidence, self.normal_evidence),
        ]
    }

    /// Total number of rejected loci.
    #[must_use]
    pub fn total_rejections(&self) -> u64 {
        self.rejection_summary().iter().map(|(_, count)| count).sum()
    }
}

impl Metric for CallingMetrics {
    fn metric_name() -> &'static str {
        "somatic indel calling"
    }
}

impl ProcessingMetrics for CallingMetrics {
    fn total_input(&self) -> u64 {
        self.matched_loci
    }

    fn total_output(&self) -> u64 {
        self.calls
    }

    fn total_filtered(&self) -> u64 {
        self.total_rejections()
    }
}
