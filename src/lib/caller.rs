//! The calling loop: merge the two samples, evaluate each shared locus, emit calls.

use std::io::Write;

use log::debug;

use crate::alignment::AlignmentView;
use crate::call::CallEmitter;
use crate::errors::Result;
use crate::evaluator::{Evaluation, LocusEvaluator};
use crate::locus::Locus;
use crate::metrics::CallingMetrics;
use crate::progress::ProgressTracker;
use crate::synchronizer::LocusSynchronizer;

/// Runs the evaluator over every locus shared by the two streams.
pub struct SomaticCaller {
    evaluator: LocusEvaluator,
    progress_interval: u64,
}

impl SomaticCaller {
    /// Creates a caller logging progress every `progress_interval` matched loci.
    #[must_use]
    pub fn new(evaluator: LocusEvaluator, progress_interval: u64) -> Self {
        Self { evaluator, progress_interval }
    }

    /// Drains `synchronizer`, writing each call to `emitter` as soon as it is made.
    ///
    /// # Errors
    /// Returns the first error from either input stream, from the evaluator, or from
    /// writing a call. Calls emitted before the error stay written.
    pub fn run<N, T, V, W>(
        &self,
        synchronizer: &mut LocusSynchronizer<N, T>,
        emitter: &mut CallEmitter<W>,
    ) -> Result<CallingMetrics>
    where
        N: Iterator<Item = Result<(Locus, Vec<V>)>>,
        T: Iterator<Item = Result<(Locus, Vec<V>)>>,
        V: AlignmentView,
        W: Write,
    {
        let mut metrics = CallingMetrics::default();
        let mut progress = ProgressTracker::new("Matched").with_interval(self.progress_interval);

        for matched in synchronizer.by_ref() {
            let matched = matched?;
            let evaluation = self.evaluator.evaluate(&matched.locus, &matched.normal, &matched.tumor)?;
            match &evaluation {
                Evaluation::Called(call) => emitter.emit(call)?,
                Evaluation::Rejected(reason) => debug!("{}: {reason}", matched.locus),
            }
            metrics.record(&evaluation);
            progress.record(&matched.locus);
        }
        progress.log_final();

        metrics.normal_loci = synchronizer.normal_loci();
        metrics.tumor_loci = synchronizer.tumor_loci();
        Ok(metrics)
    }
}
