//! Progress logging for long-running locus scans.

use log::info;

use crate::locus::Locus;
use crate::metrics::format_count;

/// Default number of loci between progress messages.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000_000;

/// Logs a message each time the number of processed loci crosses a multiple of the interval.
///
/// # Example
/// ```
/// use cadabra_lib::locus::Locus;
/// use cadabra_lib::progress::ProgressTracker;
///
/// let mut tracker = ProgressTracker::new("Matched").with_interval(100);
/// for pos in 1..=250 {
///     tracker.record(&Locus::new("chr1", pos)); // logs at 100 and 200
/// }
/// tracker.log_final(); // logs "Matched 250 loci (complete)"
/// ```
pub struct ProgressTracker {
    interval: u64,
    message: String,
    count: u64,
}

impl ProgressTracker {
    /// Creates a tracker with the default interval.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: DEFAULT_PROGRESS_INTERVAL, message: message.into(), count: 0 }
    }

    /// Sets the logging interval. An interval of zero is treated as one.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Counts one locus, logging it when an interval boundary is reached.
    ///
    /// Returns `true` if a message was logged.
    pub fn record(&mut self, locus: &Locus) -> bool {
        self.count += 1;
        if self.count.is_multiple_of(self.interval) {
            info!("{} {} loci; last at {locus}", self.message, format_count(self.count));
            true
        } else {
            false
        }
    }

    /// Logs the final count unless the last [`record`](Self::record) already did.
    pub fn log_final(&self) {
        if self.count > 0 && !self.count.is_multiple_of(self.interval) {
            info!("{} {} loci (complete)", self.message, format_count(self.count));
        }
    }

    /// Number of loci counted.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }
}
