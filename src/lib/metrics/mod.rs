//! Metrics collection and reporting for somatic indel calling.
//!
//! - [`calling`] - Per-run locus, call and rejection counts
//! - [`writer`] - Metrics file I/O utilities
//!
//! # Traits
//!
//! - [`Metric`] - Core trait for serializable metrics
//! - [`ProcessingMetrics`] - Common interface for input/output counts

pub mod calling;
pub mod writer;

use serde::{Deserialize, Serialize};

pub use calling::CallingMetrics;
pub use writer::{read_metrics, write_metrics};

/// A metric type that can be serialized to TSV files.
pub trait Metric: Serialize + for<'de> Deserialize<'de> + Clone + Default {
    /// Human-readable name for this metric type, used in error messages.
    fn metric_name() -> &'static str;
}

/// Common interface for metrics that track processing counts.
pub trait ProcessingMetrics {
    /// Total number of items considered.
    fn total_input(&self) -> u64;

    /// Total number of items produced.
    fn total_output(&self) -> u64;

    /// Total number of items rejected.
    fn total_filtered(&self) -> u64;

    /// Output as a fraction of input (0.0 when there was no input).
    fn efficiency(&self) -> f64 {
        if self.total_input() == 0 {
            0.0
        } else {
            self.total_output() as f64 / self.total_input() as f64
        }
    }
}

/// Formats a count with thousands separators.
///
/// # Examples
///
/// ```
/// use cadabra_lib::metrics::format_count;
///
/// assert_eq!(format_count(1234567), "1,234,567");
/// assert_eq!(format_count(123), "123");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
