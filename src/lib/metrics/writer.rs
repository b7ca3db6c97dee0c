//! Utilities for reading and writing metrics files.

use anyhow::{Context, Result};
use fgoxide::io::DelimFile;
use std::path::Path;

use super::Metric;

/// Writes metrics to a TSV file with a header row.
///
/// # Errors
/// Returns an error if the file cannot be created or written to
///
/// # Example
/// ```no_run
/// use cadabra_lib::metrics::{CallingMetrics, write_metrics};
///
/// write_metrics("calling_metrics.txt", &[CallingMetrics::default()]).unwrap();
/// ```
pub fn write_metrics<P: AsRef<Path>, T: Metric>(path: P, metrics: &[T]) -> Result<()> {
    let path = path.as_ref();
    DelimFile::default()
        .write_tsv(&path, metrics)
        .with_context(|| format!("Failed to write {} metrics: {}", T::metric_name(), path.display()))
}

/// Reads metrics written by [`write_metrics`].
///
/// # Errors
/// Returns an error if the file cannot be read or a row does not parse
pub fn read_metrics<P: AsRef<Path>, T: Metric>(path: P) -> Result<Vec<T>> {
    let path = path.as_ref();
    DelimFile::default()
        .read_tsv(&path)
        .with_context(|| format!("Failed to read {} metrics: {}", T::metric_name(), path.display()))
}
