//! Logging utilities for formatted output.
//!
//! This module provides consistent, user-friendly formatting for counts, durations and
//! rates, an operation timer, and the end-of-run calling summary.

use std::time::{Duration, Instant};

use crate::metrics::{CallingMetrics, ProcessingMetrics, format_count};

/// Formats a fraction (0.0-1.0) as a percentage with `decimals` decimal places.
///
/// # Examples
///
/// ```
/// use cadabra_lib::logging::format_percent;
///
/// assert_eq!(format_percent(0.9543, 2), "95.43%");
/// assert_eq!(format_percent(1.0, 0), "100%");
/// ```
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0, decimals = decimals)
}

/// Formats a duration in human-readable form, e.g. "45s", "2m 15s", "1h 30m".
///
/// # Examples
///
/// ```
/// use cadabra_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        if remaining_secs == 0 { format!("{mins}m") } else { format!("{mins}m {remaining_secs}s") }
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 { format!("{hours}h") } else { format!("{hours}h {mins}m") }
    }
}

/// Formats a processing rate, e.g. "1,234 loci/s" or "30.0 loci/min".
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_rate(count: u64, duration: Duration, unit: &str) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} {unit}/s", format_count(count));
    }

    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} {unit}/s", format_count(rate as u64))
    } else {
        let per_min = count as f64 / (secs / 60.0);
        format!("{per_min:.1} {unit}/min")
    }
}

/// Logs the end-of-run summary of a calling run.
pub fn log_calling_summary(metrics: &CallingMetrics) {
    log::info!("Somatic Indel Calling Summary:");
    log::info!(
        "  Normal reads: {} used, {} skipped",
        format_count(metrics.normal_reads),
        format_count(metrics.normal_reads_skipped)
    );
    log::info!(
        "  Tumor reads: {} used, {} skipped",
        format_count(metrics.tumor_reads),
        format_count(metrics.tumor_reads_skipped)
    );
    log::info!("  Normal loci: {}", format_count(metrics.normal_loci));
    log::info!("  Tumor loci: {}", format_count(metrics.tumor_loci));
    log::info!("  Matched loci: {}", format_count(metrics.matched_loci));
    log::info!(
        "  Calls: {} ({} insertions, {} deletions)",
        format_count(metrics.calls),
        format_count(metrics.insertions),
        format_count(metrics.deletions)
    );

    if metrics.matched_loci > 0 {
        log::info!("  Call rate: {}", format_percent(metrics.efficiency(), 4));
    }

    let rejected: Vec<_> =
        metrics.rejection_summary().into_iter().filter(|(_, count)| *count > 0).collect();
    if !rejected.is_empty() {
        log::info!("  Rejected loci: {}", format_count(metrics.total_filtered()));
        for (reason, count) in rejected {
            log::info!("    {}: {}", reason.description(), format_count(count));
        }
    }
}

/// Tracks the duration of an operation and logs its completion.
///
/// # Examples
///
/// ```no_run
/// use cadabra_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Calling somatic indels");
/// // ... do work ...
/// timer.log_completion(10_000, "loci");
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Time since the timer was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Logs the completion with item count and rate.
    pub fn log_completion(&self, count: u64, unit: &str) {
        let duration = self.elapsed();
        log::info!(
            "{} completed: {} {unit} in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration, unit)
        );
    }
}
