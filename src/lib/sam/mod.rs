//! SAM/BAM file utilities and header checks.
//!
//! - Checking the sort order declared in a SAM header
//! - CIGAR parsing and length utilities ([`record_utils`])
//! - Builders for test records and BAM fixtures ([`builder`])
//!
//! Both inputs to the caller must be coordinate sorted: the per-locus grouping walks
//! reads in order and the merge of the two samples relies on it. The header check here
//! only warns, since plenty of BAMs are sorted without declaring `SO:coordinate`; the
//! grouping itself fails hard on out-of-order records.

pub mod builder;
pub mod record_utils;

pub use builder::{RecordBuilder, coordinate_sorted_header, write_bam};
pub use record_utils::{alignment_end, parse_cigar_text, query_length, reference_length};

use log::warn;
use noodles::sam::Header;
use noodles::sam::header::record::value::map::header::sort_order::COORDINATE;
use std::path::Path;

/// Checks if a header declares the given sort order in its `@HD SO` field.
///
/// # Examples
///
/// ```rust,ignore
/// use noodles::sam::header::record::value::map::header::sort_order::COORDINATE;
///
/// if is_sorted(&header, COORDINATE) {
///     // stream loci directly
/// }
/// ```
#[must_use]
pub fn is_sorted(header: &Header, sort_order: &[u8]) -> bool {
    header.header().is_some_and(|hdr_map| {
        hdr_map
            .other_fields()
            .get(b"SO")
            .is_some_and(|so| <_ as AsRef<[u8]>>::as_ref(so) == sort_order)
    })
}

/// Warns when a header does not declare coordinate sort order.
///
/// `name` is the sample label used in the message (e.g. "normal", "tumor").
pub fn check_coordinate_sort(header: &Header, path: &Path, name: &str) {
    if !is_sorted(header, COORDINATE) {
        warn!(
            "{name} file {} does not appear to be coordinate sorted per the SAM header.",
            path.display()
        );
        warn!("Continuing; out-of-order records will stop the run.");
    }
}
