#![deny(unsafe_code)]
// Clippy lint configuration for CI
// These lints are allowed because:
// - cast_*: Counts and coordinates are converted between integer and float types for reporting
// - missing_*_doc: Documentation improvements tracked separately
// - module_name_repetitions: Types like `CallingMetrics` live in `metrics::calling`
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::redundant_closure_for_method_calls,
    clippy::uninlined_format_args
)]

//! # cadabra - Somatic Indel Calling Library
//!
//! This library finds somatic insertions and deletions: loci where reads from a tumor
//! sample consistently show one indel that reads from the matched normal sample do not.
//!
//! ## Overview
//!
//! ### Core Functionality
//!
//! - **[`synchronizer`]** - Lock-step merge of the normal and tumor locus streams
//! - **[`indel`]** - Locating an indel in a read, with assembled-contig cross-validation
//! - **[`evaluator`]** - The per-locus somatic decision and rejection reasons
//! - **[`call`]** - Accepted calls and their tab-delimited output
//! - **[`caller`]** - The calling loop tying the pieces together
//!
//! ### Inputs
//!
//! - **[`bam_io`]** - Opening BAM files as record streams
//! - **[`pileup`]** - Grouping coordinate-sorted reads into per-locus pileups
//! - **[`alignment`]** - The read view the calling logic works on
//! - **[`contig`]** - Parsing the assembled-contig tag
//! - **[`locus`]** - Loci and chromosome order
//! - **[`sam`]** - CIGAR parsing, header checks and test-record builders
//!
//! ### Utilities
//!
//! - **[`validation`]** - Input validation for parameters and files
//! - **[`progress`]** - Progress logging
//! - **[`logging`]** - Formatting helpers and the end-of-run summary
//! - **[`metrics`]** - Calling metrics and TSV output
//!
//! ## Quick Start
//!
//! ### Evaluating One Locus
//!
//! ```
//! use cadabra_lib::evaluator::LocusEvaluator;
//! use cadabra_lib::locus::Locus;
//! use cadabra_lib::sam::builder::RecordBuilder;
//!
//! let tumor: Vec<_> = (0..3)
//!     .map(|_| RecordBuilder::mapped_read().alignment_start(91).cigar("10M2I18M").build())
//!     .collect();
//! let normal: Vec<_> = (0..3)
//!     .map(|_| RecordBuilder::mapped_read().alignment_start(91).cigar("30M").build())
//!     .collect();
//!
//! let evaluation = LocusEvaluator::default().evaluate(&Locus::new("chr1", 100), &normal, &tumor).unwrap();
//! assert_eq!(evaluation.call().unwrap().to_string(), "chr1\t100\tI\t2\t3\t3\t3");
//! ```
//!
//! ### Streaming Two BAM Files
//!
//! ```no_run
//! use cadabra_lib::bam_io::open_bam_records;
//! use cadabra_lib::locus::ChromosomeOrder;
//! use cadabra_lib::pileup::{ReadFilter, ReadLocusReader};
//! use cadabra_lib::synchronizer::LocusSynchronizer;
//!
//! # fn main() -> anyhow::Result<()> {
//! let (normal_header, normal_records) = open_bam_records("normal.bam")?;
//! let (tumor_header, tumor_records) = open_bam_records("tumor.bam")?;
//!
//! let normal = ReadLocusReader::new(normal_records, &normal_header, "normal", ReadFilter::default());
//! let tumor = ReadLocusReader::new(tumor_records, &tumor_header, "tumor", ReadFilter::default());
//!
//! for matched in LocusSynchronizer::new(ChromosomeOrder::from_header(&normal_header), normal, tumor) {
//!     let matched = matched?;
//!     println!("{}: {} normal, {} tumor", matched.locus, matched.normal.len(), matched.tumor.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## See Also
//!
//! - [noodles](https://github.com/zaeleus/noodles) - Rust bioinformatics I/O

pub mod alignment;
pub mod bam_io;
pub mod call;
pub mod caller;
pub mod contig;
pub mod errors;
pub mod evaluator;
pub mod indel;
pub mod locus;
pub mod logging;
pub mod metrics;
pub mod pileup;
pub mod progress;
pub mod sam;
pub mod synchronizer;
pub mod validation;

pub use call::{Call, CallEmitter};
pub use errors::{CadabraError, Result};
pub use evaluator::{Evaluation, LocusEvaluator, RejectionReason};
pub use locus::{ChromosomeOrder, Locus};
