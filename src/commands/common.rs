//! Common CLI options for calling commands.
//!
//! This module provides shared argument structures that can be composed into
//! command structs using `#[command(flatten)]`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use cadabra_lib::evaluator::{DEFAULT_MIN_SUPPORTING_READS, LocusEvaluator};
use cadabra_lib::indel::{ContigTagPolicy, DEFAULT_MIN_DISTANCE_FROM_READ_END, DistanceFilter, IndelLocator};
use cadabra_lib::pileup::ReadFilter;
use cadabra_lib::validation::{string_to_tag, validate_at_least, validate_files_exist};

/// Matched normal and tumor BAM inputs.
#[derive(Debug, Clone, Args)]
pub struct SampleInputOptions {
    /// Coordinate-sorted BAM of the normal sample
    #[arg(short = 'n', long = "normal")]
    pub normal: PathBuf,

    /// Coordinate-sorted BAM of the tumor sample
    #[arg(short = 't', long = "tumor")]
    pub tumor: PathBuf,
}

impl SampleInputOptions {
    /// Validates that both input files exist.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing file.
    pub fn validate(&self) -> Result<()> {
        validate_files_exist(&[(&self.normal, "Normal BAM"), (&self.tumor, "Tumor BAM")])?;
        Ok(())
    }
}

/// Where calls and metrics are written.
#[derive(Debug, Clone, Default, Args)]
pub struct CallOutputOptions {
    /// Output file for calls (tab-delimited); standard output if omitted
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Optional output file for calling metrics
    #[arg(short = 'm', long = "metrics")]
    pub metrics: Option<PathBuf>,
}

impl CallOutputOptions {
    /// Opens the calls output as a buffered writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the output file cannot be created.
    pub fn create_call_writer(&self) -> Result<Box<dyn Write>> {
        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                Ok(Box::new(BufWriter::new(file)))
            }
            None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
        }
    }
}

/// Options controlling the somatic decision at each locus.
#[derive(Debug, Clone, Args)]
pub struct CallingOptions {
    /// SAM tag holding assembled-contig evidence (`<id>:<start>:<cigar>`)
    #[arg(long = "contig-tag", default_value = "YA")]
    pub contig_tag: String,

    /// Minimum number of tumor reads supporting the indel
    #[arg(long = "min-supporting-reads", default_value_t = DEFAULT_MIN_SUPPORTING_READS)]
    pub min_supporting_reads: usize,

    /// Minimum distance of the indel from either end of a read for it to count
    #[arg(long = "min-distance-from-read-end", default_value_t = DEFAULT_MIN_DISTANCE_FROM_READ_END)]
    pub min_distance_from_read_end: usize,

    /// Ignore tumor reads without a contig tag instead of using their own alignment
    #[arg(long = "require-contig-evidence", default_value = "false")]
    pub require_contig_evidence: bool,

    /// Warn about and ignore malformed contig tags instead of failing
    #[arg(long = "lenient-contig-tags", default_value = "false")]
    pub lenient_contig_tags: bool,

    /// Keep reads flagged as duplicates
    #[arg(long = "include-duplicates", default_value = "false")]
    pub include_duplicates: bool,
}

impl Default for CallingOptions {
    fn default() -> Self {
        Self {
            contig_tag: "YA".to_string(),
            min_supporting_reads: DEFAULT_MIN_SUPPORTING_READS,
            min_distance_from_read_end: DEFAULT_MIN_DISTANCE_FROM_READ_END,
            require_contig_evidence: false,
            lenient_contig_tags: false,
            include_duplicates: false,
        }
    }
}

impl CallingOptions {
    /// Validates the options and builds the locus evaluator.
    ///
    /// # Errors
    ///
    /// Returns an error if the contig tag is not a valid SAM tag or
    /// `min_supporting_reads` is zero.
    pub fn build_evaluator(&self) -> Result<LocusEvaluator> {
        let contig_tag = string_to_tag(&self.contig_tag, "contig-tag")?;
        validate_at_least(self.min_supporting_reads, 1, "min-supporting-reads")?;

        let policy =
            if self.lenient_contig_tags { ContigTagPolicy::Lenient } else { ContigTagPolicy::Strict };
        let locator = IndelLocator::new(contig_tag)
            .with_policy(policy)
            .with_require_contig_evidence(self.require_contig_evidence);

        Ok(LocusEvaluator::new(
            locator,
            DistanceFilter::new(self.min_distance_from_read_end),
            self.min_supporting_reads,
        ))
    }

    /// The read filter applied to both inputs.
    #[must_use]
    pub fn read_filter(&self) -> ReadFilter {
        ReadFilter { include_duplicates: self.include_duplicates }
    }
}
