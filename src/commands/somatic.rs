//! Call somatic indels from matched normal and tumor BAM files.
//!
//! Both inputs are streamed in coordinate order and grouped into per-position pileups.
//! Positions covered in both samples are evaluated; a call is written for each position
//! where the tumor reads agree on one indel that the normal reads do not show.

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use cadabra_lib::bam_io::open_bam_records;
use cadabra_lib::call::CallEmitter;
use cadabra_lib::caller::SomaticCaller;
use cadabra_lib::locus::ChromosomeOrder;
use cadabra_lib::logging::{OperationTimer, log_calling_summary};
use cadabra_lib::metrics::write_metrics;
use cadabra_lib::pileup::ReadLocusReader;
use cadabra_lib::progress::DEFAULT_PROGRESS_INTERVAL;
use cadabra_lib::sam::check_coordinate_sort;
use cadabra_lib::synchronizer::LocusSynchronizer;

use crate::commands::command::Command;
use crate::commands::common::{CallOutputOptions, CallingOptions, SampleInputOptions};

/// Call somatic insertions and deletions from a tumor/normal pair.
#[derive(Debug, Parser)]
#[command(
    name = "somatic",
    about = "\x1b[38;5;72m[CALLING]\x1b[0m        \x1b[36mCall somatic indels from matched tumor/normal BAMs\x1b[0m",
    long_about = r#"
Call somatic insertions and deletions from a matched tumor/normal pair of BAM files.

Both BAMs must be coordinate sorted. The normal BAM's sequence dictionary defines the
chromosome order. Every position covered by reads in both samples is evaluated:

  1. Each tumor read is checked for an insertion or deletion anchored at the position
     (the reference base immediately before the indel). Reads realigned through an
     assembled contig carry a tag (YA by default) of the form <id>:<start>:<cigar>;
     for those reads the contig decides where the indel is and its length, and the
     read's own alignment must show an indel of the same type there.
  2. All tumor reads with evidence must agree on one indel type and length, at least
     --min-supporting-reads of them must support it, and at least one must have the
     indel at least --min-distance-from-read-end bases from both ends of the read.
  3. No normal read may show any indel at the position away from its read ends.

Calls are written one per line, tab-delimited, with no header:

  chromosome  position  I|D  length  normal_depth  tumor_depth  tumor_support

Unmapped, secondary, supplementary, QC-failed and duplicate reads are ignored.

Example usage:
  cadabra somatic -n normal.bam -t tumor.bam -o calls.txt -m metrics.txt
  cadabra somatic -n normal.bam -t tumor.bam --min-supporting-reads 3 --require-contig-evidence
"#
)]
pub struct Somatic {
    /// Normal and tumor inputs
    #[command(flatten)]
    pub inputs: SampleInputOptions,

    /// Calls and metrics outputs
    #[command(flatten)]
    pub output: CallOutputOptions,

    /// Calling options
    #[command(flatten)]
    pub calling: CallingOptions,
}

impl Command for Somatic {
    fn execute(&self, command_line: &str) -> Result<()> {
        self.inputs.validate()?;
        let evaluator = self.calling.build_evaluator()?;

        let timer = OperationTimer::new("Calling somatic indels");
        info!("Command line: {command_line}");
        info!("Normal: {}", self.inputs.normal.display());
        info!("Tumor: {}", self.inputs.tumor.display());
        match &self.output.output {
            Some(path) => info!("Output: {}", path.display()),
            None => info!("Output: <stdout>"),
        }
        info!("Contig tag: {}", self.calling.contig_tag);
        info!("Min supporting reads: {}", self.calling.min_supporting_reads);
        info!("Min distance from read end: {}", self.calling.min_distance_from_read_end);
        if self.calling.require_contig_evidence {
            info!("Tumor reads without contig evidence: ignored");
        }
        if self.calling.lenient_contig_tags {
            info!("Malformed contig tags: ignored with a warning");
        }

        let (normal_header, normal_records) = open_bam_records(&self.inputs.normal)?;
        let (tumor_header, tumor_records) = open_bam_records(&self.inputs.tumor)?;
        check_coordinate_sort(&normal_header, &self.inputs.normal, "Normal");
        check_coordinate_sort(&tumor_header, &self.inputs.tumor, "Tumor");

        let order = ChromosomeOrder::from_header(&normal_header);
        if order.is_empty() {
            bail!("Normal BAM has no reference sequences: {}", self.inputs.normal.display());
        }

        let filter = self.calling.read_filter();
        let mut normal = ReadLocusReader::new(normal_records, &normal_header, "normal", filter);
        let mut tumor = ReadLocusReader::new(tumor_records, &tumor_header, "tumor", filter);
        let mut synchronizer = LocusSynchronizer::new(order, normal.by_ref(), tumor.by_ref());

        let mut emitter = CallEmitter::new(self.output.create_call_writer()?);
        let mut metrics = SomaticCaller::new(evaluator, DEFAULT_PROGRESS_INTERVAL)
            .run(&mut synchronizer, &mut emitter)
            .context("Somatic indel calling failed")?;
        emitter.finish().context("Failed to flush calls")?;
        drop(synchronizer);

        metrics.normal_reads = normal.records_accepted();
        metrics.normal_reads_skipped = normal.records_skipped();
        metrics.tumor_reads = tumor.records_accepted();
        metrics.tumor_reads_skipped = tumor.records_skipped();

        if let Some(path) = &self.output.metrics {
            write_metrics(path, std::slice::from_ref(&metrics))?;
            info!("Wrote metrics to {}", path.display());
        }

        log_calling_summary(&metrics);
        timer.log_completion(metrics.matched_loci, "loci");
        Ok(())
    }
}
