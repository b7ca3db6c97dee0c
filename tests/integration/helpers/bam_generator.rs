//! Tumor/normal BAM fixtures for integration tests.

#![allow(dead_code)]

use cadabra_lib::sam::builder::{RecordBuilder, coordinate_sorted_header, write_bam};
use noodles::sam::Header;
use noodles::sam::alignment::RecordBuf;
use std::path::{Path, PathBuf};

/// Chromosomes used by most tests, in dictionary order (note chr2 before chr10).
pub const REFERENCES: &[(&str, usize)] = &[("chr1", 10_000), ("chr2", 10_000), ("chr10", 10_000)];

/// Creates a coordinate-sorted header over [`REFERENCES`].
pub fn create_header() -> Header {
    coordinate_sorted_header(REFERENCES)
}

/// Creates `count` reads on reference `ref_id` starting at `start` with the given CIGAR.
pub fn create_reads(prefix: &str, count: usize, ref_id: usize, start: usize, cigar: &str) -> Vec<RecordBuf> {
    (0..count)
        .map(|i| {
            RecordBuilder::mapped_read()
                .name(&format!("{prefix}_{ref_id}_{start}_{i}"))
                .reference_sequence_id(ref_id)
                .alignment_start(start)
                .cigar(cigar)
                .build()
        })
        .collect()
}

/// Creates `count` reads carrying a contig tag (`YA` unless `tag` is given).
pub fn create_contig_reads(
    prefix: &str,
    count: usize,
    ref_id: usize,
    start: usize,
    cigar: &str,
    tag: &str,
    contig: &str,
) -> Vec<RecordBuf> {
    (0..count)
        .map(|i| {
            RecordBuilder::mapped_read()
                .name(&format!("{prefix}_contig_{start}_{i}"))
                .reference_sequence_id(ref_id)
                .alignment_start(start)
                .cigar(cigar)
                .tag(tag, contig)
                .build()
        })
        .collect()
}

/// Sorts records by (reference id, start) so they can be written as a coordinate-sorted BAM.
pub fn sort_by_coordinate(mut records: Vec<RecordBuf>) -> Vec<RecordBuf> {
    records.sort_by_key(|r| (r.reference_sequence_id(), r.alignment_start().map(usize::from)));
    records
}

/// Writes a coordinate-sorted normal/tumor pair under `dir`, returning their paths.
pub fn write_sample_pair(dir: &Path, normal: Vec<RecordBuf>, tumor: Vec<RecordBuf>) -> (PathBuf, PathBuf) {
    let header = create_header();
    let normal_path = dir.join("normal.bam");
    let tumor_path = dir.join("tumor.bam");
    write_bam(&normal_path, &header, &sort_by_coordinate(normal)).expect("Failed to write normal BAM");
    write_bam(&tumor_path, &header, &sort_by_coordinate(tumor)).expect("Failed to write tumor BAM");
    (normal_path, tumor_path)
}

/// Normal reads with no indel covering chr1:100, and tumor reads of which `supporting`
/// show a 2-base insertion anchored at chr1:100 at read offset 10.
pub fn insertion_at_chr1_100(supporting: usize, depth: usize) -> (Vec<RecordBuf>, Vec<RecordBuf>) {
    let normal = create_reads("normal", depth, 0, 91, "30M");
    let mut tumor = create_reads("tumor_ins", supporting, 0, 91, "10M2I18M");
    tumor.extend(create_reads("tumor_ref", depth - supporting, 0, 91, "30M"));
    (normal, tumor)
}
