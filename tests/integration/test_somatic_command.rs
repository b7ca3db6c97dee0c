//! Integration tests for the somatic command.

use cadabra_lib::metrics::{CallingMetrics, read_metrics};
use cadabra_lib::sam::builder::RecordBuilder;
use noodles::sam::alignment::RecordBuf;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use crate::helpers::{
    assert_calls, assert_failure_mentions, assert_success, call_lines, create_contig_reads,
    create_reads, insertion_at_chr1_100, write_sample_pair,
};

/// Runs `cadabra somatic` on the pair with extra arguments, writing calls to `calls.txt`.
fn run_somatic(dir: &Path, normal: &Path, tumor: &Path, extra: &[&str]) -> Output {
    let calls = dir.join("calls.txt");
    Command::new(env!("CARGO_BIN_EXE_cadabra"))
        .args(["somatic", "-n", normal.to_str().unwrap(), "-t", tumor.to_str().unwrap()])
        .args(["-o", calls.to_str().unwrap()])
        .args(extra)
        .output()
        .expect("Failed to run somatic command")
}

/// Writes the pair, runs the command and returns the calls file path.
fn call_pair(dir: &TempDir, normal: Vec<RecordBuf>, tumor: Vec<RecordBuf>, extra: &[&str]) -> std::path::PathBuf {
    let (normal_bam, tumor_bam) = write_sample_pair(dir.path(), normal, tumor);
    let output = run_somatic(dir.path(), &normal_bam, &tumor_bam, extra);
    assert_success(&output);
    dir.path().join("calls.txt")
}

#[test]
fn test_clean_somatic_insertion() {
    let dir = TempDir::new().unwrap();
    let (normal, tumor) = insertion_at_chr1_100(3, 10);
    let calls = call_pair(&dir, normal, tumor, &[]);
    assert_calls(&calls, &["chr1\t100\tI\t2\t10\t10\t3"]);
}

#[test]
fn test_insertion_near_read_start_is_not_called() {
    let dir = TempDir::new().unwrap();
    let normal = create_reads("normal", 10, 0, 91, "30M");
    let mut tumor = create_reads("tumor_ins", 3, 0, 100, "1M2I27M");
    tumor.extend(create_reads("tumor_ref", 7, 0, 91, "30M"));
    let calls = call_pair(&dir, normal, tumor, &[]);
    assert_calls(&calls, &[]);
}

#[test]
fn test_min_distance_option() {
    let dir = TempDir::new().unwrap();
    let normal = create_reads("normal", 10, 0, 91, "30M");
    let mut tumor = create_reads("tumor_ins", 3, 0, 100, "1M2I27M");
    tumor.extend(create_reads("tumor_ref", 7, 0, 91, "30M"));
    let calls = call_pair(&dir, normal, tumor, &["--min-distance-from-read-end", "0"]);
    assert_calls(&calls, &["chr1\t100\tI\t2\t10\t10\t3"]);
}

#[test]
fn test_normal_evidence_vetoes_call() {
    let dir = TempDir::new().unwrap();
    let (mut normal, tumor) = insertion_at_chr1_100(3, 10);
    normal.pop();
    normal.extend(create_reads("normal_ins", 1, 0, 86, "15M2I13M"));
    let calls = call_pair(&dir, normal, tumor, &[]);
    assert_calls(&calls, &[]);
}

#[test]
fn test_conflicting_tumor_evidence_is_not_called() {
    let dir = TempDir::new().unwrap();
    let normal = create_reads("normal", 10, 0, 91, "30M");
    let mut tumor = create_reads("tumor_ins", 2, 0, 91, "10M2I18M");
    tumor.extend(create_reads("tumor_del", 1, 0, 89, "12M1D18M"));
    tumor.extend(create_reads("tumor_ref", 7, 0, 91, "30M"));
    let calls = call_pair(&dir, normal, tumor, &[]);
    assert_calls(&calls, &[]);
}

#[test]
fn test_contig_disagreement_removes_evidence() {
    let dir = TempDir::new().unwrap();
    let normal = create_reads("normal", 10, 0, 91, "30M");
    let mut tumor = create_contig_reads("tumor", 3, 0, 91, "10M2I18M", "YA", "ctg:91:10M3D20M");
    tumor.extend(create_reads("tumor_ref", 7, 0, 91, "30M"));
    let calls = call_pair(&dir, normal, tumor, &[]);
    assert_calls(&calls, &[]);
}

#[test]
fn test_contig_length_is_reported() {
    let dir = TempDir::new().unwrap();
    let normal = create_reads("normal", 4, 0, 91, "30M");
    let tumor = create_contig_reads("tumor", 2, 0, 91, "10M2I18M", "YA", "asm1:61:40M5I40M");
    let calls = call_pair(&dir, normal, tumor, &[]);
    assert_calls(&calls, &["chr1\t100\tI\t5\t4\t2\t2"]);
}

#[test]
fn test_custom_contig_tag() {
    let dir = TempDir::new().unwrap();
    let normal = create_reads("normal", 4, 0, 91, "30M");
    let tumor = create_contig_reads("tumor", 3, 0, 91, "10M2I18M", "XC", "ctg:91:10M3D20M");

    // With the default tag the XC tag is not consulted and the reads' own CIGARs are used.
    let calls = call_pair(&dir, normal.clone(), tumor.clone(), &[]);
    assert_calls(&calls, &["chr1\t100\tI\t2\t4\t3\t3"]);

    let calls = call_pair(&dir, normal, tumor, &["--contig-tag", "XC"]);
    assert_calls(&calls, &[]);
}

#[test]
fn test_require_contig_evidence() {
    let dir = TempDir::new().unwrap();
    let (normal, tumor) = insertion_at_chr1_100(3, 10);
    let calls = call_pair(&dir, normal, tumor, &["--require-contig-evidence"]);
    assert_calls(&calls, &[]);
}

#[test]
fn test_min_supporting_reads() {
    let dir = TempDir::new().unwrap();
    let (normal, tumor) = insertion_at_chr1_100(1, 5);

    let calls = call_pair(&dir, normal.clone(), tumor.clone(), &[]);
    assert_calls(&calls, &[]);

    let calls = call_pair(&dir, normal, tumor, &["--min-supporting-reads", "1"]);
    assert_calls(&calls, &["chr1\t100\tI\t2\t5\t5\t1"]);
}

#[test]
fn test_duplicates_are_ignored_by_default() {
    let dir = TempDir::new().unwrap();
    let normal = create_reads("normal", 5, 0, 91, "30M");
    let mut tumor: Vec<RecordBuf> = (0..2)
        .map(|i| {
            RecordBuilder::mapped_read()
                .name(&format!("dup{i}"))
                .alignment_start(91)
                .cigar("10M2I18M")
                .duplicate(true)
                .build()
        })
        .collect();
    tumor.extend(create_reads("tumor_ref", 3, 0, 91, "30M"));

    let calls = call_pair(&dir, normal.clone(), tumor.clone(), &[]);
    assert_calls(&calls, &[]);

    let calls = call_pair(&dir, normal, tumor, &["--include-duplicates"]);
    assert_calls(&calls, &["chr1\t100\tI\t2\t5\t5\t2"]);
}

#[test]
fn test_calls_follow_sequence_dictionary_order() {
    let dir = TempDir::new().unwrap();
    let mut normal = Vec::new();
    let mut tumor = Vec::new();
    // chr10 (ref id 2) sorts after chr2 (ref id 1) in the dictionary.
    for ref_id in [0, 1, 2] {
        normal.extend(create_reads("normal", 4, ref_id, 491, "30M"));
        tumor.extend(create_reads("tumor", 2, ref_id, 489, "12M3D18M"));
    }
    let calls = call_pair(&dir, normal, tumor, &[]);
    assert_calls(
        &calls,
        &["chr1\t500\tD\t3\t4\t2\t2", "chr2\t500\tD\t3\t4\t2\t2", "chr10\t500\tD\t3\t4\t2\t2"],
    );
}

#[test]
fn test_calls_to_stdout_and_metrics() {
    let dir = TempDir::new().unwrap();
    let (normal, tumor) = insertion_at_chr1_100(3, 10);
    let (normal_bam, tumor_bam) = write_sample_pair(dir.path(), normal, tumor);
    let metrics_path = dir.path().join("metrics.txt");

    let output = Command::new(env!("CARGO_BIN_EXE_cadabra"))
        .args(["somatic", "-n", normal_bam.to_str().unwrap(), "-t", tumor_bam.to_str().unwrap()])
        .args(["-m", metrics_path.to_str().unwrap()])
        .output()
        .expect("Failed to run somatic command");
    assert_success(&output);

    assert_eq!(call_lines(&String::from_utf8_lossy(&output.stdout)), ["chr1\t100\tI\t2\t10\t10\t3"]);

    let metrics: Vec<CallingMetrics> = read_metrics(&metrics_path).unwrap();
    assert_eq!(metrics.len(), 1);
    let metrics = &metrics[0];
    assert_eq!(metrics.calls, 1);
    assert_eq!(metrics.insertions, 1);
    assert_eq!(metrics.matched_loci, 30);
    assert_eq!(metrics.no_tumor_evidence, 29);
    assert_eq!(metrics.normal_reads, 10);
    assert_eq!(metrics.tumor_reads, 10);
    assert_eq!(metrics.tumor_reads_skipped, 0);
}

#[test]
fn test_malformed_contig_tag_is_fatal_by_default() {
    let dir = TempDir::new().unwrap();
    let normal = create_reads("normal", 4, 0, 91, "30M");
    let tumor = create_contig_reads("tumor", 3, 0, 91, "10M2I18M", "YA", "ctg:x:10M2I20M");
    let (normal_bam, tumor_bam) = write_sample_pair(dir.path(), normal, tumor);

    let output = run_somatic(dir.path(), &normal_bam, &tumor_bam, &[]);
    assert_failure_mentions(&output, "Malformed contig tag");
}

#[test]
fn test_lenient_contig_tags_fall_back_to_read() {
    let dir = TempDir::new().unwrap();
    let normal = create_reads("normal", 4, 0, 91, "30M");
    let tumor = create_contig_reads("tumor", 3, 0, 91, "10M2I18M", "YA", "ctg:x:10M2I20M");
    let calls = call_pair(&dir, normal, tumor, &["--lenient-contig-tags"]);
    assert_calls(&calls, &["chr1\t100\tI\t2\t4\t3\t3"]);
}
