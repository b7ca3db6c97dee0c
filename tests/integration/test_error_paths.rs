//! Integration tests for failure modes of the somatic command.

use cadabra_lib::sam::builder::{coordinate_sorted_header, write_bam};
use std::process::{Command, Output};
use tempfile::TempDir;

use crate::helpers::{assert_failure_mentions, create_header, create_reads, write_sample_pair};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cadabra"))
        .arg("somatic")
        .args(args)
        .output()
        .expect("Failed to run somatic command")
}

#[test]
fn test_missing_tumor_bam() {
    let dir = TempDir::new().unwrap();
    let (normal, _) = write_sample_pair(dir.path(), Vec::new(), Vec::new());
    let missing = dir.path().join("missing.bam");
    let output = run(&["-n", normal.to_str().unwrap(), "-t", missing.to_str().unwrap()]);
    assert_failure_mentions(&output, "Tumor BAM");
}

#[test]
fn test_invalid_contig_tag_option() {
    let dir = TempDir::new().unwrap();
    let (normal, tumor) = write_sample_pair(dir.path(), Vec::new(), Vec::new());
    let output =
        run(&["-n", normal.to_str().unwrap(), "-t", tumor.to_str().unwrap(), "--contig-tag", "1A"]);
    assert_failure_mentions(&output, "contig-tag");
}

#[test]
fn test_zero_min_supporting_reads() {
    let dir = TempDir::new().unwrap();
    let (normal, tumor) = write_sample_pair(dir.path(), Vec::new(), Vec::new());
    let output = run(&[
        "-n",
        normal.to_str().unwrap(),
        "-t",
        tumor.to_str().unwrap(),
        "--min-supporting-reads",
        "0",
    ]);
    assert_failure_mentions(&output, "min-supporting-reads");
}

#[test]
fn test_out_of_order_tumor_bam() {
    let dir = TempDir::new().unwrap();
    let header = create_header();
    let normal = dir.path().join("normal.bam");
    let tumor = dir.path().join("tumor.bam");
    write_bam(&normal, &header, &create_reads("normal", 2, 0, 91, "30M")).unwrap();

    let mut unsorted = create_reads("late", 1, 0, 200, "30M");
    unsorted.extend(create_reads("early", 1, 0, 100, "30M"));
    write_bam(&tumor, &header, &unsorted).unwrap();

    let output = run(&["-n", normal.to_str().unwrap(), "-t", tumor.to_str().unwrap()]);
    assert_failure_mentions(&output, "tumor input is out of order");
}

#[test]
fn test_tumor_chromosome_missing_from_normal_dictionary() {
    let dir = TempDir::new().unwrap();
    let normal = dir.path().join("normal.bam");
    let tumor = dir.path().join("tumor.bam");
    write_bam(&normal, &create_header(), &create_reads("normal", 2, 0, 91, "30M")).unwrap();

    let tumor_header = coordinate_sorted_header(&[("chrZ", 10_000)]);
    write_bam(&tumor, &tumor_header, &create_reads("tumor", 2, 0, 91, "30M")).unwrap();

    let output = run(&["-n", normal.to_str().unwrap(), "-t", tumor.to_str().unwrap()]);
    assert_failure_mentions(&output, "chrZ");
}

#[test]
fn test_empty_inputs_succeed_with_no_calls() {
    let dir = TempDir::new().unwrap();
    let (normal, tumor) = write_sample_pair(dir.path(), Vec::new(), Vec::new());
    let output = run(&["-n", normal.to_str().unwrap(), "-t", tumor.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}
