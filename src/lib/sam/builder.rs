//! Builders for test records and BAM fixtures.
//!
//! [`RecordBuilder`] creates individual [`RecordBuf`]s with a fluent API. When only a
//! CIGAR is given, a sequence of the matching query length is generated so that the read
//! length agrees with the alignment.
//!
//! ```rust
//! use cadabra_lib::sam::builder::RecordBuilder;
//!
//! let record = RecordBuilder::mapped_read()
//!     .name("read1")
//!     .alignment_start(91)
//!     .cigar("10M2I18M")
//!     .tag("YA", "ctg1:91:10M2I18M")
//!     .build();
//!
//! assert_eq!(record.sequence().len(), 30);
//! ```

use anyhow::{Context, Result};
use bstr::BString;
use noodles::bam;
use noodles::core::Position;
use noodles::sam::Header;
use noodles::sam::alignment::io::Write as AlignmentWrite;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record::{Flags, MappingQuality};
use noodles::sam::alignment::record_buf::data::field::Value as BufValue;
use noodles::sam::alignment::record_buf::{QualityScores, RecordBuf, Sequence};
use noodles::sam::header::record::value::Map;
use noodles::sam::header::record::value::map::header::tag::Tag as HeaderTag;
use noodles::sam::header::record::value::map::{Header as HeaderRecord, ReferenceSequence};
use std::fs::File;
use std::num::NonZeroUsize;
use std::path::Path;

use super::record_utils::{parse_cigar_text, query_length};

/// Default base quality for generated qualities.
pub const DEFAULT_BASE_QUALITY: u8 = 30;

/// Builder for a single alignment record.
#[derive(Debug)]
pub struct RecordBuilder {
    name: Option<Vec<u8>>,
    flags: Flags,
    reference_sequence_id: Option<usize>,
    alignment_start: Option<usize>,
    mapping_quality: Option<u8>,
    cigar: Option<String>,
    sequence: Vec<u8>,
    tags: Vec<(Tag, BufValue)>,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: None,
            flags: Flags::empty(),
            reference_sequence_id: None,
            alignment_start: None,
            mapping_quality: Some(60),
            cigar: None,
            sequence: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Creates a builder for a read mapped to reference sequence 0.
    #[must_use]
    pub fn mapped_read() -> Self {
        Self { reference_sequence_id: Some(0), ..Self::new() }
    }

    /// Sets the read name.
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.as_bytes().to_vec());
        self
    }

    /// Sets the sequence.
    #[must_use]
    pub fn sequence(mut self, seq: &str) -> Self {
        self.sequence = seq.as_bytes().to_vec();
        self
    }

    /// Sets the reference sequence ID (0-based).
    #[must_use]
    pub fn reference_sequence_id(mut self, id: usize) -> Self {
        self.reference_sequence_id = Some(id);
        self
    }

    /// Sets the alignment start position (1-based).
    #[must_use]
    pub fn alignment_start(mut self, pos: usize) -> Self {
        self.alignment_start = Some(pos);
        self
    }

    /// Sets the mapping quality.
    #[must_use]
    pub fn mapping_quality(mut self, mapq: u8) -> Self {
        self.mapping_quality = Some(mapq);
        self
    }

    /// Sets the CIGAR string.
    #[must_use]
    pub fn cigar(mut self, cigar: &str) -> Self {
        self.cigar = Some(cigar.to_string());
        self
    }

    /// Sets the unmapped flag.
    #[must_use]
    pub fn unmapped(mut self, unmapped: bool) -> Self {
        self.flags.set(Flags::UNMAPPED, unmapped);
        self
    }

    /// Sets the secondary alignment flag.
    #[must_use]
    pub fn secondary(mut self, secondary: bool) -> Self {
        self.flags.set(Flags::SECONDARY, secondary);
        self
    }

    /// Sets the supplementary alignment flag.
    #[must_use]
    pub fn supplementary(mut self, supplementary: bool) -> Self {
        self.flags.set(Flags::SUPPLEMENTARY, supplementary);
        self
    }

    /// Sets the duplicate flag.
    #[must_use]
    pub fn duplicate(mut self, duplicate: bool) -> Self {
        self.flags.set(Flags::DUPLICATE, duplicate);
        self
    }

    /// Sets the QC-fail flag.
    #[must_use]
    pub fn qc_fail(mut self, qc_fail: bool) -> Self {
        self.flags.set(Flags::QC_FAIL, qc_fail);
        self
    }

    /// Adds a SAM tag. Tags that are not exactly two characters are ignored.
    #[must_use]
    pub fn tag<V: Into<BufValue>>(mut self, tag: &str, value: V) -> Self {
        let tag_bytes = tag.as_bytes();
        if tag_bytes.len() == 2 {
            self.tags.push((Tag::new(tag_bytes[0], tag_bytes[1]), value.into()));
        }
        self
    }

    /// Builds the `RecordBuf`.
    ///
    /// # Panics
    ///
    /// Panics on an invalid CIGAR, a zero alignment start or mapping quality 255.
    #[must_use]
    pub fn build(self) -> RecordBuf {
        let mut record = RecordBuf::default();

        if let Some(name) = self.name {
            *record.name_mut() = Some(name.into());
        }
        *record.flags_mut() = self.flags;

        if let Some(ref_id) = self.reference_sequence_id {
            *record.reference_sequence_id_mut() = Some(ref_id);
        }
        if let Some(pos) = self.alignment_start {
            *record.alignment_start_mut() =
                Some(Position::try_from(pos).expect("alignment_start must be >= 1"));
        }
        if let Some(mapq) = self.mapping_quality {
            *record.mapping_quality_mut() =
                Some(MappingQuality::new(mapq).expect("mapping_quality must be < 255"));
        }

        let mut sequence = self.sequence;
        if let Some(cigar) = self.cigar {
            let ops = parse_cigar_text(&cigar).expect("invalid CIGAR in RecordBuilder");
            if sequence.is_empty() {
                sequence = b"ACGT".iter().copied().cycle().take(query_length(&ops)).collect();
            }
            *record.cigar_mut() = ops.into_iter().collect();
        }

        let qualities = vec![DEFAULT_BASE_QUALITY; sequence.len()];
        *record.sequence_mut() = Sequence::from(sequence);
        *record.quality_scores_mut() = QualityScores::from(qualities);

        for (tag, value) in self.tags {
            record.data_mut().insert(tag, value);
        }

        record
    }
}

/// Creates a header declaring `SO:coordinate` with the given reference sequences, in order.
///
/// # Panics
///
/// Panics if a reference length is zero.
#[must_use]
pub fn coordinate_sorted_header(references: &[(&str, usize)]) -> Header {
    let HeaderTag::Other(sort_order_tag) = HeaderTag::from([b'S', b'O']) else { unreachable!() };

    let header_map = Map::<HeaderRecord>::builder()
        .insert(sort_order_tag, "coordinate")
        .build()
        .expect("valid header map");

    references
        .iter()
        .fold(Header::builder().set_header(header_map), |builder, (name, len)| {
            let reference_sequence = Map::<ReferenceSequence>::new(
                NonZeroUsize::new(*len).expect("reference length must be non-zero"),
            );
            builder.add_reference_sequence(BString::from(*name), reference_sequence)
        })
        .build()
}

/// Writes `records` to a BAM file at `path` with the given header.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_bam(path: &Path, header: &Header, records: &[RecordBuf]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create BAM: {}", path.display()))?;
    let mut writer = bam::io::Writer::new(file);
    writer.write_header(header)?;
    for record in records {
        writer.write_alignment_record(header, record)?;
    }
    writer.finish(header)?;
    Ok(())
}
