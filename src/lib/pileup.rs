//! Grouping of coordinate-sorted reads into per-locus pileups.
//!
//! [`ReadLocusReader`] walks a coordinate-sorted record stream and yields, for every
//! reference position covered by at least one accepted read, the locus and the reads
//! whose aligned span covers it. A read covers `[alignment_start, alignment_end]`, so
//! deletions are included and soft clips are not. Stretches with no coverage are
//! skipped in one step to the next read start.
//!
//! Reads are shared between the loci they cover through [`Rc`], so a read spanning 150
//! positions is decoded once and appears in 150 groups without being copied.

use std::io;
use std::rc::Rc;

use noodles::sam::Header;
use noodles::sam::alignment::RecordBuf;

use crate::errors::{CadabraError, Result};
use crate::locus::Locus;
use crate::sam::record_utils::alignment_end;

/// Reads covering one locus.
pub type ReadGroup = Vec<Rc<RecordBuf>>;

/// Which records take part in the pileup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadFilter {
    /// Keep reads flagged as PCR/optical duplicates
    pub include_duplicates: bool,
}

impl ReadFilter {
    /// True if the record is a mapped primary alignment that passed QC, and not a
    /// duplicate unless duplicates are included.
    #[must_use]
    pub fn accepts(&self, record: &RecordBuf) -> bool {
        let flags = record.flags();
        !(flags.is_unmapped()
            || flags.is_secondary()
            || flags.is_supplementary()
            || flags.is_qc_fail()
            || (flags.is_duplicate() && !self.include_duplicates))
    }
}

/// An accepted read with its reference span resolved.
struct PlacedRead {
    reference_id: usize,
    start: usize,
    end: usize,
    record: Rc<RecordBuf>,
}

/// Yields `(Locus, ReadGroup)` for each covered position of a coordinate-sorted input.
pub struct ReadLocusReader<I> {
    records: I,
    sample: String,
    chromosomes: Vec<String>,
    filter: ReadFilter,
    active: Vec<PlacedRead>,
    pending: Option<PlacedRead>,
    cursor: Option<(usize, usize)>,
    last_start: Option<(usize, usize)>,
    records_accepted: u64,
    records_skipped: u64,
    done: bool,
}

impl<I> ReadLocusReader<I>
where
    I: Iterator<Item = io::Result<RecordBuf>>,
{
    /// Creates a reader over `records`, resolving chromosome names through `header`.
    ///
    /// `sample` labels ordering errors (e.g. "normal", "tumor").
    pub fn new(records: I, header: &Header, sample: impl Into<String>, filter: ReadFilter) -> Self {
        let chromosomes = header.reference_sequences().keys().map(ToString::to_string).collect();
        Self {
            records,
            sample: sample.into(),
            chromosomes,
            filter,
            active: Vec::new(),
            pending: None,
            cursor: None,
            last_start: None,
            records_accepted: 0,
            records_skipped: 0,
            done: false,
        }
    }

    /// Records that entered the pileup so far.
    pub fn records_accepted(&self) -> u64 {
        self.records_accepted
    }

    /// Records skipped by the read filter or for lacking a placed alignment.
    pub fn records_skipped(&self) -> u64 {
        self.records_skipped
    }

    fn chromosome_name(&self, reference_id: usize) -> Result<&str> {
        self.chromosomes
            .get(reference_id)
            .map(String::as_str)
            .ok_or_else(|| CadabraError::UnknownChromosome { name: format!("reference id {reference_id}") })
    }

    fn describe(&self, (reference_id, position): (usize, usize)) -> String {
        match self.chromosomes.get(reference_id) {
            Some(name) => Locus::new(name.as_str(), position).to_string(),
            None => format!("reference id {reference_id}:{position}"),
        }
    }

    /// Loads the next accepted read into `pending` if it is empty.
    fn fill_pending(&mut self) -> Result<()> {
        while self.pending.is_none() {
            let Some(record) = self.records.next().transpose()? else {
                return Ok(());
            };

            if !self.filter.accepts(&record) {
                self.records_skipped += 1;
                continue;
            }

            let placement = record.reference_sequence_id().zip(record.alignment_start()).and_then(
                |(reference_id, start)| {
                    let start = usize::from(start);
                    alignment_end(start, record.cigar().as_ref()).map(|end| (reference_id, start, end))
                },
            );
            let Some((reference_id, start, end)) = placement else {
                self.records_skipped += 1;
                continue;
            };

            self.chromosome_name(reference_id)?;
            if let Some(previous) = self.last_start {
                if (reference_id, start) < previous {
                    return Err(CadabraError::OrderingViolation {
                        sample: self.sample.clone(),
                        previous: self.describe(previous),
                        current: self.describe((reference_id, start)),
                    });
                }
            }
            self.last_start = Some((reference_id, start));
            self.records_accepted += 1;
            self.pending = Some(PlacedRead { reference_id, start, end, record: Rc::new(record) });
        }
        Ok(())
    }

    fn advance(&mut self) -> Result<Option<(Locus, ReadGroup)>> {
        if let Some((_, position)) = self.cursor {
            self.active.retain(|read| read.end >= position);
        }

        self.fill_pending()?;
        if self.active.is_empty() {
            let Some(next) = &self.pending else {
                return Ok(None);
            };
            self.cursor = Some((next.reference_id, next.start));
        }

        let Some((reference_id, position)) = self.cursor else {
            return Ok(None);
        };

        while self
            .pending
            .as_ref()
            .is_some_and(|read| read.reference_id == reference_id && read.start == position)
        {
            if let Some(read) = self.pending.take() {
                self.active.push(read);
            }
            self.fill_pending()?;
        }

        let group: ReadGroup = self.active.iter().map(|read| Rc::clone(&read.record)).collect();
        let locus = Locus::new(self.chromosome_name(reference_id)?, position);
        self.cursor = Some((reference_id, position + 1));
        Ok(Some((locus, group)))
    }
}

impl<I> Iterator for ReadLocusReader<I>
where
    I: Iterator<Item = io::Result<RecordBuf>>,
{
    type Item = Result<(Locus, ReadGroup)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sam::builder::{RecordBuilder, coordinate_sorted_header};

    fn header() -> Header {
        coordinate_sorted_header(&[("chr1", 10_000), ("chr2", 10_000)])
    }

    fn read(name: &str, reference_id: usize, start: usize, cigar: &str) -> RecordBuf {
        RecordBuilder::mapped_read()
            .name(name)
            .reference_sequence_id(reference_id)
            .alignment_start(start)
            .cigar(cigar)
            .build()
    }

    fn pileup(records: Vec<RecordBuf>) -> Vec<(String, Vec<String>)> {
        let header = header();
        ReadLocusReader::new(records.into_iter().map(Ok), &header, "tumor", ReadFilter::default())
            .map(|item| {
                let (locus, reads) = item.unwrap();
                let names = reads
                    .iter()
                    .map(|r| String::from_utf8(r.name().unwrap().to_vec()).unwrap())
                    .collect();
                (locus.to_string(), names)
            })
            .collect()
    }

    #[test]
    fn test_overlapping_reads() {
        let groups = pileup(vec![read("a", 0, 10, "3M"), read("b", 0, 11, "3M")]);
        let expected: Vec<(String, Vec<String>)> = vec![
            ("chr1:10".into(), vec!["a".into()]),
            ("chr1:11".into(), vec!["a".into(), "b".into()]),
            ("chr1:12".into(), vec!["a".into(), "b".into()]),
            ("chr1:13".into(), vec!["b".into()]),
        ];
        assert_eq!(groups, expected);
    }

    #[test]
    fn test_gap_is_skipped() {
        let groups = pileup(vec![read("a", 0, 10, "2M"), read("b", 0, 100, "1M")]);
        let loci: Vec<&str> = groups.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(loci, vec!["chr1:10", "chr1:11", "chr1:100"]);
    }

    #[test]
    fn test_deletion_covered_and_soft_clip_not() {
        let groups = pileup(vec![read("a", 0, 10, "2S1M2D1M")]);
        let loci: Vec<&str> = groups.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(loci, vec!["chr1:10", "chr1:11", "chr1:12", "chr1:13"]);
    }

    #[test]
    fn test_chromosome_change_flushes_window() {
        let groups = pileup(vec![read("a", 0, 9_999, "2M"), read("b", 1, 1, "1M")]);
        let loci: Vec<&str> = groups.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(loci, vec!["chr1:9999", "chr1:10000", "chr2:1"]);
        assert_eq!(groups[2].1, vec!["b".to_string()]);
    }

    #[test]
    fn test_filtered_reads_are_skipped() {
        let header = header();
        let records = vec![
            RecordBuilder::mapped_read().name("dup").alignment_start(5).cigar("1M").duplicate(true).build(),
            RecordBuilder::mapped_read().name("sec").alignment_start(5).cigar("1M").secondary(true).build(),
            RecordBuilder::mapped_read().name("sup").alignment_start(5).cigar("1M").supplementary(true).build(),
            RecordBuilder::mapped_read().name("qc").alignment_start(5).cigar("1M").qc_fail(true).build(),
            RecordBuilder::new().name("unmapped").unmapped(true).build(),
            RecordBuilder::mapped_read().name("nocigar").alignment_start(5).build(),
            RecordBuilder::mapped_read().name("ok").alignment_start(5).cigar("1M").build(),
        ];

        let mut reader =
            ReadLocusReader::new(records.clone().into_iter().map(Ok), &header, "normal", ReadFilter::default());
        let (locus, reads) = reader.next().unwrap().unwrap();
        assert_eq!(locus, Locus::new("chr1", 5));
        assert_eq!(reads.len(), 1);
        assert!(reader.next().is_none());
        assert_eq!(reader.records_accepted(), 1);
        assert_eq!(reader.records_skipped(), 6);

        let with_dups = ReadFilter { include_duplicates: true };
        let mut reader = ReadLocusReader::new(records.into_iter().map(Ok), &header, "normal", with_dups);
        assert_eq!(reader.next().unwrap().unwrap().1.len(), 2);
    }

    #[test]
    fn test_out_of_order_records() {
        let header = header();
        let records = vec![read("a", 0, 50, "1M"), read("b", 0, 40, "1M")];
        let mut reader =
            ReadLocusReader::new(records.into_iter().map(Ok), &header, "tumor", ReadFilter::default());
        let err = reader.find_map(Result::err).unwrap();
        assert!(matches!(
            &err,
            CadabraError::OrderingViolation { sample, previous, current }
                if sample == "tumor" && previous == "chr1:50" && current == "chr1:40"
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_unknown_reference_id() {
        let header = header();
        let records = vec![read("a", 7, 50, "1M")];
        let mut reader =
            ReadLocusReader::new(records.into_iter().map(Ok), &header, "tumor", ReadFilter::default());
        assert!(matches!(reader.next(), Some(Err(CadabraError::UnknownChromosome { .. }))));
    }

    #[test]
    fn test_io_error_is_propagated() {
        let header = header();
        let records = vec![Ok(read("a", 0, 1, "1M")), Err(io::Error::other("truncated"))];
        let items: Vec<_> =
            ReadLocusReader::new(records.into_iter(), &header, "tumor", ReadFilter::default()).collect();
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(CadabraError::Io(_))));
    }

    #[test]
    fn test_empty_input() {
        assert!(pileup(Vec::new()).is_empty());
    }
}
