//! BAM file input.
//!
//! Opens a BAM file, reads its header, and exposes the records as an owning iterator of
//! decoded [`RecordBuf`]s that can be handed to the per-locus grouping.

use anyhow::{Context, Result};
use noodles::bam;
use noodles::sam::Header;
use noodles::sam::alignment::RecordBuf;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Owning iterator over the records of an open BAM file.
pub struct BamRecords<R> {
    reader: bam::io::Reader<R>,
    header: Header,
    path: PathBuf,
    done: bool,
}

impl<R: Read> BamRecords<R> {
    /// Wraps an open reader positioned after its header.
    pub fn new(reader: bam::io::Reader<R>, header: Header, path: impl Into<PathBuf>) -> Self {
        Self { reader, header, path: path.into(), done: false }
    }
}

impl<R: Read> Iterator for BamRecords<R> {
    type Item = io::Result<RecordBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut record = RecordBuf::default();
        match self.reader.read_record_buf(&self.header, &mut record) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => Some(Ok(record)),
            Err(e) => {
                self.done = true;
                Some(Err(io::Error::new(
                    e.kind(),
                    format!("Failed to read record from {}: {e}", self.path.display()),
                )))
            }
        }
    }
}

/// Opens a BAM file and reads its header.
///
/// # Returns
/// A tuple of (`header`, `records`)
///
/// # Errors
/// Returns an error if the file cannot be opened or the header cannot be read
pub fn open_bam_records<P: AsRef<Path>>(path: P) -> Result<(Header, BamRecords<impl Read>)> {
    let path = path.as_ref();
    let mut reader = bam::io::reader::Builder
        .build_from_path(path)
        .with_context(|| format!("Failed to open input BAM: {}", path.display()))?;
    let header = reader
        .read_header()
        .with_context(|| format!("Failed to read header from: {}", path.display()))?;

    Ok((header.clone(), BamRecords::new(reader, header, path)))
}
