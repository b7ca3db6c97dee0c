//! Read-alignment view used by the indel locator.
//!
//! The caller only needs four things from a read: where it starts on the reference, its
//! CIGAR, its length, and the optional assembled-contig tag. [`AlignmentView`] exposes
//! exactly that, so the calling logic works on decoded noodles records and on shared
//! (`Rc`) records handed out by the per-locus grouping.

use std::rc::Rc;

use bstr::ByteSlice;
use noodles::sam::alignment::RecordBuf;
use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::data::field::Value;

use crate::errors::{CadabraError, Result};

/// An already-decoded read alignment.
pub trait AlignmentView {
    /// 1-based leftmost reference position, if the read is placed.
    fn start_position(&self) -> Option<usize>;

    /// CIGAR operations in read order.
    fn cigar_ops(&self) -> &[Op];

    /// Number of bases in the read.
    fn read_length(&self) -> usize;

    /// Raw text of the contig-evidence tag, if present.
    ///
    /// # Errors
    /// Returns [`CadabraError::MalformedContigTag`] if the tag holds a non-string value.
    fn contig_tag(&self, tag: Tag) -> Result<Option<&[u8]>>;
}

impl AlignmentView for RecordBuf {
    fn start_position(&self) -> Option<usize> {
        self.alignment_start().map(usize::from)
    }

    fn cigar_ops(&self) -> &[Op] {
        self.cigar().as_ref()
    }

    fn read_length(&self) -> usize {
        self.sequence().len()
    }

    fn contig_tag(&self, tag: Tag) -> Result<Option<&[u8]>> {
        match self.data().get(&tag) {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.as_bytes())),
            Some(other) => Err(CadabraError::MalformedContigTag {
                value: format!("{other:?}"),
                reason: "expected a string value".to_string(),
            }),
        }
    }
}

impl<T: AlignmentView + ?Sized> AlignmentView for Rc<T> {
    fn start_position(&self) -> Option<usize> {
        (**self).start_position()
    }

    fn cigar_ops(&self) -> &[Op] {
        (**self).cigar_ops()
    }

    fn read_length(&self) -> usize {
        (**self).read_length()
    }

    fn contig_tag(&self, tag: Tag) -> Result<Option<&[u8]>> {
        (**self).contig_tag(tag)
    }
}
