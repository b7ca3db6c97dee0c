//! Locating an indel anchored at a reference position within a read.
//!
//! An indel is reported at the reference base immediately preceding the inserted or
//! deleted bases, so an insertion or deletion belongs to locus `p` when the CIGAR walk
//! reaches it with the running reference position at `p + 1`.
//!
//! Two lookups are provided:
//!
//! - [`locate`] / [`locate_in_read`]: the plain CIGAR walk over one alignment.
//! - [`IndelLocator::locate_with_contig`]: the tumor-side lookup, where an assembled
//!   contig decides *where* the indel is and the read's own CIGAR must agree on the
//!   operator and supplies the offset of the indel within the read.

use std::cell::Cell;
use std::fmt;

use log::{debug, warn};
use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record::data::field::Tag;

use crate::alignment::AlignmentView;
use crate::contig::ContigEvidence;
use crate::errors::Result;

/// Default tag carrying assembled-contig evidence.
pub const DEFAULT_CONTIG_TAG: Tag = Tag::new(b'Y', b'A');

/// Default minimum distance of an indel from either end of its read.
pub const DEFAULT_MIN_DISTANCE_FROM_READ_END: usize = 3;

/// Insertion or deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndelKind {
    /// Bases present in the read but not the reference
    Insertion,
    /// Reference bases absent from the read
    Deletion,
}

impl IndelKind {
    /// Single-letter CIGAR code (`I` or `D`).
    #[must_use]
    pub fn code(self) -> char {
        match self {
            IndelKind::Insertion => 'I',
            IndelKind::Deletion => 'D',
        }
    }
}

impl fmt::Display for IndelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Identity of an indel: operator and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndelSignature {
    /// Insertion or deletion
    pub kind: IndelKind,
    /// Number of inserted or deleted bases
    pub len: usize,
}

/// An indel found in a read at a target locus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndelEvidence {
    /// Operator and length
    pub signature: IndelSignature,
    /// 0-based offset into the read where the indel begins
    pub read_offset: usize,
}

impl IndelEvidence {
    /// Creates evidence for an indel of `kind` and `len` at `read_offset`.
    #[must_use]
    pub fn new(kind: IndelKind, len: usize, read_offset: usize) -> Self {
        Self { signature: IndelSignature { kind, len }, read_offset }
    }

    /// Operator of the indel.
    #[must_use]
    pub fn kind(&self) -> IndelKind {
        self.signature.kind
    }
}

/// Walks `ops` from `alignment_start` looking for an indel anchored at `target`.
///
/// The first insertion or deletion met with the running reference position at
/// `target + 1` is returned. `=`/`X` advance like `M`, `N` consumes reference without
/// being reported, and hard clips and padding are ignored.
///
/// # Example
/// ```
/// use cadabra_lib::indel::{IndelEvidence, IndelKind, locate};
/// use cadabra_lib::sam::parse_cigar_text;
///
/// let ops = parse_cigar_text("10M2I18M").unwrap();
/// assert_eq!(locate(91, &ops, 100), Some(IndelEvidence::new(IndelKind::Insertion, 2, 10)));
/// assert_eq!(locate(91, &ops, 101), None);
/// ```
#[must_use]
pub fn locate(alignment_start: usize, ops: &[Op], target: usize) -> Option<IndelEvidence> {
    let anchor = target + 1;
    let mut ref_pos = alignment_start;
    let mut read_offset = 0;

    for op in ops {
        let len = op.len();
        match op.kind() {
            Kind::Match | Kind::SequenceMatch | Kind::SequenceMismatch => {
                ref_pos += len;
                read_offset += len;
            }
            Kind::SoftClip => read_offset += len,
            Kind::Insertion => {
                if ref_pos == anchor {
                    return Some(IndelEvidence::new(IndelKind::Insertion, len, read_offset));
                }
                read_offset += len;
            }
            Kind::Deletion => {
                if ref_pos == anchor {
                    return Some(IndelEvidence::new(IndelKind::Deletion, len, read_offset));
                }
                ref_pos += len;
            }
            Kind::Skip => ref_pos += len,
            Kind::HardClip | Kind::Pad => {}
        }
    }

    None
}

/// Plain CIGAR walk over a read's own alignment. Unplaced reads have no evidence.
#[must_use]
pub fn locate_in_read<V: AlignmentView + ?Sized>(read: &V, target: usize) -> Option<IndelEvidence> {
    let start = read.start_position()?;
    locate(start, read.cigar_ops(), target)
}

/// What to do with a contig tag that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContigTagPolicy {
    /// Fail the run
    #[default]
    Strict,
    /// Treat the read as having no contig evidence. The first malformed tag is logged
    /// as a warning, later ones at debug level.
    Lenient,
}

/// Tumor-side indel lookup with assembled-contig cross-validation.
#[derive(Debug, Clone)]
pub struct IndelLocator {
    contig_tag: Tag,
    policy: ContigTagPolicy,
    require_contig_evidence: bool,
    malformed_tags_ignored: Cell<u64>,
}

impl Default for IndelLocator {
    fn default() -> Self {
        Self::new(DEFAULT_CONTIG_TAG)
    }
}

impl IndelLocator {
    /// Creates a locator reading contig evidence from `contig_tag`, with the strict tag
    /// policy and falling back to the read's own CIGAR when no contig tag is present.
    #[must_use]
    pub fn new(contig_tag: Tag) -> Self {
        Self {
            contig_tag,
            policy: ContigTagPolicy::Strict,
            require_contig_evidence: false,
            malformed_tags_ignored: Cell::new(0),
        }
    }

    /// Sets the policy for malformed contig tags.
    #[must_use]
    pub fn with_policy(mut self, policy: ContigTagPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// When set, reads without contig evidence contribute nothing.
    #[must_use]
    pub fn with_require_contig_evidence(mut self, require: bool) -> Self {
        self.require_contig_evidence = require;
        self
    }

    /// The tag holding contig evidence.
    #[must_use]
    pub fn contig_tag(&self) -> Tag {
        self.contig_tag
    }

    /// Malformed tags ignored under [`ContigTagPolicy::Lenient`]. A read is counted once
    /// for every locus it covers.
    #[must_use]
    pub fn malformed_tags_ignored(&self) -> u64 {
        self.malformed_tags_ignored.get()
    }

    /// Parses the contig evidence on `read`, applying the malformed-tag policy.
    ///
    /// # Errors
    /// Returns the parse error under [`ContigTagPolicy::Strict`].
    pub fn contig_evidence<V: AlignmentView + ?Sized>(
        &self,
        read: &V,
    ) -> Result<Option<ContigEvidence>> {
        let parsed = read
            .contig_tag(self.contig_tag)
            .and_then(|raw| raw.map(ContigEvidence::parse).transpose());

        match (parsed, self.policy) {
            (Ok(contig), _) => Ok(contig),
            (Err(e), ContigTagPolicy::Strict) => Err(e),
            (Err(e), ContigTagPolicy::Lenient) => {
                let ignored = self.malformed_tags_ignored.get();
                if ignored == 0 {
                    warn!(
                        "Ignoring contig evidence: {e} (further malformed tags are logged at debug level)"
                    );
                } else {
                    debug!("Ignoring contig evidence: {e}");
                }
                self.malformed_tags_ignored.set(ignored + 1);
                Ok(None)
            }
        }
    }

    /// Finds the indel a tumor read supports at `target`.
    ///
    /// With contig evidence, the contig must carry an indel at `target` and the read's own
    /// CIGAR must show an indel of the same operator there (lengths may differ). The result
    /// takes its operator and length from the contig and its read offset from the read.
    /// Without contig evidence the read's own CIGAR is used, unless contig evidence is
    /// required.
    ///
    /// # Errors
    /// Returns an error if the contig tag is malformed under the strict policy.
    pub fn locate_with_contig<V: AlignmentView + ?Sized>(
        &self,
        read: &V,
        target: usize,
    ) -> Result<Option<IndelEvidence>> {
        let Some(contig) = self.contig_evidence(read)? else {
            if self.require_contig_evidence {
                return Ok(None);
            }
            return Ok(locate_in_read(read, target));
        };

        let Some(contig_indel) = locate(contig.start, &contig.cigar, target) else {
            return Ok(None);
        };

        Ok(locate_in_read(read, target)
            .filter(|read_indel| read_indel.kind() == contig_indel.kind())
            .map(|read_indel| IndelEvidence { read_offset: read_indel.read_offset, ..contig_indel }))
    }
}

/// Accepts indels whose start lies far enough inside the read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceFilter {
    min_distance: usize,
}

impl Default for DistanceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DISTANCE_FROM_READ_END)
    }
}

impl DistanceFilter {
    /// Creates a filter requiring `min_distance` bases on either side.
    #[must_use]
    pub fn new(min_distance: usize) -> Self {
        Self { min_distance }
    }

    /// True iff `min_distance <= read_offset <= read_length - min_distance - 1`.
    #[must_use]
    pub fn passes(&self, read_offset: usize, read_length: usize) -> bool {
        read_offset >= self.min_distance && read_offset + self.min_distance < read_length
    }
}
