//! Record-level utilities for SAM/BAM records.
//!
//! - CIGAR text parsing into noodles [`Op`]s
//! - Reference and query lengths of a CIGAR
//! - Alignment end positions

use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::cigar::op::Kind;

use crate::errors::{CadabraError, Result};

/// Largest operation length a BAM CIGAR can encode (28 bits).
pub const MAX_CIGAR_OP_LENGTH: usize = (1 << 28) - 1;

/// Parses compact CIGAR text (e.g. `"10M2I20M"`) into CIGAR operations.
///
/// Every operation must carry an explicit, non-zero length. `*` and the empty string
/// are rejected since they carry no alignment.
///
/// # Errors
/// Returns [`CadabraError::InvalidCigar`] on unknown operators, missing or zero lengths,
/// lengths above [`MAX_CIGAR_OP_LENGTH`], and trailing digits.
///
/// # Example
/// ```
/// use cadabra_lib::sam::parse_cigar_text;
/// use noodles::sam::alignment::record::cigar::op::Kind;
///
/// let ops = parse_cigar_text("10M2I20M").unwrap();
/// assert_eq!(ops.len(), 3);
/// assert_eq!(ops[1].kind(), Kind::Insertion);
/// assert_eq!(ops[1].len(), 2);
/// ```
pub fn parse_cigar_text(cigar: &str) -> Result<Vec<Op>> {
    let invalid = |reason: String| CadabraError::InvalidCigar { cigar: cigar.to_string(), reason };

    if cigar.is_empty() || cigar == "*" {
        return Err(invalid("no operations".to_string()));
    }

    let mut ops = Vec::new();
    let mut len: Option<usize> = None;

    for ch in cigar.chars() {
        if let Some(digit) = ch.to_digit(10) {
            let current = len.unwrap_or(0);
            len = Some(
                current
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(digit as usize))
                    .ok_or_else(|| invalid("operation length overflows".to_string()))?,
            );
            continue;
        }

        let kind = match ch {
            'M' => Kind::Match,
            'I' => Kind::Insertion,
            'D' => Kind::Deletion,
            'N' => Kind::Skip,
            'S' => Kind::SoftClip,
            'H' => Kind::HardClip,
            'P' => Kind::Pad,
            '=' => Kind::SequenceMatch,
            'X' => Kind::SequenceMismatch,
            _ => return Err(invalid(format!("unknown operation '{ch}'"))),
        };

        match len.take() {
            None => return Err(invalid(format!("operation '{ch}' has no length"))),
            Some(0) => return Err(invalid(format!("operation '{ch}' has zero length"))),
            Some(n) if n > MAX_CIGAR_OP_LENGTH => {
                return Err(invalid(format!(
                    "operation '{ch}' length {n} exceeds {MAX_CIGAR_OP_LENGTH}"
                )));
            }
            Some(n) => ops.push(Op::new(kind, n)),
        }
    }

    if len.is_some() {
        return Err(invalid("trailing length without an operation".to_string()));
    }

    Ok(ops)
}

/// Number of reference bases spanned by the CIGAR (M, D, N, =, X).
#[must_use]
pub fn reference_length(ops: &[Op]) -> usize {
    ops.iter()
        .filter(|op| {
            matches!(
                op.kind(),
                Kind::Match
                    | Kind::Deletion
                    | Kind::Skip
                    | Kind::SequenceMatch
                    | Kind::SequenceMismatch
            )
        })
        .map(|op| op.len())
        .sum()
}

/// Number of read bases described by the CIGAR (M, I, S, =, X).
#[must_use]
pub fn query_length(ops: &[Op]) -> usize {
    ops.iter()
        .filter(|op| {
            matches!(
                op.kind(),
                Kind::Match
                    | Kind::Insertion
                    | Kind::SoftClip
                    | Kind::SequenceMatch
                    | Kind::SequenceMismatch
            )
        })
        .map(|op| op.len())
        .sum()
}

/// 1-based inclusive alignment end, or `None` when the CIGAR spans no reference bases.
#[must_use]
pub fn alignment_end(alignment_start: usize, ops: &[Op]) -> Option<usize> {
    match reference_length(ops) {
        0 => None,
        len => Some(alignment_start + len - 1),
    }
}
