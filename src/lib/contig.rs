//! Assembled-contig evidence carried on realigned reads.
//!
//! A read realigned through a locally assembled contig carries a string tag (`YA` by
//! default) of the form `<contig id>:<contig start>:<contig CIGAR>`, e.g.
//! `chr1_100_200_0:91:10M2I20M`. The first field is not used.

use bstr::ByteSlice;
use noodles::sam::alignment::record::cigar::Op;

use crate::errors::{CadabraError, Result};
use crate::sam::record_utils::parse_cigar_text;

/// Largest 1-based position a BAM record can hold.
const MAX_CONTIG_START: usize = i32::MAX as usize;

/// Alignment of the assembled contig a read was realigned through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContigEvidence {
    /// 1-based reference start of the contig alignment
    pub start: usize,
    /// CIGAR of the contig against the reference
    pub cigar: Vec<Op>,
}

impl ContigEvidence {
    /// Parses the raw tag text.
    ///
    /// # Errors
    /// Returns [`CadabraError::MalformedContigTag`] if the text is not UTF-8, does not have
    /// exactly three colon-separated fields, or its start or CIGAR field does not parse.
    ///
    /// # Example
    /// ```
    /// use cadabra_lib::contig::ContigEvidence;
    ///
    /// let contig = ContigEvidence::parse(b"ctg1:91:10M2I20M").unwrap();
    /// assert_eq!(contig.start, 91);
    /// assert_eq!(contig.cigar.len(), 3);
    /// ```
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let malformed = |reason: String| CadabraError::MalformedContigTag {
            value: raw.to_str_lossy().into_owned(),
            reason,
        };

        let text = raw.to_str().map_err(|_| malformed("not valid UTF-8".to_string()))?;
        let fields: Vec<&str> = text.split(':').collect();
        let [_, start, cigar] = fields.as_slice() else {
            return Err(malformed(format!(
                "expected 3 colon-separated fields, found {}",
                fields.len()
            )));
        };

        let start = match start.parse::<usize>() {
            Ok(n) if (1..=MAX_CONTIG_START).contains(&n) => n,
            _ => return Err(malformed(format!("invalid contig start '{start}'"))),
        };
        let cigar = parse_cigar_text(cigar).map_err(|e| malformed(e.to_string()))?;

        Ok(Self { start, cigar })
    }
}
