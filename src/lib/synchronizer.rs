//! Lock-step merge of the normal and tumor locus streams.
//!
//! Both streams must be strictly increasing under the same [`ChromosomeOrder`]. The
//! synchronizer repeatedly compares the two current heads, advances whichever is behind,
//! and yields a [`MatchedLocus`] when both heads sit on the same locus. Loci present in
//! only one stream are consumed and dropped.

use std::cmp::Ordering;
use std::iter::Peekable;

use crate::errors::{CadabraError, Result};
use crate::locus::{ChromosomeOrder, Locus};

/// A locus present in both streams, with each side's payload.
#[derive(Debug)]
pub struct MatchedLocus<G> {
    /// The shared locus
    pub locus: Locus,
    /// Normal-sample payload
    pub normal: G,
    /// Tumor-sample payload
    pub tumor: G,
}

/// One side of the merge: a peekable stream plus its order check.
struct SampleCursor<I: Iterator> {
    label: &'static str,
    items: Peekable<I>,
    previous: Option<Locus>,
    consumed: u64,
}

impl<I, G> SampleCursor<I>
where
    I: Iterator<Item = Result<(Locus, G)>>,
{
    fn new(label: &'static str, items: I) -> Self {
        Self { label, items: items.peekable(), previous: None, consumed: 0 }
    }

    /// The head locus, validated against the previous one, or `None` at the end.
    fn head(&mut self, order: &ChromosomeOrder) -> Result<Option<Locus>> {
        let locus = match self.items.peek() {
            None => return Ok(None),
            Some(Ok((locus, _))) => locus.clone(),
            Some(Err(_)) => {
                return match self.items.next() {
                    Some(Err(e)) => Err(e),
                    _ => Ok(None),
                };
            }
        };

        order.rank(&locus.chromosome)?;
        if let Some(previous) = &self.previous {
            if order.compare(previous, &locus)? != Ordering::Less {
                return Err(CadabraError::OrderingViolation {
                    sample: self.label.to_string(),
                    previous: previous.to_string(),
                    current: locus.to_string(),
                });
            }
        }
        Ok(Some(locus))
    }

    /// Consumes the head, which [`head`](Self::head) must have returned.
    fn take(&mut self) -> Option<G> {
        match self.items.next() {
            Some(Ok((locus, group))) => {
                self.previous = Some(locus);
                self.consumed += 1;
                Some(group)
            }
            _ => None,
        }
    }
}

/// Merges two locus-sorted streams, yielding loci present in both.
pub struct LocusSynchronizer<N, T>
where
    N: Iterator,
    T: Iterator,
{
    order: ChromosomeOrder,
    normal: SampleCursor<N>,
    tumor: SampleCursor<T>,
    done: bool,
}

impl<N, T, G> LocusSynchronizer<N, T>
where
    N: Iterator<Item = Result<(Locus, G)>>,
    T: Iterator<Item = Result<(Locus, G)>>,
{
    /// Creates a synchronizer comparing loci with `order`.
    pub fn new(order: ChromosomeOrder, normal: N, tumor: T) -> Self {
        Self {
            order,
            normal: SampleCursor::new("normal", normal),
            tumor: SampleCursor::new("tumor", tumor),
            done: false,
        }
    }

    /// Loci consumed from the normal stream so far.
    pub fn normal_loci(&self) -> u64 {
        self.normal.consumed
    }

    /// Loci consumed from the tumor stream so far.
    pub fn tumor_loci(&self) -> u64 {
        self.tumor.consumed
    }

    fn advance(&mut self) -> Result<Option<MatchedLocus<G>>> {
        loop {
            let Some(normal_locus) = self.normal.head(&self.order)? else {
                return Ok(None);
            };
            let Some(tumor_locus) = self.tumor.head(&self.order)? else {
                return Ok(None);
            };

            match self.order.compare(&normal_locus, &tumor_locus)? {
                Ordering::Less => {
                    self.normal.take();
                }
                Ordering::Greater => {
                    self.tumor.take();
                }
                Ordering::Equal => {
                    let (Some(normal), Some(tumor)) = (self.normal.take(), self.tumor.take()) else {
                        return Ok(None);
                    };
                    return Ok(Some(MatchedLocus { locus: normal_locus, normal, tumor }));
                }
            }
        }
    }
}

impl<N, T, G> Iterator for LocusSynchronizer<N, T>
where
    N: Iterator<Item = Result<(Locus, G)>>,
    T: Iterator<Item = Result<(Locus, G)>>,
{
    type Item = Result<MatchedLocus<G>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(matched)) => Some(Ok(matched)),
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
