//! Coalescing occupancy into horizontal runs of one color.

use std::{
    cmp::Reverse,
    ops::Range,
};

use crate::{
    bitplane::OccupancyGrid,
    palette::SlotIndex,
};

/// Columns `lo..hi` of the band where `slot` has pending bits in every column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub slot: SlotIndex,
    pub lo: usize,
    pub hi: usize,
}

impl Span {
    pub fn columns(&self) -> Range<usize> {
        self.lo..self.hi
    }
}

/// Collects the maximal runs of nonzero occupancy for the first `slots` slots.
///
/// Spans are ordered by `lo` ascending, then by `hi` descending so that of the
/// runs starting at one column the widest is drawn first. Equal runs keep slot
/// order.
pub fn build_spans(grid: &OccupancyGrid, slots: usize) -> Vec<Span> {
    let mut spans = Vec::new();

    for slot in 0..slots {
        let slot = slot as SlotIndex;
        let row = grid.row(slot);

        let mut lo = 0;
        while lo < row.len() {
            if row[lo] == 0 {
                lo += 1;
                continue;
            }

            let hi = row[lo..]
                .iter()
                .position(|&bits| bits == 0)
                .map_or(row.len(), |len| lo + len);

            spans.push(Span { slot, lo, hi });
            lo = hi;
        }
    }

    spans.sort_by_key(|span| (span.lo, Reverse(span.hi)));
    spans
}
