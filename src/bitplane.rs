//! Per-band occupancy of each palette slot.
//!
//! One byte per (slot, column). Bit `i` of a byte means pixel row `i` of the
//! current band at that column is drawn with the slot's color. Bytes are
//! zeroed as the emitter consumes them, so a column is never drawn twice even
//! when a band is flushed more than once.

use crate::{
    error::{
        HeaderFault,
        Result,
        SixelError,
    },
    palette::SlotIndex,
};

/// Rows per band; one sixel covers six vertical pixels.
pub const BAND_HEIGHT: usize = 6;

#[derive(Debug)]
pub struct OccupancyGrid {
    width: usize,
    cells: Vec<u8>,
}

impl OccupancyGrid {
    /// Sizes the grid for `slots` palette entries over `width` columns.
    ///
    /// The size is checked for overflow before anything is allocated, and an
    /// allocation failure is reported rather than aborting.
    pub fn try_new(width: usize, slots: usize) -> Result<Self> {
        let bytes = width
            .checked_mul(slots)
            .ok_or(HeaderFault::RowLengthOverflow { width, slots })?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(bytes)
            .map_err(|_| SixelError::Allocation { bytes })?;
        cells.resize(bytes, 0);

        Ok(Self { width, cells })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Records that `row_in_band` at `column` belongs to `slot`.
    pub fn mark(&mut self, slot: SlotIndex, row_in_band: usize, column: usize) {
        debug_assert!(row_in_band < BAND_HEIGHT);
        self.cells[slot as usize * self.width + column] |= 1 << row_in_band;
    }

    /// The occupancy bytes of `slot` across the band.
    pub fn row(&self, slot: SlotIndex) -> &[u8] {
        let start = slot as usize * self.width;
        &self.cells[start..start + self.width]
    }

    /// Returns the bits at (`slot`, `column`) and clears them.
    pub fn take(&mut self, slot: SlotIndex, column: usize) -> u8 {
        std::mem::take(&mut self.cells[slot as usize * self.width + column])
    }

    /// True when no slot has any pending bits.
    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(|&bits| bits == 0)
    }
}
