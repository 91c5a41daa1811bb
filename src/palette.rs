//! The bounded table of sixel color registers.
//!
//! Each distinct [`Color`] seen in the current palette generation is bound to
//! one slot. Slots are claimed lowest index first. When every slot is bound the
//! allocator reports [`Allocation::Exhausted`]; the caller drains all pending
//! output with [`flush_spans`](crate::emit::flush_spans) and calls
//! [`Palette::reset_used`] before retrying.

use crate::color::Color;

/// Index of a color register. Palettes never exceed 256 entries.
pub type SlotIndex = u8;

/// One color register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paint {
    pub color: Color,
    /// The register's value has been sent and can be selected by index alone.
    pub introduced: bool,
    /// The register is bound to a color in the current generation.
    pub used: bool,
}

/// Outcome of [`Palette::allocate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    Slot(SlotIndex),
    /// Every slot is bound to some other color. Nothing was modified.
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct Palette<const PALETTE_SIZE: usize> {
    paints: [Paint; PALETTE_SIZE],
    /// The register currently selected in the output stream.
    selected: Option<SlotIndex>,
}

impl<const PALETTE_SIZE: usize> Default for Palette<PALETTE_SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const PALETTE_SIZE: usize> Palette<PALETTE_SIZE> {
    const VALID_SIZE: () = assert!(
        PALETTE_SIZE >= 1 && PALETTE_SIZE <= 256,
        "sixel palettes hold between 1 and 256 colors"
    );

    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_SIZE;

        Self {
            paints: [Paint::default(); PALETTE_SIZE],
            selected: None,
        }
    }

    /// Binds `color` to a slot.
    ///
    /// Slots are scanned in index order up to the first unbound one. A slot
    /// already holding `color` is reused, even when it was only left over from
    /// an earlier generation, so its register need not be sent again. Otherwise
    /// the first unbound slot is claimed and must be re-introduced before use.
    pub fn allocate(&mut self, color: Color) -> Allocation {
        for (index, paint) in self.paints.iter_mut().enumerate() {
            let slot = index as SlotIndex;

            if paint.color == color {
                paint.used = true;
                return Allocation::Slot(slot);
            }

            if !paint.used {
                if self.selected == Some(slot) {
                    self.selected = None;
                }

                *paint = Paint {
                    color,
                    introduced: false,
                    used: true,
                };
                return Allocation::Slot(slot);
            }
        }

        Allocation::Exhausted
    }

    /// Unbinds every slot. Only valid once no pending span refers to a slot.
    pub fn reset_used(&mut self) {
        for paint in &mut self.paints {
            paint.used = false;
        }
    }

    pub fn paint(&self, slot: SlotIndex) -> &Paint {
        &self.paints[slot as usize]
    }

    pub(crate) fn paint_mut(&mut self, slot: SlotIndex) -> &mut Paint {
        &mut self.paints[slot as usize]
    }

    pub fn selected(&self) -> Option<SlotIndex> {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, slot: SlotIndex) {
        self.selected = Some(slot);
    }

    /// Number of slots bound in the current generation.
    pub fn used_count(&self) -> usize {
        self.paints.iter().filter(|paint| paint.used).count()
    }

    pub const fn capacity(&self) -> usize {
        PALETTE_SIZE
    }
}
