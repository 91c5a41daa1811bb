//! Band-by-band driver of the encoding pipeline.
//!
//! Each band of up to six rows is read pixel by pixel into the occupancy grid,
//! binding colors to palette slots as they appear. If the palette fills up
//! mid-band, everything accumulated so far is flushed and the palette is
//! unbound before the pixel is retried. At the end of the band the remainder
//! is flushed and a band separator written.

use std::io::Write;

use log::debug;

use crate::{
    bitplane::{
        OccupancyGrid,
        BAND_HEIGHT,
    },
    color::{
        Color,
        Rgba16,
    },
    emit::{
        flush_spans,
        SixelWriter,
    },
    error::{
        Result,
        SixelError,
    },
    palette::{
        Allocation,
        Palette,
        SlotIndex,
    },
    PixelSource,
};

/// All mutable encoder state, owned by [`encode`] for the whole run.
pub(crate) struct EncoderState<W: Write, const PALETTE_SIZE: usize> {
    palette: Palette<PALETTE_SIZE>,
    grid: OccupancyGrid,
    writer: SixelWriter<W>,
    palette_flushes: usize,
}

impl<W: Write, const PALETTE_SIZE: usize> EncoderState<W, PALETTE_SIZE> {
    fn new(width: usize, out: W) -> Result<Self> {
        Ok(Self {
            palette: Palette::new(),
            grid: OccupancyGrid::try_new(width, PALETTE_SIZE)?,
            writer: SixelWriter::new(out),
            palette_flushes: 0,
        })
    }

    /// Drains all pending occupancy and unbinds the palette.
    fn flush(&mut self) -> Result<()> {
        flush_spans(&mut self.writer, &mut self.palette, &mut self.grid)
            .map_err(SixelError::Output)?;
        Ok(())
    }

    /// Binds `color` to a slot, flushing the palette first if it is full.
    fn slot_for(&mut self, color: Color, band: u32, column: usize) -> Result<SlotIndex> {
        if let Allocation::Slot(slot) = self.palette.allocate(color) {
            return Ok(slot);
        }

        debug!("palette exhausted in band {band} at column {column}, flushing");
        self.palette_flushes += 1;
        self.flush()?;

        match self.palette.allocate(color) {
            Allocation::Slot(slot) => Ok(slot),
            Allocation::Exhausted => unreachable!("allocation failed on an unbound palette"),
        }
    }

    fn read_band<S: PixelSource>(
        &mut self,
        source: &mut S,
        row: &mut [Rgba16],
        band: u32,
        rows: usize,
    ) -> Result<()> {
        for row_in_band in 0..rows {
            source.read_row(row)?;

            for (column, &pixel) in row.iter().enumerate() {
                let Some(color) = Color::from_rgba16(pixel) else {
                    continue;
                };

                let slot = self.slot_for(color, band, column)?;
                self.grid.mark(slot, row_in_band, column);
            }
        }

        Ok(())
    }

    fn emit_band(&mut self) -> Result<()> {
        self.flush()?;
        self.writer.band_separator().map_err(SixelError::Output)
    }
}

/// Encodes every row of `source` into `out` as one sixel image.
///
/// Output is written as it is produced; on error, whatever was written stays
/// written.
pub fn encode<S: PixelSource, W: Write, const PALETTE_SIZE: usize>(
    source: &mut S,
    out: W,
) -> Result<W> {
    let (width, height) = source.dimensions();
    let columns = width as usize;
    debug!("encoding {width}x{height} image with {PALETTE_SIZE} color registers");

    let mut state = EncoderState::<W, PALETTE_SIZE>::new(columns, out)?;

    let mut row: Vec<Rgba16> = Vec::new();
    row.try_reserve_exact(columns)
        .map_err(|_| SixelError::Allocation {
            bytes: columns * std::mem::size_of::<Rgba16>(),
        })?;
    row.resize(columns, [0; 4]);

    state
        .writer
        .prologue(width, height)
        .map_err(SixelError::Output)?;

    let mut bands = 0;
    for band_top in (0..height).step_by(BAND_HEIGHT) {
        let rows = BAND_HEIGHT.min((height - band_top) as usize);
        state.read_band(source, &mut row, bands, rows)?;
        state.emit_band()?;
        bands += 1;
    }

    state.writer.epilogue().map_err(SixelError::Output)?;
    state.writer.get_mut().flush().map_err(SixelError::Output)?;
    debug!(
        "wrote {bands} bands with {} mid-band palette flushes",
        state.palette_flushes
    );

    Ok(state.writer.into_inner())
}
