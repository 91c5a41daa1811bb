//! Writing the sixel stream.
//!
//! [`SixelWriter`] tracks the output cursor and buffers runs of identical
//! sixel characters so they can be written in their shortest form.
//! [`flush_spans`] drains all pending occupancy for the current palette
//! generation.

use std::io::{
    self,
    Write,
};

use log::trace;

use crate::{
    bitplane::OccupancyGrid,
    palette::{
        Palette,
        SlotIndex,
    },
    span::build_spans,
};

const fn num2six(num: u8) -> u8 {
    0x3f + num
}

/// Runs longer than this are written as `!<count><char>`.
const MAX_LITERAL_RUN: usize = 3;

pub struct SixelWriter<W: Write> {
    out: W,
    cursor_x: usize,
    pending: u8,
    count: usize,
}

impl<W: Write> SixelWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            cursor_x: 0,
            pending: num2six(0),
            count: 0,
        }
    }

    /// Column the next sixel lands in.
    pub fn cursor_x(&self) -> usize {
        self.cursor_x
    }

    /// Enters sixel mode and declares square pixels over `width` x `height`.
    pub fn prologue(&mut self, width: u32, height: u32) -> io::Result<()> {
        write!(self.out, "\x1bPq\"1;1;{width};{height}")
    }

    pub fn epilogue(&mut self) -> io::Result<()> {
        self.out.write_all(b"\x1b\\")
    }

    /// Makes `slot` the active color, sending its value if the terminal has
    /// not seen it yet.
    pub fn select<const PALETTE_SIZE: usize>(
        &mut self,
        palette: &mut Palette<PALETTE_SIZE>,
        slot: SlotIndex,
    ) -> io::Result<()> {
        if palette.selected() == Some(slot) {
            return Ok(());
        }

        write!(self.out, "#{slot}")?;
        let paint = palette.paint_mut(slot);
        if !paint.introduced {
            let color = paint.color;
            write!(
                self.out,
                ";2;{};{};{}",
                color.red, color.green, color.blue
            )?;
            paint.introduced = true;
        }

        palette.set_selected(slot);
        Ok(())
    }

    /// Buffers one sixel at the cursor and advances it.
    pub fn push(&mut self, bits: u8) -> io::Result<()> {
        let ch = num2six(bits);
        if ch != self.pending {
            self.commit()?;
            self.pending = ch;
        }
        self.count += 1;
        self.cursor_x += 1;
        Ok(())
    }

    /// Writes out the buffered run.
    pub fn commit(&mut self) -> io::Result<()> {
        if self.count > MAX_LITERAL_RUN {
            write!(self.out, "!{}{}", self.count, self.pending as char)?;
        } else {
            for _ in 0..self.count {
                self.out.write_all(&[self.pending])?;
            }
        }
        self.count = 0;
        Ok(())
    }

    /// Returns to the first column of the current band.
    pub fn carriage_return(&mut self) -> io::Result<()> {
        self.out.write_all(b"$")?;
        self.cursor_x = 0;
        Ok(())
    }

    /// Moves to the first column of the next band.
    pub fn band_separator(&mut self) -> io::Result<()> {
        self.out.write_all(b"-")?;
        self.cursor_x = 0;
        Ok(())
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Counts from one [`flush_spans`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub spans: usize,
    /// Carriage returns written to fit spans that started behind the cursor.
    pub carriage_returns: usize,
}

/// Draws every pending span, then unbinds the whole palette.
///
/// Spans are drawn strictly left to right. A span starting behind the cursor
/// waits for the next sub-line, which begins with a carriage return. No
/// carriage return follows the last sub-line; the cursor position carries over
/// to the next flush of the same band.
pub fn flush_spans<W: Write, const PALETTE_SIZE: usize>(
    writer: &mut SixelWriter<W>,
    palette: &mut Palette<PALETTE_SIZE>,
    grid: &mut OccupancyGrid,
) -> io::Result<FlushStats> {
    let mut spans = build_spans(grid, PALETTE_SIZE);
    let mut stats = FlushStats {
        spans: spans.len(),
        ..Default::default()
    };

    loop {
        let mut deferred = Vec::new();
        for span in spans {
            if span.lo < writer.cursor_x() {
                deferred.push(span);
                continue;
            }

            writer.select(palette, span.slot)?;
            while writer.cursor_x() < span.lo {
                writer.push(0)?;
            }
            for column in span.columns() {
                writer.push(grid.take(span.slot, column))?;
            }
            writer.commit()?;
        }

        spans = deferred;
        if spans.is_empty() {
            break;
        }
        writer.carriage_return()?;
        stats.carriage_returns += 1;
    }

    trace!(
        "flushed {} spans using {} carriage returns",
        stats.spans,
        stats.carriage_returns
    );

    palette.reset_used();
    Ok(stats)
}
