//! Streaming reader for farbfeld images.
//!
//! A farbfeld file is the magic `farbfeld`, a big-endian `u32` width and
//! height, then `width * height` pixels of four big-endian `u16` channels
//! (RGBA, straight alpha), row-major from the top left.

use std::io::Read;

use crate::{
    color::Rgba16,
    error::{
        HeaderFault,
        Result,
        SixelError,
    },
    PixelSource,
};

pub const MAGIC: &[u8; 8] = b"farbfeld";

const HEADER_LEN: usize = 16;
const PIXEL_LEN: usize = 8;

pub struct FarbfeldReader<R> {
    reader: R,
    width: u32,
    height: u32,
    buf: Vec<u8>,
}

impl<R: Read> FarbfeldReader<R> {
    /// Reads and validates the header. Pixel data is read row by row later.
    pub fn new(mut reader: R) -> Result<Self> {
        let mut header = [0; HEADER_LEN];
        reader
            .read_exact(&mut header)
            .map_err(SixelError::from_read)?;

        let (magic, geometry) = header.split_at(MAGIC.len());
        if magic != MAGIC {
            return Err(HeaderFault::BadMagic.into());
        }

        let width = u32::from_be_bytes([geometry[0], geometry[1], geometry[2], geometry[3]]);
        let height = u32::from_be_bytes([geometry[4], geometry[5], geometry[6], geometry[7]]);

        Ok(Self {
            reader,
            width,
            height,
            buf: Vec::new(),
        })
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> PixelSource for FarbfeldReader<R> {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn read_row(&mut self, row: &mut [Rgba16]) -> Result<()> {
        self.buf.resize(row.len() * PIXEL_LEN, 0);
        self.reader
            .read_exact(&mut self.buf)
            .map_err(SixelError::from_read)?;

        for (pixel, bytes) in row.iter_mut().zip(self.buf.chunks_exact(PIXEL_LEN)) {
            *pixel = [
                u16::from_be_bytes([bytes[0], bytes[1]]),
                u16::from_be_bytes([bytes[2], bytes[3]]),
                u16::from_be_bytes([bytes[4], bytes[5]]),
                u16::from_be_bytes([bytes[6], bytes[7]]),
            ];
        }

        Ok(())
    }
}

/// Serializes a farbfeld image. Used to build inputs in tests and tools.
pub fn write_farbfeld(width: u32, height: u32, pixels: &[Rgba16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + pixels.len() * PIXEL_LEN);
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    for channel in pixels.iter().flatten() {
        bytes.extend_from_slice(&channel.to_be_bytes());
    }
    bytes
}
