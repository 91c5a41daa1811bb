//! Encoding from images decoded by the `image` crate.

use image::{
    DynamicImage,
    ImageBuffer,
    Rgba,
};

use crate::{
    color::Rgba16,
    error::{
        Result,
        SixelError,
    },
    PixelSource,
};

pub type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// Decodes any container format the `image` crate recognizes.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Yields the rows of an in-memory 16-bit RGBA image, top to bottom.
pub struct ImageRows<'i> {
    image: &'i Rgba16Image,
    next_row: u32,
}

impl<'i> ImageRows<'i> {
    pub fn new(image: &'i Rgba16Image) -> Self {
        Self { image, next_row: 0 }
    }
}

impl PixelSource for ImageRows<'_> {
    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn read_row(&mut self, row: &mut [Rgba16]) -> Result<()> {
        if self.next_row >= self.image.height() {
            return Err(SixelError::TruncatedInput);
        }

        let stride = self.image.width() as usize * 4;
        let start = self.next_row as usize * stride;
        let raw = &self.image.as_raw()[start..start + stride];
        for (pixel, channels) in row.iter_mut().zip(raw.chunks_exact(4)) {
            *pixel = [channels[0], channels[1], channels[2], channels[3]];
        }

        self.next_row += 1;
        Ok(())
    }
}
