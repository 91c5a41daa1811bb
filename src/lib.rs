//! ff2sixel: streaming sixel encoding with exact colors.
//!
//! Pixels are never approximated: every distinct color (after premultiplying
//! against black and rescaling to the sixel percentage space) gets its own
//! color register. When an image has more colors than the terminal has
//! registers, the encoder draws what it has accumulated, frees the registers
//! and carries on, possibly several times within one six-row band.
//!
//! ### Basic Usage
//!
//! ```rust
//! use ff2sixel::{
//!     farbfeld::write_farbfeld,
//!     SixelEncoder,
//! };
//!
//! let red = [u16::MAX, 0, 0, u16::MAX];
//! let farbfeld = write_farbfeld(1, 1, &[red]);
//!
//! let sixel = <SixelEncoder>::encode_farbfeld(farbfeld.as_slice(), Vec::new())?;
//! assert_eq!(sixel, b"\x1bPq\"1;1;1;1#0;2;99;0;0@-\x1b\\");
//! # Ok::<(), ff2sixel::SixelError>(())
//! ```
//!
//! ## Choosing a Palette Size
//! Most terminals with sixel support allow 256 registers, which is the
//! default. Hardware such as the VT340 has 16; use [`SixelEncoder16`] there.
//! Fewer registers only means more frequent palette flushes and a somewhat
//! longer stream; the pixels drawn are the same.

pub mod bitplane;
pub mod color;
pub mod emit;
pub mod encoder;
pub mod error;
pub mod farbfeld;
#[cfg(feature = "image")]
pub mod image_source;
pub mod palette;
pub mod span;

use std::io::{
    Read,
    Write,
};

pub use crate::{
    color::{
        Color,
        Rgba16,
    },
    error::{
        HeaderFault,
        Result,
        SixelError,
    },
    farbfeld::FarbfeldReader,
};
#[cfg(feature = "image")]
pub use crate::image_source::{
    ImageRows,
    Rgba16Image,
};

/// A source of pixels with a declared geometry.
pub trait PixelSource {
    /// Declared `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Fills `row` (exactly `width` long) with the next row, top to bottom.
    ///
    /// A source that runs out before `height` rows must return
    /// [`SixelError::TruncatedInput`].
    fn read_row(&mut self, row: &mut [Rgba16]) -> Result<()>;
}

/// The main type for performing sixel encoding.
///
/// `PALETTE_SIZE` is the number of color registers the target terminal
/// provides, between 1 and 256.
pub struct SixelEncoder<const PALETTE_SIZE: usize = 256>;

pub type SixelEncoderMono = SixelEncoder<2>;
pub type SixelEncoder4 = SixelEncoder<4>;
pub type SixelEncoder8 = SixelEncoder<8>;
pub type SixelEncoder16 = SixelEncoder<16>;
pub type SixelEncoder32 = SixelEncoder<32>;
pub type SixelEncoder64 = SixelEncoder<64>;
pub type SixelEncoder128 = SixelEncoder<128>;
pub type SixelEncoder256 = SixelEncoder<256>;

impl<const PALETTE_SIZE: usize> SixelEncoder<PALETTE_SIZE> {
    /// Streams `source` into `out`, returning `out` once the image is
    /// complete.
    pub fn encode<S: PixelSource, W: Write>(source: &mut S, out: W) -> Result<W> {
        encoder::encode::<S, W, PALETTE_SIZE>(source, out)
    }

    /// Reads a farbfeld image from `input` and streams it into `out`.
    pub fn encode_farbfeld<R: Read, W: Write>(input: R, out: W) -> Result<W> {
        let mut reader = FarbfeldReader::new(input)?;
        Self::encode(&mut reader, out)
    }

    /// Encodes any image the `image` crate can represent.
    #[cfg(feature = "image")]
    pub fn encode_image(image: &image::DynamicImage) -> Result<String> {
        let image = image.to_rgba16();
        let sixel = Self::encode(&mut ImageRows::new(&image), Vec::new())?;
        Ok(String::from_utf8(sixel).expect("sixel output is ASCII"))
    }
}
