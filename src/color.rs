//! Derivation of sixel colors from wide-range RGBA pixels.
//!
//! Sixel color registers are specified in percent (0-100) per channel. Source
//! pixels carry 16-bit channels with straight alpha; they are premultiplied
//! against a black background and rescaled once, at decode time.

/// One RGBA pixel with 16-bit channels in host order.
pub type Rgba16 = [u16; 4];

/// A color in the sixel RGB percentage space. Each channel is in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Premultiplies `pixel` by its alpha and rescales to percent.
    ///
    /// Returns `None` for fully transparent pixels, which are never drawn.
    pub fn from_rgba16([r, g, b, alpha]: Rgba16) -> Option<Self> {
        if alpha == 0 {
            return None;
        }

        Some(Self {
            red: percent(premultiply(r, alpha)),
            green: percent(premultiply(g, alpha)),
            blue: percent(premultiply(b, alpha)),
        })
    }
}

const fn premultiply(channel: u16, alpha: u16) -> u16 {
    ((channel as u32 * alpha as u32) >> 16) as u16
}

const fn percent(channel: u16) -> u8 {
    (channel as u32 * 100 / 65536) as u8
}
