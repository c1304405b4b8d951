//! Colour type, palette word decoding and channel expansion.

/// An RGBA colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent colour.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Decode a palette word laid out as `0xBBGGRR00`.
    ///
    /// The low byte holds supremacy/transfer bits and is ignored.
    pub const fn from_palette_word(word: u32) -> Self {
        Self::rgb((word >> 8) as u8, (word >> 16) as u8, (word >> 24) as u8)
    }

    /// Convert to RGBA tuple.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Widen an n-bit channel to 8 bits by replicating its high bits.
///
/// `expand_channel(0x1F, 5) == 0xFF`, `expand_channel(0, 5) == 0`.
pub const fn expand_channel(value: u32, bits: u32) -> u8 {
    let v = value & ((1 << bits) - 1);
    let mut out = v << (8 - bits);
    let mut filled = bits;
    while filled < 8 {
        out |= out >> filled;
        filled *= 2;
    }
    out as u8
}
