//! Indexed colour palettes: embedded tables and the desktop defaults.

use serde::{Deserialize, Serialize};

use super::Colour;

/// Size in bytes of one embedded palette entry (two flash colour words).
pub const PALETTE_ENTRY_LEN: usize = 8;

/// The 16-colour desktop palette.
const DESKTOP_16: [u32; 16] = [
    0xFFFFFF00, 0xDDDDDD00, 0xBBBBBB00, 0x99999900, 0x77777700, 0x55555500, 0x33333300,
    0x00000000, 0x99440000, 0x00EEEE00, 0x00CC0000, 0x0000DD00, 0xBBEEEE00, 0x00885500,
    0x00BBFF00, 0xFFBB0000,
];

/// The 4-colour desktop palette.
const DESKTOP_4: [u32; 4] = [0xFFFFFF00, 0xBBBBBB00, 0x55555500, 0x00000000];

/// The 2-colour desktop palette.
const DESKTOP_2: [u32; 2] = [0xFFFFFF00, 0x00000000];

/// What to do when an indexed sprite carries no palette of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DefaultPalette {
    /// Use the standard desktop palette for the sprite's depth.
    #[default]
    Desktop,
    /// Only embedded palettes; indexed sprites without one fail to decode.
    Strict,
}

/// An ordered colour lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colours: Vec<Colour>,
}

impl Palette {
    /// Create a palette from colours in index order.
    pub fn new(colours: Vec<Colour>) -> Self {
        Self { colours }
    }

    /// Parse an embedded palette block.
    ///
    /// Each entry is two words; only the first flash colour is kept.
    /// Trailing bytes that do not make up a whole entry are ignored.
    pub fn from_embedded(bytes: &[u8]) -> Self {
        let colours = bytes
            .chunks_exact(PALETTE_ENTRY_LEN)
            .map(|entry| {
                let word = u32::from_le_bytes([entry[0], entry[1], entry[2], entry[3]]);
                Colour::from_palette_word(word)
            })
            .collect();
        Self { colours }
    }

    /// The default palette for an indexed depth, if that depth is indexed.
    pub fn desktop(bits_per_pixel: u8) -> Option<Self> {
        let words: &[u32] = match bits_per_pixel {
            1 => &DESKTOP_2,
            2 => &DESKTOP_4,
            4 => &DESKTOP_16,
            8 => return Some(Self::standard_256()),
            _ => return None,
        };
        Some(Self::new(
            words.iter().map(|&w| Colour::from_palette_word(w)).collect(),
        ))
    }

    /// The standard 256-colour palette.
    ///
    /// Bits 0-1 of the index are a tint shared by all three channels, the
    /// remaining six bits supply the top two bits of each channel.
    pub fn standard_256() -> Self {
        let colours = (0u32..256)
            .map(|i| {
                let tint = i & 0b11;
                let channel = |lo: u32, hi: u32| {
                    let nibble = tint | ((i >> lo) & 1) << 2 | ((i >> hi) & 1) << 3;
                    (nibble * 0x11) as u8
                };
                Colour::rgb(channel(2, 4), channel(5, 6), channel(3, 7))
            })
            .collect();
        Self { colours }
    }

    /// Get a colour by index.
    pub fn get(&self, index: u32) -> Option<Colour> {
        self.colours.get(index as usize).copied()
    }

    /// Get the number of colours.
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Check if the palette is empty.
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    /// Colours in index order.
    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }
}
