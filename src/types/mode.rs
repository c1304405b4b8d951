//! Pixel modes and mode word resolution.
//!
//! A sprite's mode word is either an old screen mode number (below 256) or
//! a new-format word: bit 0 set, horizontal dpi in bits 1-13, vertical dpi
//! in bits 14-26, sprite type in bits 27-30 and an alpha-mask flag in bit 31.

use std::fmt;

use serde::Serialize;

use crate::error::DecodeError;

/// Encoding of the colour data in a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PixelMode {
    Indexed1,
    Indexed2,
    Indexed4,
    Indexed8,
    /// 1:5:5:5 TBGR, red in the low bits.
    Direct15,
    /// 5:6:5 BGR, red in the low bits.
    Direct16,
    /// 8:8:8 TBGR, one byte per channel with the top byte unused.
    Direct32,
}

impl PixelMode {
    /// Bits used by one pixel in the image data.
    pub const fn bits_per_pixel(self) -> u8 {
        match self {
            PixelMode::Indexed1 => 1,
            PixelMode::Indexed2 => 2,
            PixelMode::Indexed4 => 4,
            PixelMode::Indexed8 => 8,
            PixelMode::Direct15 | PixelMode::Direct16 => 16,
            PixelMode::Direct32 => 32,
        }
    }

    /// Whether pixel values are palette indices.
    pub const fn is_indexed(self) -> bool {
        matches!(
            self,
            PixelMode::Indexed1 | PixelMode::Indexed2 | PixelMode::Indexed4 | PixelMode::Indexed8
        )
    }

    fn from_depth(bits: u8) -> Option<Self> {
        match bits {
            1 => Some(PixelMode::Indexed1),
            2 => Some(PixelMode::Indexed2),
            4 => Some(PixelMode::Indexed4),
            8 => Some(PixelMode::Indexed8),
            _ => None,
        }
    }
}

impl fmt::Display for PixelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelMode::Indexed1 => write!(f, "1bpp indexed"),
            PixelMode::Indexed2 => write!(f, "2bpp indexed"),
            PixelMode::Indexed4 => write!(f, "4bpp indexed"),
            PixelMode::Indexed8 => write!(f, "8bpp indexed"),
            PixelMode::Direct15 => write!(f, "16bpp 1:5:5:5"),
            PixelMode::Direct16 => write!(f, "16bpp 5:6:5"),
            PixelMode::Direct32 => write!(f, "32bpp 8:8:8"),
        }
    }
}

/// Layout of the transparency mask that may follow the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaskFormat {
    /// Same depth and row layout as the image; nonzero means opaque.
    Matching,
    /// One bit per pixel, rows padded to a word.
    Bit,
    /// One alpha byte per pixel, rows padded to a word.
    Alpha8,
}

/// Everything the mode word says about how a record is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteFormat {
    pub pixel_mode: PixelMode,
    pub mask: MaskFormat,
}

const TYPE_SHIFT: u32 = 27;
const TYPE_MASK: u32 = 0xF;
const ALPHA_MASK_FLAG: u32 = 1 << 31;

/// Colour depth of the standard screen modes, indexed by mode number.
/// Zero marks the text-only modes.
const SCREEN_MODE_DEPTHS: [u8; 50] = [
    1, 2, 4, 0, 1, 2, 0, 0, 2, 4, // 0-9
    8, 2, 4, 8, 4, 8, 4, 4, 1, 2, // 10-19
    4, 8, 4, 1, 8, 1, 2, 4, 8, 1, // 20-29
    2, 4, 8, 1, 2, 4, 8, 1, 2, 4, // 30-39
    8, 1, 2, 4, 1, 2, 4, 8, 4, 8, // 40-49
];

impl SpriteFormat {
    /// Resolve a mode word.
    ///
    /// Unknown or unsupported words are an error, never a guess.
    pub fn from_mode_word(mode: u32) -> Result<Self, DecodeError> {
        let unsupported = DecodeError::UnsupportedPixelMode { mode };

        if mode < 256 {
            let depth = SCREEN_MODE_DEPTHS
                .get(mode as usize)
                .copied()
                .ok_or(unsupported.clone())?;
            let pixel_mode = PixelMode::from_depth(depth).ok_or(unsupported)?;
            return Ok(Self {
                pixel_mode,
                mask: MaskFormat::Matching,
            });
        }

        if mode & 1 == 0 {
            // A mode selector pointer; meaningless outside the machine that wrote it
            return Err(unsupported);
        }

        let pixel_mode = match (mode >> TYPE_SHIFT) & TYPE_MASK {
            1 => PixelMode::Indexed1,
            2 => PixelMode::Indexed2,
            3 => PixelMode::Indexed4,
            4 => PixelMode::Indexed8,
            5 => PixelMode::Direct15,
            6 => PixelMode::Direct32,
            10 => PixelMode::Direct16,
            _ => return Err(unsupported),
        };
        let mask = if mode & ALPHA_MASK_FLAG != 0 {
            MaskFormat::Alpha8
        } else {
            MaskFormat::Bit
        };

        Ok(Self { pixel_mode, mask })
    }
}

/// Build a new-format mode word from a sprite type and resolution.
pub const fn new_mode_word(sprite_type: u32, xdpi: u32, ydpi: u32) -> u32 {
    (sprite_type & TYPE_MASK) << TYPE_SHIFT | (ydpi & 0x1FFF) << 14 | (xdpi & 0x1FFF) << 1 | 1
}

/// New-format sprite types.
pub mod sprite_type {
    pub const BPP1: u32 = 1;
    pub const BPP2: u32 = 2;
    pub const BPP4: u32 = 3;
    pub const BPP8: u32 = 4;
    pub const BPP16_1555: u32 = 5;
    pub const BPP32: u32 = 6;
    pub const CMYK: u32 = 7;
    pub const BPP16_565: u32 = 10;
}
