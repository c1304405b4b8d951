//! Decoded sprites.

use super::{Colour, PixelMode};

/// A decoded sprite: dimensions plus an owned RGBA buffer.
///
/// Pixels are stored row-major, top row first, four bytes per pixel in
/// R, G, B, A order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    name: String,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    mode: PixelMode,
    masked: bool,
}

impl Sprite {
    /// Create a sprite from a flat RGBA buffer.
    ///
    /// Returns `None` if the buffer length is not `width * height * 4`.
    pub fn from_rgba(
        name: impl Into<String>,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        mode: PixelMode,
        masked: bool,
    ) -> Option<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            name: name.into(),
            width,
            height,
            pixels,
            mode,
            masked,
        })
    }

    /// A fully transparent 32bpp canvas.
    pub fn blank(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
            mode: PixelMode::Direct32,
            masked: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The RGBA buffer, borrowed.
    pub fn pixel_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Encoding the sprite was decoded from.
    pub fn mode(&self) -> PixelMode {
        self.mode
    }

    /// Whether a mask plane set the alpha channel.
    pub fn has_mask(&self) -> bool {
        self.masked
    }

    /// Get a pixel at the given position.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Colour> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.pixels[at..at + 4];
        Some(Colour::new(p[0], p[1], p[2], p[3]))
    }

    /// Overwrite a pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, colour: Colour) {
        if x >= self.width || y >= self.height {
            return;
        }
        let at = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[at..at + 4].copy_from_slice(&colour.to_rgba());
    }
}
