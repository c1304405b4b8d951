//! Sprite decoder.
//!
//! Turns one [`RawRecord`] into a [`Sprite`]: resolves the mode word,
//! checks the record is long enough for its declared geometry, looks up
//! or unpacks colours, then applies the mask plane to the alpha channel.
//!
//! Decoding is a pure function of the record bytes, so records can be
//! decoded in any order or in parallel.

mod pixels;

use log::trace;

use crate::archive::{RawRecord, RECORD_HEADER_LEN};
use crate::error::DecodeError;
use crate::types::{
    expand_channel, Colour, DefaultPalette, MaskFormat, Palette, PixelMode, Sprite, SpriteFormat,
    PALETTE_ENTRY_LEN,
};

use pixels::PlaneLayout;

/// Decoder configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpriteDecoder {
    default_palette: DefaultPalette,
}

impl SpriteDecoder {
    pub fn new(default_palette: DefaultPalette) -> Self {
        Self { default_palette }
    }

    /// Decode one record into an RGBA sprite.
    pub fn decode(&self, record: &RawRecord<'_>) -> Result<Sprite, DecodeError> {
        let format = SpriteFormat::from_mode_word(record.mode)?;
        let mode = format.pixel_mode;

        let layout = PlaneLayout::image(record, mode.bits_per_pixel() as u32)?;
        let image = plane(record, record.image_offset, &layout, |expected, actual| {
            DecodeError::TruncatedPixelData { expected, actual }
        })?;

        let source = match mode {
            PixelMode::Direct15 => ColourSource::Direct(rgb555),
            PixelMode::Direct16 => ColourSource::Direct(rgb565),
            PixelMode::Direct32 => ColourSource::Direct(rgb888),
            PixelMode::Indexed1 | PixelMode::Indexed2 | PixelMode::Indexed4 | PixelMode::Indexed8 => {
                ColourSource::Palette(self.palette_for(record, mode)?)
            }
        };

        trace!(
            "decoding {:?}: {}x{} {} mask={}",
            record.name,
            layout.width,
            layout.height,
            mode,
            record.has_mask()
        );

        let mut pixels = Vec::with_capacity(layout.width as usize * layout.height as usize * 4);
        for y in 0..layout.height {
            for x in 0..layout.width {
                let value = layout.sample(image, x, y);
                let colour = match &source {
                    ColourSource::Palette(palette) => palette.get(value).ok_or_else(|| {
                        DecodeError::PaletteIndexOutOfRange {
                            x,
                            y,
                            value,
                            palette_len: palette.len(),
                        }
                    })?,
                    ColourSource::Direct(convert) => convert(value),
                };
                pixels.extend_from_slice(&colour.to_rgba());
            }
        }

        if record.has_mask() {
            let mask_layout = layout.mask(format.mask);
            let mask = plane(record, record.mask_offset, &mask_layout, |expected, actual| {
                DecodeError::TruncatedMaskData { expected, actual }
            })?;
            apply_mask(&mut pixels, &mask_layout, mask, format.mask);
        }

        Sprite::from_rgba(
            record.name.clone(),
            layout.width,
            layout.height,
            pixels,
            mode,
            record.has_mask(),
        )
        .ok_or_else(|| DecodeError::layout("decoded buffer does not match dimensions"))
    }

    /// Resolve the palette for an indexed record.
    ///
    /// An embedded palette sits between the header and the first of the
    /// image and mask; without one, the default policy applies.
    pub fn palette_for(
        &self,
        record: &RawRecord<'_>,
        mode: PixelMode,
    ) -> Result<Palette, DecodeError> {
        let mut end = record.image_offset;
        if record.has_mask() {
            end = end.min(record.mask_offset);
        }

        let embedded = record
            .data
            .get(RECORD_HEADER_LEN..end as usize)
            .filter(|bytes| bytes.len() >= PALETTE_ENTRY_LEN);
        if let Some(bytes) = embedded {
            return Ok(Palette::from_embedded(bytes));
        }

        let bits_per_pixel = mode.bits_per_pixel();
        match self.default_palette {
            DefaultPalette::Desktop => Palette::desktop(bits_per_pixel)
                .ok_or(DecodeError::MissingPalette { bits_per_pixel }),
            DefaultPalette::Strict => Err(DecodeError::MissingPalette { bits_per_pixel }),
        }
    }
}

/// Slice a plane out of the record, checking it fits.
fn plane<'a>(
    record: &RawRecord<'a>,
    offset: u32,
    layout: &PlaneLayout,
    truncated: impl Fn(usize, usize) -> DecodeError,
) -> Result<&'a [u8], DecodeError> {
    if (offset as usize) < RECORD_HEADER_LEN {
        return Err(DecodeError::layout(format!(
            "plane offset {} overlaps the {}-byte record header",
            offset, RECORD_HEADER_LEN
        )));
    }

    let expected = layout
        .byte_len()
        .and_then(|len| len.checked_add(offset as usize))
        .ok_or_else(|| DecodeError::layout("plane size overflows"))?;

    record
        .data
        .get(offset as usize..expected)
        .ok_or_else(|| truncated(expected, record.data.len()))
}

/// Where pixel colours come from.
enum ColourSource {
    Palette(Palette),
    Direct(fn(u32) -> Colour),
}

/// 1:5:5:5 TBGR, top bit ignored.
fn rgb555(value: u32) -> Colour {
    Colour::rgb(
        expand_channel(value, 5),
        expand_channel(value >> 5, 5),
        expand_channel(value >> 10, 5),
    )
}

/// 5:6:5 BGR.
fn rgb565(value: u32) -> Colour {
    Colour::rgb(
        expand_channel(value, 5),
        expand_channel(value >> 5, 6),
        expand_channel(value >> 11, 5),
    )
}

/// 8:8:8 TBGR, top byte ignored.
fn rgb888(value: u32) -> Colour {
    Colour::rgb(value as u8, (value >> 8) as u8, (value >> 16) as u8)
}

/// Overwrite the alpha channel from the mask plane.
fn apply_mask(pixels: &mut [u8], layout: &PlaneLayout, mask: &[u8], format: MaskFormat) {
    for y in 0..layout.height {
        for x in 0..layout.width {
            let sample = layout.sample(mask, x, y);
            let alpha = match format {
                MaskFormat::Alpha8 => sample as u8,
                MaskFormat::Matching | MaskFormat::Bit => {
                    if sample != 0 {
                        255
                    } else {
                        0
                    }
                }
            };
            let at = (y as usize * layout.width as usize + x as usize) * 4 + 3;
            pixels[at] = alpha;
        }
    }
}
