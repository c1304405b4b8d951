//! Sprite sheet packer.
//!
//! Packs the sprites of an archive into a single sheet using shelf packing.
//! Outputs a TexturePacker-compatible JSON Hash format for game engine interop.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, SpriteError};
use crate::types::Sprite;

/// A frame in the sprite sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Sprite sheet metadata.
#[derive(Debug, Clone)]
pub struct SheetMeta {
    pub frames: Vec<Frame>,
    pub image: String,
    pub size: (u32, u32),
    pub scale: u32,
}

/// Sprite sheet packer using shelf (row-based) packing.
#[derive(Debug, Clone, Copy)]
pub struct SheetPacker {
    pub padding: u32,
}

impl SheetPacker {
    pub fn new(padding: u32) -> Self {
        Self { padding }
    }

    /// Pack sprites into a sprite sheet.
    ///
    /// Returns the composited sheet and frame metadata. Frames keep the
    /// input order; sprites that share a name get a `#index` suffix so every
    /// frame key is unique.
    pub fn pack(&self, sprites: &[Sprite]) -> (Sprite, SheetMeta) {
        if sprites.is_empty() {
            let meta = SheetMeta {
                frames: vec![],
                image: "sheet.png".to_string(),
                size: (0, 0),
                scale: 1,
            };
            return (Sprite::blank("sheet", 0, 0), meta);
        }

        // Tallest first; ties keep file order
        let mut indices: Vec<usize> = (0..sprites.len()).collect();
        indices.sort_by(|&a, &b| {
            sprites[b]
                .height()
                .cmp(&sprites[a].height())
                .then_with(|| a.cmp(&b))
        });

        // Smallest power-of-two width that fits the widest sprite and the
        // square root of the total area
        let max_w = sprites.iter().map(Sprite::width).max().unwrap_or(1);
        let total_area: u64 = sprites
            .iter()
            .map(|s| (s.width() + self.padding) as u64 * (s.height() + self.padding) as u64)
            .sum();
        let sqrt_area = (total_area as f64).sqrt().ceil() as u32;
        let sheet_width = next_power_of_two(max_w.max(sqrt_area));

        let mut cursor_x: u32 = 0;
        let mut cursor_y: u32 = 0;
        let mut row_height: u32 = 0;
        let mut placements: Vec<(u32, u32)> = vec![(0, 0); sprites.len()];

        for &idx in &indices {
            let w = sprites[idx].width();
            let h = sprites[idx].height();

            if cursor_x + w > sheet_width && cursor_x > 0 {
                cursor_y += row_height + self.padding;
                cursor_x = 0;
                row_height = 0;
            }

            placements[idx] = (cursor_x, cursor_y);
            row_height = row_height.max(h);
            cursor_x += w + self.padding;
        }

        let sheet_height = cursor_y + row_height;
        let names = frame_names(sprites);

        let mut sheet = Sprite::blank("sheet", sheet_width, sheet_height);
        let mut frames = Vec::with_capacity(sprites.len());

        for ((sprite, &(ox, oy)), name) in sprites.iter().zip(&placements).zip(names) {
            for sy in 0..sprite.height() {
                for sx in 0..sprite.width() {
                    if let Some(c) = sprite.pixel(sx, sy) {
                        sheet.set_pixel(ox + sx, oy + sy, c);
                    }
                }
            }
            frames.push(Frame {
                name,
                x: ox,
                y: oy,
                w: sprite.width(),
                h: sprite.height(),
            });
        }

        let meta = SheetMeta {
            frames,
            image: "sheet.png".to_string(),
            size: (sheet_width, sheet_height),
            scale: 1,
        };

        (sheet, meta)
    }
}

/// Frame keys: the sprite name, or `name#index` when the name repeats.
fn frame_names(sprites: &[Sprite]) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for sprite in sprites {
        *counts.entry(sprite.name()).or_default() += 1;
    }

    sprites
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if counts[s.name()] > 1 {
                format!("{}#{}", s.name(), i)
            } else {
                s.name().to_string()
            }
        })
        .collect()
}

/// Write sheet metadata as TexturePacker-compatible JSON Hash format.
pub fn write_sheet_json(meta: &SheetMeta, path: &Path) -> Result<()> {
    let output = TexturePackerJson::from_meta(meta);
    let json = serde_json::to_string_pretty(&output).map_err(|e| SpriteError::Output {
        message: format!("Failed to serialize sheet metadata: {}", e),
        help: None,
    })?;
    fs::write(path, json).map_err(|e| SpriteError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write sheet metadata: {}", e),
    })?;
    Ok(())
}

fn next_power_of_two(n: u32) -> u32 {
    if n == 0 {
        return 1;
    }
    n.next_power_of_two()
}

// --- TexturePacker JSON serialization types ---

#[derive(Serialize)]
struct TexturePackerJson {
    frames: BTreeMap<String, TPFrame>,
    meta: TPMeta,
}

#[derive(Serialize)]
struct TPFrame {
    frame: TPRect,
    rotated: bool,
    trimmed: bool,
    #[serde(rename = "spriteSourceSize")]
    sprite_source_size: TPRect,
    #[serde(rename = "sourceSize")]
    source_size: TPSize,
}

#[derive(Serialize)]
struct TPRect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct TPSize {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct TPMeta {
    app: String,
    version: String,
    image: String,
    format: String,
    size: TPSize,
    scale: String,
}

impl TexturePackerJson {
    fn from_meta(meta: &SheetMeta) -> Self {
        let s = meta.scale;
        let frames = meta
            .frames
            .iter()
            .map(|f| {
                let (w, h) = (f.w * s, f.h * s);
                let frame = TPFrame {
                    frame: TPRect {
                        x: f.x * s,
                        y: f.y * s,
                        w,
                        h,
                    },
                    rotated: false,
                    trimmed: false,
                    sprite_source_size: TPRect { x: 0, y: 0, w, h },
                    source_size: TPSize { w, h },
                };
                (f.name.clone(), frame)
            })
            .collect();

        TexturePackerJson {
            frames,
            meta: TPMeta {
                app: "asprite".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                image: meta.image.clone(),
                format: "RGBA8888".to_string(),
                size: TPSize {
                    w: meta.size.0 * s,
                    h: meta.size.1 * s,
                },
                scale: meta.scale.to_string(),
            },
        }
    }
}
