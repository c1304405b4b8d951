//! PNG output for decoded sprites.
//!
//! Writes the RGBA buffer as-is, with optional integer upscaling.

use std::path::Path;

use image::{imageops, imageops::FilterType, RgbaImage};

use crate::error::{Result, SpriteError};
use crate::types::Sprite;

/// Write a sprite to a PNG file.
///
/// # Arguments
///
/// * `sprite` - The sprite to write
/// * `path` - Output file path
/// * `scale` - Integer scale factor (1 = no scaling)
pub fn write_png(sprite: &Sprite, path: &Path, scale: u32) -> Result<()> {
    let img = to_image(sprite, scale)?;

    img.save(path).map_err(|e| SpriteError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write PNG: {}", e),
    })?;

    Ok(())
}

/// Convert a sprite to an `image` buffer, scaled by an integer factor.
///
/// Uses nearest-neighbour scaling so pixel edges stay crisp.
pub fn to_image(sprite: &Sprite, scale: u32) -> Result<RgbaImage> {
    let scale = scale.max(1);

    let img = RgbaImage::from_raw(sprite.width(), sprite.height(), sprite.pixel_bytes().to_vec())
        .ok_or_else(|| SpriteError::Output {
            message: format!("Sprite '{}' has an inconsistent pixel buffer", sprite.name()),
            help: None,
        })?;

    if scale == 1 {
        return Ok(img);
    }

    let (width, height) = scaled_size(sprite, scale)?;
    Ok(imageops::resize(&img, width, height, FilterType::Nearest))
}

/// Scale a sprite by an integer factor.
pub fn scale_sprite(sprite: &Sprite, scale: u32) -> Result<Sprite> {
    if scale <= 1 {
        return Ok(sprite.clone());
    }

    let (width, height) = scaled_size(sprite, scale)?;
    let mut scaled = Sprite::blank(sprite.name(), width, height);
    for y in 0..height {
        for x in 0..width {
            if let Some(c) = sprite.pixel(x / scale, y / scale) {
                scaled.set_pixel(x, y, c);
            }
        }
    }
    Ok(scaled)
}

fn scaled_size(sprite: &Sprite, scale: u32) -> Result<(u32, u32)> {
    let too_large = || SpriteError::Output {
        message: format!("Sprite '{}' is too large to scale by {}", sprite.name(), scale),
        help: Some("Use a smaller --scale".to_string()),
    };
    let width = sprite.width().checked_mul(scale).ok_or_else(too_large)?;
    let height = sprite.height().checked_mul(scale).ok_or_else(too_large)?;
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Colour, PixelMode};
    use tempfile::tempdir;

    fn checker() -> Sprite {
        let pixels = vec![
            0, 0, 0, 255, 255, 255, 255, 255, //
            255, 255, 255, 255, 0, 0, 0, 255,
        ];
        Sprite::from_rgba("test", 2, 2, pixels, PixelMode::Indexed1, false).unwrap()
    }

    #[test]
    fn test_write_png_simple() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.png");

        write_png(&checker(), &path, 1).unwrap();

        assert!(path.exists());

        // Read back and verify
        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 2);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]); // Black
        assert_eq!(img.get_pixel(1, 0).0, [255, 255, 255, 255]); // White
    }

    #[test]
    fn test_write_png_scaled() {
        let pixels = vec![255, 0, 0, 255, 0, 255, 0, 255];
        let sprite = Sprite::from_rgba("rg", 2, 1, pixels, PixelMode::Direct32, false).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("scaled.png");

        write_png(&sprite, &path, 2).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 2);

        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(2, 0).0, [0, 255, 0, 255]);
        assert_eq!(img.get_pixel(3, 1).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_write_png_keeps_alpha() {
        let pixels = vec![0, 0, 0, 0, 255, 0, 0, 128];
        let sprite = Sprite::from_rgba("a", 2, 1, pixels, PixelMode::Direct32, true).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("alpha.png");

        write_png(&sprite, &path, 1).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(img.get_pixel(1, 0).0, [255, 0, 0, 128]);
    }

    #[test]
    fn test_write_png_bad_directory() {
        let err = write_png(&checker(), Path::new("/nonexistent/dir/x.png"), 1).unwrap_err();
        assert!(matches!(err, SpriteError::Io { .. }));
    }

    #[test]
    fn test_scale_sprite() {
        let scaled = scale_sprite(&checker(), 2).unwrap();

        assert_eq!((scaled.width(), scaled.height()), (4, 4));
        assert_eq!(scaled.pixel(1, 1), Some(Colour::BLACK));
        assert_eq!(scaled.pixel(2, 0), Some(Colour::WHITE));
        assert_eq!(scaled.pixel(3, 3), Some(Colour::BLACK));
    }

    #[test]
    fn test_scale_zero_treated_as_one() {
        let sprite = checker();
        assert_eq!(scale_sprite(&sprite, 0).unwrap(), sprite);
        assert_eq!(to_image(&sprite, 0).unwrap().width(), 2);
    }
}
