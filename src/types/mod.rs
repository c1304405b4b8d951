//! Core domain types for asprite.
//!
//! This module contains the fundamental types used throughout the decoder:
//! - `Colour` - RGBA colour values
//! - `Palette` - Index to colour lookup tables
//! - `PixelMode` - The closed set of supported pixel encodings
//! - `Sprite` - A decoded RGBA sprite

mod colour;
mod mode;
mod palette;
mod sprite;

pub use colour::{expand_channel, Colour};
pub use mode::{new_mode_word, sprite_type, MaskFormat, PixelMode, SpriteFormat};
pub use palette::{DefaultPalette, Palette, PALETTE_ENTRY_LEN};
pub use sprite::Sprite;
