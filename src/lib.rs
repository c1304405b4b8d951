//! asprite - RISC OS sprite file decoder
//!
//! Reads legacy sprite files (`,ff9`) into owned RGBA images. A file is
//! walked record by record, each record's pixel data is decoded against
//! its palette and mask, and the results are collected into an [`Archive`]
//! addressed by index.
//!
//! ```ignore
//! use asprite::Archive;
//!
//! let archive = Archive::open("!Sprites,ff9")?;
//! let sprite = archive.sprite(0)?;
//! assert_eq!(sprite.pixel_bytes().len(), (sprite.width() * sprite.height() * 4) as usize);
//! ```

pub mod archive;
pub mod cli;
pub mod decode;
pub mod discovery;
pub mod error;
pub mod output;
pub mod render;
pub mod types;
pub mod validation;

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
pub(crate) mod testing;

pub use archive::{
    Archive, BestEffort, Failure, LoadOptions, RawRecord, SpriteSummary, AREA_HEADER_LEN,
    RECORD_HEADER_LEN,
};
pub use decode::SpriteDecoder;
pub use discovery::{discover, discover_paths, find_sprite_files, DiscoveryResult, Manifest};
pub use error::{ArchiveError, DecodeError, Result, SpriteError};
pub use render::{write_png, write_sheet_json, SheetMeta, SheetPacker};
pub use types::{Colour, DefaultPalette, MaskFormat, Palette, PixelMode, Sprite, SpriteFormat};
pub use validation::{check_archive, Diagnostic, Severity, ValidationResult};
