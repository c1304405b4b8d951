//! Image output for decoded sprites.
//!
//! Individual PNGs and packed sprite sheets with TexturePacker metadata.

mod png;
mod sheet;

pub use png::{scale_sprite, to_image, write_png};
pub use sheet::{write_sheet_json, Frame, SheetMeta, SheetPacker};
