//! Sheet command implementation.
//!
//! Packs every sprite of a file into one PNG plus TexturePacker JSON.

use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::output::{display_path, plural};
use crate::render::{scale_sprite, write_png, write_sheet_json, SheetPacker};

use super::export::create_dir;
use super::{open_archive, output_stem, Context, LoadArgs};

/// Pack all sprites of a file into one sheet with JSON metadata
#[derive(Args, Debug)]
pub struct SheetArgs {
    /// Sprite file to pack
    pub file: PathBuf,

    /// Output directory (default: manifest output)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Gap between frames in pixels, before scaling
    #[arg(long)]
    pub padding: Option<u32>,

    /// Scale factor for output (integer upscaling)
    #[arg(long)]
    pub scale: Option<u32>,

    #[command(flatten)]
    pub load: LoadArgs,
}

pub fn run(args: SheetArgs, ctx: &Context) -> Result<()> {
    let output = args.output.clone().unwrap_or_else(|| ctx.manifest.output.clone());
    let padding = args.padding.unwrap_or_else(|| ctx.manifest.effective_padding());
    let scale = args.scale.unwrap_or_else(|| ctx.manifest.effective_scale()).max(1);
    let options = args.load.options(&ctx.manifest);

    let archive = open_archive(&args.file, &options)?;
    ctx.printer.status(
        "Packing",
        &format!(
            "{} ({})",
            display_path(&args.file),
            plural(archive.sprite_count(), "sprite", "sprites")
        ),
    );

    let (sheet, mut meta) = SheetPacker::new(padding).pack(archive.sprites());
    let sheet = scale_sprite(&sheet, scale)?;

    let stem = output_stem(&args.file);
    let png_name = format!("{}.png", stem);
    meta.image = png_name.clone();
    meta.scale = scale;

    create_dir(&output)?;
    let png_path = output.join(&png_name);
    let json_path = output.join(format!("{}.json", stem));
    write_png(&sheet, &png_path, 1)?;
    write_sheet_json(&meta, &json_path)?;

    ctx.printer.success(
        "Finished",
        &format!(
            "{} ({}x{}) and {}",
            display_path(&png_path),
            sheet.width(),
            sheet.height(),
            display_path(&json_path)
        ),
    );
    Ok(())
}
