//! Export command implementation.
//!
//! Decodes a sprite file and writes one PNG per sprite.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::archive::{Archive, BestEffort, LoadOptions};
use crate::error::{Result, SpriteError};
use crate::output::{display_path, plural};
use crate::render::write_png;
use crate::types::Sprite;

use super::{open_archive, output_stem, sanitize, Context, LoadArgs};

/// Write each sprite to a PNG file
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Sprite file to export
    pub file: PathBuf,

    /// Output directory (default: manifest output)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Scale factor for output (integer upscaling)
    #[arg(long)]
    pub scale: Option<u32>,

    /// Export only the sprite at this index
    #[arg(long, short)]
    pub index: Option<usize>,

    /// Skip sprites that fail to decode instead of stopping
    #[arg(long)]
    pub keep_going: bool,

    #[command(flatten)]
    pub load: LoadArgs,
}

pub fn run(args: ExportArgs, ctx: &Context) -> Result<()> {
    let output = args.output.clone().unwrap_or_else(|| ctx.manifest.output.clone());
    let scale = args.scale.unwrap_or_else(|| ctx.manifest.effective_scale());
    let options = args.load.options(&ctx.manifest);

    let loaded = load(&args, &options, ctx)?;
    if let Some(index) = args.index {
        loaded.sprite(index)?;
    }

    let sprites: Vec<(usize, &Sprite)> = loaded.iter().collect();
    let names = file_names(&output_stem(&args.file), &sprites);
    let selected: Vec<(&Sprite, String)> = sprites
        .iter()
        .zip(names)
        .filter(|((index, _), _)| args.index.map_or(true, |wanted| *index == wanted))
        .map(|((_, sprite), name)| (*sprite, name))
        .collect();

    create_dir(&output)?;
    ctx.printer.status(
        "Exporting",
        &format!(
            "{} ({})",
            display_path(&args.file),
            plural(selected.len(), "sprite", "sprites")
        ),
    );

    for (sprite, name) in selected {
        let path = output.join(name);
        write_png(sprite, &path, scale)?;
        log::debug!("wrote {}", path.display());
    }

    ctx.printer
        .success("Finished", &format!("wrote PNGs to {}", display_path(&output)));
    Ok(())
}

fn load(args: &ExportArgs, options: &LoadOptions, ctx: &Context) -> Result<BestEffort> {
    if !args.keep_going {
        return open_archive(&args.file, options).map(BestEffort::from);
    }

    let bytes = crate::archive::read_file(&args.file)?;
    let loaded = Archive::load_best_effort(&bytes, options)?;
    for failure in &loaded.failures {
        ctx.printer.warning(
            "Skipping",
            &format!("sprite {} ('{}'): {}", failure.index, failure.name, failure.error),
        );
    }
    Ok(loaded)
}

/// PNG file names for each sprite, unique within the file.
///
/// `<stem>-<name>.png`, with the sprite's file index added when a name
/// repeats.
pub(crate) fn file_names(stem: &str, sprites: &[(usize, &Sprite)]) -> Vec<String> {
    let mut seen = HashSet::new();
    let duplicated: HashSet<&str> = sprites
        .iter()
        .map(|(_, sprite)| sprite.name())
        .filter(|name| !seen.insert(*name))
        .collect();

    sprites
        .iter()
        .map(|(index, sprite)| {
            let name = sanitize(sprite.name());
            if duplicated.contains(sprite.name()) {
                format!("{}-{}-{}.png", stem, name, index)
            } else {
                format!("{}-{}.png", stem, name)
            }
        })
        .collect()
}

pub(crate) fn create_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| SpriteError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }
    Ok(())
}
