//! Info command implementation.
//!
//! Lists the sprites in each file, or prints their summaries as JSON.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::archive::SpriteSummary;
use crate::error::{Result, SpriteError};
use crate::output::{display_path, plural, sprite_line};

use super::{open_archive, Context, LoadArgs};

/// List the sprites in sprite files
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Sprite files or directories (default: manifest sources)
    pub paths: Vec<PathBuf>,

    /// Print summaries as JSON on stdout
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub load: LoadArgs,
}

/// JSON record for one file.
#[derive(Debug, Serialize)]
pub struct FileInfo {
    pub file: String,
    pub sprites: Vec<SpriteSummary>,
}

pub fn run(args: InfoArgs, ctx: &Context) -> Result<()> {
    let files = ctx.sprite_files(&args.paths);
    if files.is_empty() {
        ctx.printer.warning("Warning", "no sprite files found");
    }

    let options = args.load.options(&ctx.manifest);
    let mut infos = Vec::with_capacity(files.len());

    for path in &files {
        let archive = open_archive(path, &options)?;

        if args.json {
            infos.push(FileInfo {
                file: display_path(path),
                sprites: archive.summary(),
            });
            continue;
        }

        ctx.printer.info(
            "File",
            &format!(
                "{} ({})",
                display_path(path),
                plural(archive.sprite_count(), "sprite", "sprites")
            ),
        );
        for (index, sprite) in archive.iter().enumerate() {
            println!("{}", sprite_line(index, sprite));
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(&infos).map_err(|e| SpriteError::Output {
            message: format!("Failed to serialize summary: {}", e),
            help: None,
        })?;
        println!("{}", json);
    }

    Ok(())
}
