//! Check command implementation.
//!
//! Reports every problem found in each file instead of stopping at the
//! first one.

use std::path::PathBuf;

use clap::Args;

use crate::archive::read_file;
use crate::error::{Result, SpriteError};
use crate::output::{display_path, plural};
use crate::validation::{check_archive, print_diagnostics};

use super::{Context, LoadArgs};

/// Report every problem in sprite files
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Sprite files or directories (default: manifest sources)
    pub paths: Vec<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    pub deny_warnings: bool,

    #[command(flatten)]
    pub load: LoadArgs,
}

pub fn run(args: CheckArgs, ctx: &Context) -> Result<()> {
    let files = ctx.sprite_files(&args.paths);
    let options = args.load.options(&ctx.manifest);

    let mut errors = 0;
    let mut warnings = 0;

    for path in &files {
        let bytes = read_file(path)?;
        let result = check_archive(&bytes, &options);

        if result.is_ok() {
            ctx.printer.status("Checked", &display_path(path));
            continue;
        }

        if result.has_errors() {
            ctx.printer.error("Failed", &display_path(path));
        } else {
            ctx.printer.warning("Checked", &display_path(path));
        }
        print_diagnostics(&result, &ctx.printer);

        errors += result.error_count();
        warnings += result.warning_count();
    }

    if args.deny_warnings {
        errors += warnings;
    }

    if errors > 0 {
        return Err(SpriteError::Check {
            errors,
            files: files.len(),
        });
    }

    ctx.printer.success(
        "Finished",
        &format!(
            "{} checked ({})",
            plural(files.len(), "file", "files"),
            plural(warnings, "warning", "warnings")
        ),
    );
    Ok(())
}
