//! Command line interface.

pub mod check;
pub mod completions;
pub mod export;
pub mod info;
pub mod sheet;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use log::info;

use crate::archive::{Archive, LoadOptions};
use crate::discovery::{discover_paths, load_manifest, Manifest};
use crate::error::Result;
use crate::output::Printer;
use crate::types::DefaultPalette;

/// asprite - RISC OS sprite file decoder
#[derive(Parser, Debug)]
#[command(name = "asprite")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Manifest to use instead of ./asprite.yaml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the sprites in sprite files
    Info(info::InfoArgs),

    /// Write each sprite to a PNG file
    Export(export::ExportArgs),

    /// Pack all sprites of a file into one sheet with JSON metadata
    Sheet(sheet::SheetArgs),

    /// Report every problem in sprite files
    Check(check::CheckArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Flags controlling how archives are loaded; override the manifest.
#[derive(Args, Debug, Clone, Default)]
pub struct LoadArgs {
    /// Palette for indexed sprites without one of their own
    #[arg(long, value_enum)]
    pub palette: Option<DefaultPalette>,

    /// Keep the sprites recovered from a file whose record chain is broken
    #[arg(long)]
    pub partial: bool,

    /// Decode sprites one at a time on the calling thread
    #[arg(long)]
    pub sequential: bool,
}

impl LoadArgs {
    pub fn options(&self, manifest: &Manifest) -> LoadOptions {
        let mut options = manifest.load_options();
        if let Some(palette) = self.palette {
            options.default_palette = palette;
        }
        if self.partial {
            options.accept_partial = true;
        }
        if self.sequential {
            options.parallel = false;
        }
        options
    }
}

/// State shared by every command.
#[derive(Debug)]
pub struct Context {
    pub manifest: Manifest,
    pub printer: Printer,
}

impl Context {
    /// Load the manifest named by `--config`, or `asprite.yaml` in the
    /// current directory if there is one.
    pub fn load(config: Option<&Path>, printer: Printer) -> Result<Self> {
        let manifest = match config {
            Some(path) => Manifest::load(path)?,
            None => load_manifest(Path::new("."))?.0,
        };
        Ok(Self { manifest, printer })
    }

    /// Sprite files named on the command line, or the manifest's sources.
    pub fn sprite_files(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let paths: Vec<PathBuf> = if paths.is_empty() {
            self.manifest
                .effective_sources()
                .into_iter()
                .map(PathBuf::from)
                .collect()
        } else {
            paths.to_vec()
        };
        discover_paths(&paths, self.manifest.clone()).files
    }
}

/// Run a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let printer = Printer::new(cli.quiet);
    let context = || Context::load(cli.config.as_deref(), printer);

    match cli.command {
        Commands::Info(args) => info::run(args, &context()?),
        Commands::Export(args) => export::run(args, &context()?),
        Commands::Sheet(args) => sheet::run(args, &context()?),
        Commands::Check(args) => check::run(args, &context()?),
        Commands::Completions(args) => completions::run(args),
    }
}

/// Open an archive, logging what was loaded.
pub(crate) fn open_archive(path: &Path, options: &LoadOptions) -> Result<Archive> {
    let archive = Archive::open_with(path, options)?;
    info!("{}: {} sprites", path.display(), archive.sprite_count());
    Ok(archive)
}

/// Base name for files derived from a sprite file: the file stem with any
/// `,xxx` filetype suffix removed.
pub(crate) fn output_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sprites".to_string());

    let stem = match name.rsplit_once(',') {
        Some((stem, _)) => stem.to_string(),
        None => Path::new(&name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(name.clone()),
    };

    sanitize(&stem)
}

/// Make a sprite or file name safe to use as a file name.
pub(crate) fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "unnamed".to_string()
    } else {
        cleaned
    }
}
