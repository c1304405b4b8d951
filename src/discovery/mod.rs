//! Finding sprite files and project configuration.
//!
//! A project directory may carry an `asprite.yaml` manifest naming source
//! directories, output settings and load options. Without one, the whole
//! directory is scanned with default settings.
//!
//! # Example
//!
//! ```ignore
//! use asprite::discovery::discover;
//!
//! let result = discover("./apps")?;
//! for path in &result.files {
//!     println!("{}", path.display());
//! }
//! ```

mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Result;

pub use manifest::Manifest;
pub use scanner::{find_sprite_files, is_sprite_file, scan_directory, scan_sources, SPRITE_FILETYPE};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "asprite.yaml";

/// Result of discovering sprite files in a project.
#[derive(Debug)]
pub struct DiscoveryResult {
    /// The project root directory.
    pub root: PathBuf,

    /// The loaded manifest (default if no asprite.yaml was found).
    pub manifest: Manifest,

    /// Whether an asprite.yaml manifest was found.
    pub has_manifest: bool,

    /// Sprite files found, sorted.
    pub files: Vec<PathBuf>,
}

/// Load `asprite.yaml` from a directory, or the default manifest if there
/// is none.
///
/// Returns the manifest and whether a file was found.
pub fn load_manifest(root: &Path) -> Result<(Manifest, bool)> {
    let path = root.join(MANIFEST_FILENAME);
    if path.exists() {
        debug!("loading manifest {}", path.display());
        Ok((Manifest::load(&path)?, true))
    } else {
        Ok((Manifest::default(), false))
    }
}

/// Discover sprite files in a project directory.
///
/// Uses the manifest's sources if an `asprite.yaml` is present, otherwise
/// scans the whole directory.
pub fn discover(root: impl AsRef<Path>) -> Result<DiscoveryResult> {
    let root = root.as_ref().to_path_buf();
    let (manifest, has_manifest) = load_manifest(&root)?;
    let files = scan_sources(&root, &manifest);

    Ok(DiscoveryResult {
        root,
        manifest,
        has_manifest,
        files,
    })
}

/// Discover sprite files from specific paths under a given manifest.
pub fn discover_paths(paths: &[PathBuf], manifest: Manifest) -> DiscoveryResult {
    let files = find_sprite_files(paths, &manifest);

    let root = paths
        .first()
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));

    DiscoveryResult {
        root,
        manifest,
        has_manifest: false,
        files,
    }
}
