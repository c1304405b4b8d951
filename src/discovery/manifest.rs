//! Project manifest (asprite.yaml) parsing.
//!
//! The manifest holds per-project defaults: where to look for sprite files,
//! where to write output, and how archives should be loaded. Command line
//! flags override it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::archive::LoadOptions;
use crate::error::{Result, SpriteError};
use crate::types::DefaultPalette;

/// Project manifest loaded from asprite.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Directories or files to scan for sprite files.
    /// Defaults to the current directory if empty.
    pub sources: Vec<String>,

    /// Output directory for exported images.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Default scale factor for output.
    pub scale: Option<u32>,

    /// Gap between frames in packed sheets.
    pub padding: Option<u32>,

    /// Palette policy for indexed sprites without an embedded palette.
    pub palette: Option<DefaultPalette>,

    /// Decode sprites in parallel.
    pub parallel: Option<bool>,

    /// Keep the sprites recovered from a file with a broken record chain.
    pub partial: Option<bool>,

    /// Patterns to exclude from discovery.
    pub excludes: Vec<String>,
}

fn default_output() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            sources: vec![],
            output: default_output(),
            scale: None,
            padding: None,
            palette: None,
            parallel: None,
            partial: None,
            excludes: vec![],
        }
    }
}

impl Manifest {
    /// Load manifest from an asprite.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SpriteError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| SpriteError::Config {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check asprite.yaml syntax".to_string()),
        })
    }

    /// Check if a path should be excluded based on exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.excludes
            .iter()
            .any(|pattern| Self::matches_pattern(&path_str, pattern))
    }

    /// Simple glob pattern matching.
    fn matches_pattern(path: &str, pattern: &str) -> bool {
        if let Some(suffix) = pattern.strip_prefix("**/") {
            // **/dir/* matches anything inside dir anywhere in the path
            if let Some(dir) = suffix.strip_suffix("/*") {
                return path.contains(&format!("/{}/", dir)) || path.starts_with(&format!("{}/", dir));
            }
            return path.contains(suffix);
        }

        if let Some(suffix) = pattern.strip_prefix('*') {
            if !pattern.contains('/') {
                return path.ends_with(suffix);
            }
        }

        if let Some(prefix) = pattern.strip_suffix("/*") {
            return path.starts_with(&format!("{}/", prefix))
                || path.contains(&format!("/{}/", prefix));
        }

        path.contains(pattern)
    }

    /// Get effective source paths, defaulting to current directory.
    pub fn effective_sources(&self) -> Vec<String> {
        if self.sources.is_empty() {
            vec![".".to_string()]
        } else {
            self.sources.clone()
        }
    }

    /// Get the effective scale factor.
    pub fn effective_scale(&self) -> u32 {
        self.scale.unwrap_or(1)
    }

    /// Get the effective sheet padding.
    pub fn effective_padding(&self) -> u32 {
        self.padding.unwrap_or(1)
    }

    /// Archive load options implied by the manifest.
    pub fn load_options(&self) -> LoadOptions {
        let defaults = LoadOptions::default();
        LoadOptions {
            default_palette: self.palette.unwrap_or(defaults.default_palette),
            parallel: self.parallel.unwrap_or(defaults.parallel),
            accept_partial: self.partial.unwrap_or(defaults.accept_partial),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_manifest() {
        let manifest = Manifest::parse("output: build").unwrap();

        assert_eq!(manifest.output, PathBuf::from("build"));
        assert!(manifest.sources.is_empty());
        assert!(manifest.palette.is_none());
    }

    #[test]
    fn test_parse_full_manifest() {
        let yaml = r#"
sources:
  - apps/
  - "!Boot/Resources"
output: dist/icons
scale: 4
padding: 2
palette: strict
parallel: false
partial: true
excludes:
  - "*.bak"
  - "**/old/*"
"#;
        let manifest = Manifest::parse(yaml).unwrap();

        assert_eq!(manifest.sources, vec!["apps/", "!Boot/Resources"]);
        assert_eq!(manifest.output, PathBuf::from("dist/icons"));
        assert_eq!(manifest.scale, Some(4));
        assert_eq!(manifest.padding, Some(2));
        assert_eq!(manifest.palette, Some(DefaultPalette::Strict));
        assert_eq!(manifest.excludes, vec!["*.bak", "**/old/*"]);

        let options = manifest.load_options();
        assert_eq!(options.default_palette, DefaultPalette::Strict);
        assert!(!options.parallel);
        assert!(options.accept_partial);
    }

    #[test]
    fn test_default_manifest() {
        let manifest = Manifest::default();

        assert_eq!(manifest.output, PathBuf::from("dist"));
        assert_eq!(manifest.effective_scale(), 1);
        assert_eq!(manifest.effective_padding(), 1);
        assert_eq!(manifest.load_options(), LoadOptions::default());
    }

    #[test]
    fn test_parse_empty_manifest() {
        assert_eq!(Manifest::parse("").unwrap(), Manifest::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Manifest::parse("shader: dark").unwrap_err();
        assert!(matches!(err, SpriteError::Config { .. }));
    }

    #[test]
    fn test_bad_palette_rejected() {
        assert!(Manifest::parse("palette: sepia").is_err());
    }

    #[test]
    fn test_effective_sources() {
        let mut manifest = Manifest::default();
        assert_eq!(manifest.effective_sources(), vec!["."]);

        manifest.sources = vec!["apps/".to_string()];
        assert_eq!(manifest.effective_sources(), vec!["apps/"]);
    }

    #[test]
    fn test_is_excluded_extension() {
        let manifest = Manifest {
            excludes: vec!["*.bak".to_string()],
            ..Default::default()
        };

        assert!(manifest.is_excluded(Path::new("sprites.bak")));
        assert!(manifest.is_excluded(Path::new("apps/!Edit/sprites.bak")));
        assert!(!manifest.is_excluded(Path::new("sprites,ff9")));
    }

    #[test]
    fn test_is_excluded_directory() {
        let manifest = Manifest {
            excludes: vec!["**/old/*".to_string()],
            ..Default::default()
        };

        assert!(manifest.is_excluded(Path::new("old/icons.spr")));
        assert!(manifest.is_excluded(Path::new("apps/old/icons.spr")));
        assert!(!manifest.is_excluded(Path::new("apps/bold/icons.spr")));
    }

    #[test]
    fn test_is_excluded_plain() {
        let manifest = Manifest {
            excludes: vec!["Themes".to_string()],
            ..Default::default()
        };

        assert!(manifest.is_excluded(Path::new("Resources/Themes/Ursula,ff9")));
        assert!(!manifest.is_excluded(Path::new("Resources/Sprites,ff9")));
    }
}
