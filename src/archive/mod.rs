//! Sprite archives.
//!
//! An [`Archive`] is the decoded form of a whole sprite file. Loading runs
//! in two phases: the record chain is walked serially (each record's
//! position depends on the one before), then every record is decoded,
//! optionally in parallel.
//!
//! Sprites are addressed by index into an owned, ordered collection.

mod reader;

pub use reader::{read_area_header, read_records, walk_records, AreaHeader, RawRecord, RecordWalk};

use std::fs;
use std::path::Path;

use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::decode::SpriteDecoder;
use crate::error::{ArchiveError, DecodeError, Result, SpriteError};
use crate::types::{DefaultPalette, PixelMode, Sprite};

/// Size of the area header stored in a file.
pub const AREA_HEADER_LEN: usize = 12;

/// Fixed part of every sprite record.
pub const RECORD_HEADER_LEN: usize = 44;

/// Stored offsets count from the area-size word, which files omit.
pub(crate) const AREA_BIAS: usize = 4;

/// Options controlling how an archive is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Palette policy for indexed sprites without an embedded palette.
    pub default_palette: DefaultPalette,
    /// Decode records on the rayon thread pool.
    pub parallel: bool,
    /// Keep the records recovered before a broken record chain instead of
    /// failing the load.
    pub accept_partial: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            default_palette: DefaultPalette::Desktop,
            parallel: true,
            accept_partial: false,
        }
    }
}

impl LoadOptions {
    fn decoder(&self) -> SpriteDecoder {
        SpriteDecoder::new(self.default_palette)
    }
}

/// A record that failed to decode in a best-effort load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub index: usize,
    pub name: String,
    pub error: DecodeError,
}

/// Outcome of [`Archive::load_best_effort`].
///
/// `archive` only holds the sprites that decoded, so its indices are not
/// file indices. Use [`BestEffort::iter`] or [`BestEffort::sprite`] to
/// address sprites by their position in the file.
#[derive(Debug)]
pub struct BestEffort {
    /// Sprites that decoded, in file order.
    pub archive: Archive,
    /// File index of each sprite in `archive`.
    pub indices: Vec<usize>,
    /// Records that did not decode, by their index in the file.
    pub failures: Vec<Failure>,
    /// Set when the record chain ended early and the recovered prefix was
    /// kept.
    pub walk_error: Option<ArchiveError>,
}

impl BestEffort {
    /// Number of records walked, decoded or not.
    pub fn record_count(&self) -> usize {
        self.indices.len() + self.failures.len()
    }

    /// Decoded sprites with their file indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Sprite)> {
        self.indices.iter().copied().zip(self.archive.iter())
    }

    /// Get a sprite by its index in the file.
    ///
    /// A record that failed to decode returns its decode error.
    pub fn sprite(&self, index: usize) -> Result<&Sprite> {
        if let Ok(at) = self.indices.binary_search(&index) {
            return self.archive.sprite(at);
        }

        match self.failures.iter().find(|f| f.index == index) {
            Some(failure) => Err(SpriteError::Decode {
                index,
                name: failure.name.clone(),
                source: failure.error.clone(),
            }),
            None => Err(SpriteError::IndexOutOfRange {
                index,
                count: self.record_count(),
            }),
        }
    }
}

impl From<Archive> for BestEffort {
    fn from(archive: Archive) -> Self {
        Self {
            indices: (0..archive.sprite_count()).collect(),
            archive,
            failures: Vec::new(),
            walk_error: None,
        }
    }
}

/// Serializable one-line description of a sprite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpriteSummary {
    pub index: usize,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub mode: PixelMode,
    pub masked: bool,
}

/// A fully decoded sprite file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Archive {
    sprites: Vec<Sprite>,
}

impl Archive {
    /// Read and decode a sprite file with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &LoadOptions::default())
    }

    /// Read and decode a sprite file.
    pub fn open_with(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        let bytes = read_file(path.as_ref())?;
        Self::load(&bytes, options)
    }

    /// Decode an in-memory sprite file with default options.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::load(bytes, &LoadOptions::default())
    }

    /// Decode an in-memory sprite file.
    ///
    /// Fails on the first container error, or on the lowest-indexed record
    /// that does not decode.
    pub fn load(bytes: &[u8], options: &LoadOptions) -> Result<Self> {
        let (records, _) = collect_records(bytes, options)?;
        let results = decode_all(&records, options);

        let mut sprites = Vec::with_capacity(results.len());
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(sprite) => sprites.push(sprite),
                Err(source) => {
                    return Err(SpriteError::Decode {
                        index,
                        name: records[index].name.clone(),
                        source,
                    })
                }
            }
        }

        info!("decoded {} sprites", sprites.len());
        Ok(Self { sprites })
    }

    /// Decode every record that can be decoded.
    ///
    /// Container errors still fail the load. Record failures are collected
    /// instead of aborting. A broken record chain is tolerated only when
    /// `options.accept_partial` is set.
    pub fn load_best_effort(bytes: &[u8], options: &LoadOptions) -> Result<BestEffort> {
        let (records, walk_error) = collect_records(bytes, options)?;
        let results = decode_all(&records, options);

        let mut sprites = Vec::new();
        let mut indices = Vec::new();
        let mut failures = Vec::new();
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(sprite) => {
                    sprites.push(sprite);
                    indices.push(index);
                }
                Err(error) => {
                    warn!("sprite {} {:?}: {}", index, records[index].name, error);
                    failures.push(Failure {
                        index,
                        name: records[index].name.clone(),
                        error,
                    });
                }
            }
        }

        Ok(BestEffort {
            archive: Self { sprites },
            indices,
            failures,
            walk_error,
        })
    }

    /// Build an archive from already decoded sprites.
    pub fn from_sprites(sprites: Vec<Sprite>) -> Self {
        Self { sprites }
    }

    /// Number of sprites.
    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Check if the archive holds no sprites.
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Get a sprite by index.
    pub fn sprite(&self, index: usize) -> Result<&Sprite> {
        self.sprites
            .get(index)
            .ok_or(SpriteError::IndexOutOfRange {
                index,
                count: self.sprites.len(),
            })
    }

    /// Index of the first sprite with the given name.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.sprites.iter().position(|s| s.name() == name)
    }

    /// All sprites in file order.
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter()
    }

    pub fn into_sprites(self) -> Vec<Sprite> {
        self.sprites
    }

    /// One summary per sprite, in file order.
    pub fn summary(&self) -> Vec<SpriteSummary> {
        self.sprites
            .iter()
            .enumerate()
            .map(|(index, s)| SpriteSummary {
                index,
                name: s.name().to_string(),
                width: s.width(),
                height: s.height(),
                mode: s.mode(),
                masked: s.has_mask(),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Archive {
    type Item = &'a Sprite;
    type IntoIter = std::slice::Iter<'a, Sprite>;

    fn into_iter(self) -> Self::IntoIter {
        self.sprites.iter()
    }
}

/// Read a file, attaching the path to any error.
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| SpriteError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read sprite file: {}", e),
    })
}

/// Walk the record chain under the partial-load policy.
///
/// Returns the records and, if the walk was cut short but accepted, the
/// reason it stopped.
fn collect_records<'a>(
    bytes: &'a [u8],
    options: &LoadOptions,
) -> Result<(Vec<RawRecord<'a>>, Option<ArchiveError>)> {
    let walk = walk_records(bytes)?;

    match walk.stop {
        None => Ok((walk.records, None)),
        Some(
            err @ (ArchiveError::IncompleteArchive { .. }
            | ArchiveError::CircularOrNonMonotonicOffsets { .. }),
        ) if options.accept_partial => {
            warn!(
                "{}; keeping {} of {} sprites",
                err,
                walk.records.len(),
                walk.declared
            );
            Ok((walk.records, Some(err)))
        }
        Some(err) => Err(err.into()),
    }
}

/// Decode records, preserving their order in the result.
fn decode_all(
    records: &[RawRecord<'_>],
    options: &LoadOptions,
) -> Vec<std::result::Result<Sprite, DecodeError>> {
    let decoder = options.decoder();
    if options.parallel {
        records.par_iter().map(|r| decoder.decode(r)).collect()
    } else {
        records.iter().map(|r| decoder.decode(r)).collect()
    }
}
