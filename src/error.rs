use miette::Diagnostic;
use thiserror::Error;

use crate::archive::AREA_HEADER_LEN;

/// Container-level failures found while walking a sprite area.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    #[error("Truncated header: file is {len} bytes, need at least {min}", min = AREA_HEADER_LEN)]
    #[diagnostic(
        code("asprite::archive::truncated-header"),
        help("The file is too short to be a sprite file")
    )]
    TruncatedHeader { len: usize },

    #[error("Corrupt header: {message}")]
    #[diagnostic(code("asprite::archive::corrupt-header"))]
    CorruptHeader { message: String },

    #[error("Truncated body: sprite area ends at byte {end} but the file is {len} bytes")]
    #[diagnostic(
        code("asprite::archive::truncated-body"),
        help("The file was probably cut short during a transfer")
    )]
    TruncatedBody { end: usize, len: usize },

    #[error(
        "Sprite {index} at byte {offset} has next-sprite offset {next}, which does not move forward"
    )]
    #[diagnostic(code("asprite::archive::non-monotonic-offsets"))]
    CircularOrNonMonotonicOffsets { index: usize, offset: usize, next: i32 },

    #[error("Incomplete archive: header declares {declared} sprites, found {recovered}")]
    #[diagnostic(
        code("asprite::archive::incomplete-archive"),
        help("Pass --partial to keep the sprites that were recovered")
    )]
    IncompleteArchive { declared: usize, recovered: usize },
}

impl ArchiveError {
    /// Short kebab-case name used in diagnostics codes.
    pub fn kind(&self) -> &'static str {
        match self {
            ArchiveError::TruncatedHeader { .. } => "truncated-header",
            ArchiveError::CorruptHeader { .. } => "corrupt-header",
            ArchiveError::TruncatedBody { .. } => "truncated-body",
            ArchiveError::CircularOrNonMonotonicOffsets { .. } => "non-monotonic-offsets",
            ArchiveError::IncompleteArchive { .. } => "incomplete-archive",
        }
    }
}

/// Record-level failures raised while decoding a single sprite.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unsupported pixel mode {mode:#x}")]
    #[diagnostic(
        code("asprite::decode::unsupported-pixel-mode"),
        help("Only 1, 2, 4, 8, 16 and 32 bpp sprites can be decoded")
    )]
    UnsupportedPixelMode { mode: u32 },

    #[error("Bad record layout: {message}")]
    #[diagnostic(code("asprite::decode::bad-layout"))]
    BadLayout { message: String },

    #[error("Truncated pixel data: need {expected} bytes, record has {actual}")]
    #[diagnostic(code("asprite::decode::truncated-pixel-data"))]
    TruncatedPixelData { expected: usize, actual: usize },

    #[error("No palette for {bits_per_pixel}bpp indexed sprite")]
    #[diagnostic(
        code("asprite::decode::missing-palette"),
        help("Set `palette: desktop` to fall back to the default desktop palette")
    )]
    MissingPalette { bits_per_pixel: u8 },

    #[error("Palette index {value} at ({x}, {y}) is outside a {palette_len}-entry palette")]
    #[diagnostic(code("asprite::decode::palette-index-out-of-range"))]
    PaletteIndexOutOfRange {
        x: u32,
        y: u32,
        value: u32,
        palette_len: usize,
    },

    #[error("Truncated mask data: need {expected} bytes, record has {actual}")]
    #[diagnostic(code("asprite::decode::truncated-mask-data"))]
    TruncatedMaskData { expected: usize, actual: usize },
}

impl DecodeError {
    /// Short kebab-case name used in diagnostics codes.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::UnsupportedPixelMode { .. } => "unsupported-pixel-mode",
            DecodeError::BadLayout { .. } => "bad-layout",
            DecodeError::TruncatedPixelData { .. } => "truncated-pixel-data",
            DecodeError::MissingPalette { .. } => "missing-palette",
            DecodeError::PaletteIndexOutOfRange { .. } => "palette-index-out-of-range",
            DecodeError::TruncatedMaskData { .. } => "truncated-mask-data",
        }
    }

    pub(crate) fn layout(message: impl Into<String>) -> Self {
        DecodeError::BadLayout {
            message: message.into(),
        }
    }
}

/// Main error type for asprite operations
#[derive(Error, Diagnostic, Debug)]
pub enum SpriteError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code("asprite::io"))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Archive(#[from] ArchiveError),

    #[error("Failed to decode sprite {index} ({name:?})")]
    #[diagnostic(code("asprite::decode"))]
    Decode {
        index: usize,
        name: String,
        #[source]
        #[diagnostic_source]
        source: DecodeError,
    },

    #[error("Sprite index {index} out of range (archive has {count})")]
    #[diagnostic(code("asprite::index-out-of-range"))]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Config error: {message}")]
    #[diagnostic(code("asprite::config"))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Check failed: {errors} error(s) in {files} file(s)")]
    #[diagnostic(code("asprite::check"))]
    Check { errors: usize, files: usize },

    #[error("Output error: {message}")]
    #[diagnostic(code("asprite::output"))]
    Output {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, SpriteError>;
