//! Individual validation checks.
//!
//! Each check returns a `ValidationResult`; `check_archive` merges them.

use std::collections::BTreeMap;

use crate::archive::{Archive, Failure};
use crate::error::{ArchiveError, DecodeError};
use crate::types::Sprite;

use super::warning::{Diagnostic, ValidationResult};

fn help_of(err: &dyn miette::Diagnostic) -> Option<String> {
    err.help().map(|h| h.to_string())
}

fn with_help(diagnostic: Diagnostic, help: Option<String>) -> Diagnostic {
    match help {
        Some(help) => diagnostic.with_help(help),
        None => diagnostic,
    }
}

/// Code for a container-level problem.
pub fn archive_code(err: &ArchiveError) -> String {
    format!("asprite::archive::{}", err.kind())
}

/// Code for a record-level problem.
pub fn decode_code(err: &DecodeError) -> String {
    format!("asprite::decode::{}", err.kind())
}

/// Report an archive that could not be walked at all.
pub fn check_container(err: &ArchiveError) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.push(with_help(
        Diagnostic::error(archive_code(err), err.to_string()),
        help_of(err),
    ));
    result
}

/// Report a record chain that ended early but was accepted.
pub fn check_partial_walk(stop: Option<&ArchiveError>) -> ValidationResult {
    let mut result = ValidationResult::new();
    if let Some(err) = stop {
        result.push(
            Diagnostic::warning(archive_code(err), err.to_string())
                .with_help("Only the sprites before the break were checked"),
        );
    }
    result
}

/// Report every record that failed to decode.
pub fn check_decode_failures(failures: &[Failure]) -> ValidationResult {
    let mut result = ValidationResult::new();
    for failure in failures {
        let message = format!(
            "Sprite {} ('{}'): {}",
            failure.index, failure.name, failure.error
        );
        result.push(with_help(
            Diagnostic::error(decode_code(&failure.error), message).for_sprite(failure.index),
            help_of(&failure.error),
        ));
    }
    result
}

/// Warn about a file with no sprites in it.
pub fn check_empty_area(archive: &Archive, failures: &[Failure]) -> ValidationResult {
    let mut result = ValidationResult::new();
    if archive.is_empty() && failures.is_empty() {
        result.push(Diagnostic::warning(
            "asprite::validate::empty-area",
            "Sprite area contains no sprites",
        ));
    }
    result
}

/// Warn about sprite names used more than once.
///
/// Takes each sprite with its file index. Lookups by name only ever find
/// the first.
pub fn check_duplicate_names<'a>(
    sprites: impl IntoIterator<Item = (usize, &'a Sprite)>,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    let mut seen: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (index, sprite) in sprites {
        seen.entry(sprite.name()).or_default().push(index);
    }

    for (name, indices) in seen {
        let Some((&first, rest)) = indices.split_first() else {
            continue;
        };
        for &index in rest {
            result.push(
                Diagnostic::warning(
                    "asprite::validate::duplicate-name",
                    format!("Sprite name '{}' is also used by sprite {}", name, first),
                )
                .for_sprite(index)
                .with_help("Lookups by name return the first sprite only"),
            );
        }
    }

    result
}
