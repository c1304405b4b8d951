//! Sprite file validation.
//!
//! Loads a file as far as possible and reports every problem found, rather
//! than stopping at the first. Used by `asprite check`.

mod checks;
mod warning;

pub use checks::{archive_code, decode_code};
pub use warning::{Diagnostic, Severity, ValidationResult};

use crate::archive::{Archive, LoadOptions};
use crate::error::SpriteError;
use crate::output::Printer;

/// Run all checks against an in-memory sprite file.
pub fn check_archive(bytes: &[u8], options: &LoadOptions) -> ValidationResult {
    let mut result = ValidationResult::new();

    let loaded = match Archive::load_best_effort(bytes, options) {
        Ok(loaded) => loaded,
        Err(SpriteError::Archive(err)) => return checks::check_container(&err),
        Err(err) => {
            result.push(Diagnostic::error("asprite::validate::load", err.to_string()));
            return result;
        }
    };

    result.merge(checks::check_partial_walk(loaded.walk_error.as_ref()));
    result.merge(checks::check_decode_failures(&loaded.failures));
    result.merge(checks::check_empty_area(&loaded.archive, &loaded.failures));
    result.merge(checks::check_duplicate_names(loaded.iter()));

    result
}

/// Print diagnostics to stderr.
pub fn print_diagnostics(result: &ValidationResult, printer: &Printer) {
    for d in result.iter() {
        let label = printer.severity(&d.severity.to_string(), d.severity == Severity::Error);
        eprintln!("  {}[{}]: {}", label, d.code, d.message);
        if let Some(help) = &d.help {
            eprintln!("    {}: {}", printer.dim("help"), help);
        }
    }
}
