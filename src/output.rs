//! Terminal output formatting for the asprite CLI.
//!
//! Status lines go to stderr with right-aligned coloured verbs, Cargo style.
//! Stdout is reserved for listings and machine-readable output.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::types::Sprite;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Width for right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// Terminal-aware status printer.
///
/// Colour is enabled when stderr is a terminal. A quiet printer drops
/// status and info lines but still shows warnings and errors.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    color: bool,
    quiet: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Printer {
    pub fn new(quiet: bool) -> Self {
        Self {
            color: io::stderr().is_terminal(),
            quiet,
        }
    }

    /// A printer that never emits colour codes.
    pub fn plain(quiet: bool) -> Self {
        Self {
            color: false,
            quiet,
        }
    }

    /// Print a status line with a green bold verb.
    /// e.g. "   Exporting !sprites,ff9 (12 sprites)"
    pub fn status(&self, verb: &str, message: &str) {
        if !self.quiet {
            self.print_line(GREEN, verb, message);
        }
    }

    /// Print a completion line with a green bold verb.
    pub fn success(&self, verb: &str, message: &str) {
        if !self.quiet {
            self.print_line(GREEN, verb, message);
        }
    }

    /// Print an informational line with a cyan bold verb.
    pub fn info(&self, verb: &str, message: &str) {
        if !self.quiet {
            self.print_line(CYAN, verb, message);
        }
    }

    /// Print a warning line with a yellow bold verb.
    pub fn warning(&self, verb: &str, message: &str) {
        self.print_line(YELLOW, verb, message);
    }

    /// Print an error line with a red bold verb.
    pub fn error(&self, verb: &str, message: &str) {
        self.print_line(RED, verb, message);
    }

    /// Format a string as dim/grey.
    pub fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    /// Format a string as bold.
    pub fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    /// Format a diagnostic severity label with colour.
    pub fn severity(&self, label: &str, is_error: bool) -> String {
        let color = if is_error { RED } else { YELLOW };
        if self.color {
            format!("{BOLD}{color}{label}{RESET}")
        } else {
            label.to_string()
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn print_line(&self, color: &str, verb: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(stderr, "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}");
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

/// Pluralize a count: `plural(1, "sprite", "sprites")` → "1 sprite".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// One listing line for a sprite: index, name, size, mode and mask.
pub fn sprite_line(index: usize, sprite: &Sprite) -> String {
    let size = format!("{}x{}", sprite.width(), sprite.height());
    let mask = if sprite.has_mask() { "masked" } else { "" };
    format!(
        "{:>4}  {:<12}  {:>9}  {:<14}  {}",
        index,
        sprite.name(),
        size,
        sprite.mode().to_string(),
        mask
    )
    .trim_end()
    .to_string()
}

/// Return a relative display path when possible, absolute otherwise.
pub fn display_path(path: &Path) -> String {
    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(relative) = path.strip_prefix(&cwd) {
            let s = relative.display().to_string();
            if s.is_empty() {
                return ".".to_string();
            }
            return s;
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PixelMode;

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "sprite", "sprites"), "1 sprite");
        assert_eq!(plural(0, "sprite", "sprites"), "0 sprites");
        assert_eq!(plural(5, "file", "files"), "5 files");
    }

    #[test]
    fn test_sprite_line() {
        let sprite =
            Sprite::from_rgba("!edit", 34, 17, vec![0; 34 * 17 * 4], PixelMode::Indexed4, true)
                .unwrap();
        assert_eq!(
            sprite_line(3, &sprite),
            "   3  !edit             34x17  4bpp indexed    masked"
        );

        let plain = Sprite::from_rgba("x", 1, 1, vec![0; 4], PixelMode::Direct32, false).unwrap();
        assert!(!sprite_line(0, &plain).ends_with(' '));
    }

    #[test]
    fn test_plain_printer_does_not_colour() {
        let printer = Printer::plain(false);
        assert_eq!(printer.bold("x"), "x");
        assert_eq!(printer.severity("error", true), "error");
    }

    #[test]
    fn test_display_path_absolute() {
        let p = Path::new("/nonexistent/path/to/file");
        assert_eq!(display_path(p), "/nonexistent/path/to/file");
    }
}
