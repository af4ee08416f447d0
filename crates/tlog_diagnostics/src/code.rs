//! Diagnostic codes with category prefixes for structured message identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
///
/// Each category maps to a single-character prefix used in diagnostic code
/// display (e.g., `N001` for a note, `W002` for a warning).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Informational diagnostics, prefixed with `N`.
    Note,
    /// Warning diagnostics, prefixed with `W`.
    Warning,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Note => 'N',
            Category::Warning => 'W',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric identifier.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g., `N001`, `W004`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }

    /// A free-form line written through [`MessageWriter::write_line`](crate::MessageWriter::write_line).
    pub const MESSAGE: Self = Self::new(Category::Note, 0);
    /// The recorded build is up to date and will be skipped.
    pub const SKIP_UP_TO_DATE: Self = Self::new(Category::Note, 1);
    /// The requested target does not exist.
    pub const TARGET_NOT_FOUND: Self = Self::new(Category::Warning, 1);
    /// A recorded output of the previous build no longer exists.
    pub const OUTPUT_MISSING: Self = Self::new(Category::Warning, 2);
    /// A recorded input of the previous build no longer exists.
    pub const INPUT_MISSING: Self = Self::new(Category::Warning, 3);
    /// A recorded input is newer than the oldest recorded output.
    pub const INPUT_NEWER: Self = Self::new(Category::Warning, 4);
    /// The dependency logs could not be read.
    pub const LOG_UNAVAILABLE: Self = Self::new(Category::Warning, 5);
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
