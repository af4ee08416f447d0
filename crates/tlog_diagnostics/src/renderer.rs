//! Diagnostic rendering for terminal output.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// warning[W004]: target is out of date with respect to input
///   --> /src/Menus.vsct
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, severity: Severity) -> (&'static str, &'static str) {
        if !self.color {
            return ("", "");
        }
        let start = match severity {
            Severity::Note => "\x1b[1;36m",
            Severity::Warning => "\x1b[1;33m",
        };
        (start, "\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let (start, end) = self.paint(diag.severity);
        let mut out = format!(
            "{start}{}[{}]{end}: {}\n",
            diag.severity, diag.code, diag.message
        );
        if let Some(path) = &diag.path {
            out.push_str(&format!("  --> {}\n", path.display()));
        }
        out
    }
}
