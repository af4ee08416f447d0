//! Message sinks that receive diagnostics from the store and evaluator.

use crate::code::DiagnosticCode;
use crate::diagnostic::Diagnostic;
use crate::renderer::{DiagnosticRenderer, TerminalRenderer};
use std::sync::Mutex;

/// A destination for human-readable diagnostic lines.
///
/// Implementors only need [`write_line`](Self::write_line). Structured
/// consumers override [`emit`](Self::emit) to keep the full [`Diagnostic`].
pub trait MessageWriter {
    /// Accepts one formatted line of text.
    fn write_line(&self, line: &str);

    /// Accepts a structured diagnostic. Defaults to writing its display form.
    fn emit(&self, diag: Diagnostic) {
        self.write_line(&diag.to_string());
    }
}

/// Discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullWriter;

impl MessageWriter for NullWriter {
    fn write_line(&self, _line: &str) {}
}

/// Writes messages to standard error as they arrive.
///
/// Plain lines are printed as they are. Structured diagnostics go through
/// [`TerminalRenderer`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrWriter {
    color: bool,
}

impl StderrWriter {
    /// Creates a writer, with ANSI colors when `color` is set.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Returns the text printed for `diag`.
    pub fn format(&self, diag: &Diagnostic) -> String {
        TerminalRenderer::new(self.color).render(diag)
    }
}

impl MessageWriter for StderrWriter {
    fn write_line(&self, line: &str) {
        eprintln!("{line}");
    }

    fn emit(&self, diag: Diagnostic) {
        eprint!("{}", self.format(&diag));
    }
}

/// An accumulator for diagnostics emitted during a check.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticSink {
    /// Creates a new empty diagnostic sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
        }
    }

    /// Takes all accumulated diagnostics, leaving the sink empty.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self.diagnostics.lock().unwrap();
        std::mem::take(&mut *diagnostics)
    }

    /// Returns a snapshot of all accumulated diagnostics without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let diagnostics = self.diagnostics.lock().unwrap();
        diagnostics.clone()
    }
}

impl MessageWriter for DiagnosticSink {
    fn write_line(&self, line: &str) {
        self.emit(Diagnostic::note(DiagnosticCode::MESSAGE, line));
    }

    fn emit(&self, diag: Diagnostic) {
        let mut diagnostics = self.diagnostics.lock().unwrap();
        diagnostics.push(diag);
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}
