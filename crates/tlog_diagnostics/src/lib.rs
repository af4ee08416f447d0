//! Diagnostic messages, severity levels, and the injectable message sink.
//!
//! The dependency store and staleness evaluator never print directly. They
//! report through a [`MessageWriter`], which may be a plain line sink such as
//! [`StderrWriter`] or the structured [`DiagnosticSink`]. [`DiagnosticRenderer`]
//! implementations turn collected diagnostics back into text.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::{DiagnosticSink, MessageWriter, NullWriter, StderrWriter};
