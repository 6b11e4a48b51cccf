//! Observability: diagnostics raised during generation.

pub mod sink;

pub use sink::{CollectingSink, Diagnostic, DiagnosticSink, Severity, TracingSink};
