//! Diagnostics sink boundary.
//!
//! Generation never logs conditions directly; every warning and error is a
//! `Diagnostic` handed to a `DiagnosticSink`, keyed by type and property.

use derive_more::Display;
use std::sync::{Mutex, PoisonError};
use tracing::{error, warn};

///
/// Severity
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Severity {
    #[display("warning")]
    Warning,

    #[display("error")]
    Error,
}

///
/// Diagnostic
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub type_path: String,
    pub property: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn error(type_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            type_path: type_path.into(),
            property: None,
            message: message.into(),
        }
    }

    pub fn warning(type_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(type_path, message)
        }
    }

    #[must_use]
    pub fn at(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.property {
            Some(property) => write!(
                f,
                "{}: {}.{}: {}",
                self.severity, self.type_path, property, self.message
            ),
            None => write!(f, "{}: {}: {}", self.severity, self.type_path, self.message),
        }
    }
}

///
/// DiagnosticSink
///

pub trait DiagnosticSink {
    fn record(&self, diagnostic: Diagnostic);
}

///
/// TracingSink
/// Forwards every diagnostic as a `tracing` event.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, d: Diagnostic) {
        let property = d.property.as_deref().unwrap_or("");

        match d.severity {
            Severity::Warning => warn!(ty = %d.type_path, property, "{}", d.message),
            Severity::Error => error!(ty = %d.type_path, property, "{}", d.message),
        }
    }
}

///
/// CollectingSink
/// Keeps diagnostics in memory, in arrival order.
///

#[derive(Debug, Default)]
pub struct CollectingSink {
    records: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|d| d.is_error())
            .count()
    }
}

impl DiagnosticSink for CollectingSink {
    fn record(&self, diagnostic: Diagnostic) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_keeps_order_and_counts_errors() {
        let sink = CollectingSink::new();
        sink.record(Diagnostic::warning("app::Foo", "types differ").at("count"));
        sink.record(Diagnostic::error("app::Bar", "no constructor"));

        let records = sink.diagnostics();
        assert_eq!(records.len(), 2);
        assert_eq!(sink.error_count(), 1);
        assert_eq!(records[0].to_string(), "warning: app::Foo.count: types differ");
        assert_eq!(records[1].to_string(), "error: app::Bar: no constructor");
    }
}
