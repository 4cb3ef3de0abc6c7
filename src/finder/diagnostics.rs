//! Diagnostics reported while classifying references.
//!
//! Semantic gaps (unknown classes, dynamic member names, malformed
//! declarations) never fail a search. They are reported through a
//! [`DiagnosticSink`] instead.

use std::sync::Arc;

use parking_lot::Mutex;
use rowan::TextRange;

use crate::base::LineCol;

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Byte range of the node the diagnostic is about
    pub range: TextRange,
    /// Start of `range` as line/column (0-indexed)
    pub position: LineCol,
    /// Diagnostic code (see [`codes`])
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        range: TextRange,
        position: LineCol,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            severity,
            range,
            position,
            code: None,
            message: message.into(),
        }
    }

    /// Set the diagnostic code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Diagnostic codes.
///
/// - **W0001-W0099**: a candidate was rejected or accepted without full verification
/// - **I0001-I0099**: informational notes on resolution choices
pub mod codes {
    /// A class named by the query, a receiver type or a declaration is not reflectable.
    pub const CLASS_NOT_FOUND: &str = "W0001";
    /// Member name computed at runtime (`$obj->$name`).
    pub const DYNAMIC_MEMBER_NAME: &str = "W0002";
    /// Member declaration without a literal name.
    pub const MALFORMED_DECLARATION: &str = "W0003";
    /// Accepted with an owning class that could not be checked against the target.
    pub const UNVERIFIED_MATCH: &str = "W0004";

    /// Several implemented interfaces declare the member; the first one is used.
    pub const AMBIGUOUS_INTERFACE: &str = "I0001";
    /// Static access through an expression (`$obj::X`), not resolvable from syntax.
    pub const DYNAMIC_QUALIFIER: &str = "I0002";
    /// Member declared in an anonymous class, which has no name to attribute it to.
    pub const ANONYMOUS_CLASS_MEMBER: &str = "I0003";
}

/// Receives diagnostics produced by a search.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn report(&self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Arc<S> {
    fn report(&self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}

/// Forwards diagnostics to `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, d: Diagnostic) {
        let line = d.position.line + 1;
        let col = d.position.col + 1;
        let code = d.code.as_deref().unwrap_or("-");
        match d.severity {
            Severity::Error => tracing::error!(line, col, code, "{}", d.message),
            Severity::Warning => tracing::warn!(line, col, code, "{}", d.message),
            Severity::Info => tracing::debug!(line, col, code, "{}", d.message),
            Severity::Hint => tracing::trace!(line, col, code, "{}", d.message),
        }
    }
}

/// Stores diagnostics for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    /// Remove and return everything reported so far
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.lock())
    }

    pub fn len(&self) -> usize {
        self.diagnostics.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a diagnostic with `code` was reported
    pub fn has_code(&self, code: &str) -> bool {
        self.diagnostics
            .lock()
            .iter()
            .any(|d| d.code.as_deref() == Some(code))
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().push(diagnostic);
    }
}
