//! Diagnostic sinks.
//!
//! The parser never writes anywhere on its own. Callers that want invalid
//! lines and structural errors surfaced as they are classified hand a sink to
//! [`Parser::parse_with_sink`](crate::Parser::parse_with_sink).

use crate::format::Formatter;
use crate::record::ClassifiedLine;

/// Receives diagnostic entries (invalid lines and structural errors).
pub trait DiagnosticSink {
    fn report(&mut self, entry: &ClassifiedLine);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _entry: &ClassifiedLine) {}
}

/// Keeps rendered diagnostics in memory.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    messages: Vec<String>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, entry: &ClassifiedLine) {
        self.messages.push(Formatter::diagnostic(entry));
    }
}

/// Forwards diagnostics as `tracing` warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, entry: &ClassifiedLine) {
        let message = Formatter::diagnostic(entry);
        tracing::warn!(line = ?entry.line, depth = entry.depth, "{}", message.trim_start());
    }
}
