//! # stategen-core
//!
//! Transition grammar engine for stategen.
//!
//! This crate provides:
//! - Lexical validators for states, transitions and descriptions
//! - A recursive parser for nested composite-state blocks
//! - Per-line classification records
//! - Text, CSV and JSON rendering of those records
//!
//! ```text
//! [*] --> Idle
//! {
//!   Idle --> Running : start
//! }
//! ```

pub mod error;
pub mod format;
pub mod grammar;
pub mod parser;
pub mod record;
pub mod report;

pub use error::{CoreError, StructuralError};
pub use format::{Formatter, OutputMode};
pub use grammar::{
    BlockOpening, CompositeSyntax, DescriptionCharset, Grammar, GrammarPolicy, GrammarPreset,
};
pub use parser::Parser;
pub use record::{Classification, ClassifiedLine, ParseReport, State, Transition, PLACEHOLDER};
pub use report::{CollectingSink, DiagnosticSink, NullSink, TracingSink};

/// Classifies `lines` under `policy` in one call.
pub fn parse_lines<S: AsRef<str>>(
    lines: &[S],
    policy: GrammarPolicy,
) -> Result<ParseReport, CoreError> {
    Ok(Parser::new(policy)?.parse(lines))
}
