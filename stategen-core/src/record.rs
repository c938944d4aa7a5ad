//! Classification records produced by the parser.
//!
//! Every processed line (or composite block) yields one [`ClassifiedLine`],
//! in input order. A block's own entry precedes the entries of its body.

use crate::error::{CoreError, StructuralError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel used in normalized output when a transition has no description.
pub const PLACEHOLDER: &str = "-";

/// A state name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(pub String);

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the `[*]` initial/final pseudo-state.
    pub fn is_wildcard(&self) -> bool {
        self.0 == "[*]"
    }
}

impl From<&str> for State {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for State {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A transition between two states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Source state.
    pub from: State,

    /// Target state.
    pub to: State,

    /// Trimmed description; never empty when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Transition {
    pub fn new(from: impl Into<State>, to: impl Into<State>, description: Option<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            description,
        }
    }

    /// Returns the description, or [`PLACEHOLDER`] when absent.
    pub fn description_or_placeholder(&self) -> &str {
        self.description.as_deref().unwrap_or(PLACEHOLDER)
    }

    /// Normalized `from,to,description` record.
    pub fn to_csv(&self) -> String {
        format!("{},{},{}", self.from, self.to, self.description_or_placeholder())
    }

    /// Parses a record produced by [`Transition::to_csv`].
    ///
    /// Only the first two commas separate fields; anything after them is the
    /// description. The placeholder maps back to `None`.
    pub fn from_csv(record: &str) -> Result<Self, CoreError> {
        let mut fields = record.splitn(3, ',');
        let (from, to, description) = match (fields.next(), fields.next(), fields.next()) {
            (Some(from), Some(to), Some(desc)) if !from.is_empty() && !to.is_empty() => {
                (from, to, desc)
            }
            _ => {
                return Err(CoreError::MalformedRecord {
                    record: record.to_string(),
                })
            }
        };

        let description = match description {
            "" | PLACEHOLDER => None,
            d => Some(d.to_string()),
        };

        Ok(Self::new(from, to, description))
    }
}

/// What a processed line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A well-formed `FROM --> TO [: DESCRIPTION]` line.
    ValidTransition(Transition),
    /// Opening of a composite block that holds at least one transition.
    CompositeBoundary { name: Option<String> },
    /// A line matching no construct.
    InvalidLine { text: String },
    /// A brace or block-level problem.
    StructuralError(StructuralError),
}

/// A classification anchored to its place in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    /// 1-based source line; `None` only for whole-input errors.
    pub line: Option<usize>,
    /// Composite nesting depth, 0 at top level.
    pub depth: usize,
    pub classification: Classification,
}

impl ClassifiedLine {
    pub fn new(line: Option<usize>, depth: usize, classification: Classification) -> Self {
        Self {
            line,
            depth,
            classification,
        }
    }

    pub fn transition(&self) -> Option<&Transition> {
        match &self.classification {
            Classification::ValidTransition(t) => Some(t),
            _ => None,
        }
    }

    /// True for invalid lines and structural errors.
    pub fn is_diagnostic(&self) -> bool {
        matches!(
            self.classification,
            Classification::InvalidLine { .. } | Classification::StructuralError(_)
        )
    }
}

/// Ordered result of one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub entries: Vec<ClassifiedLine>,
}

impl ParseReport {
    pub fn new(entries: Vec<ClassifiedLine>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassifiedLine> {
        self.entries.iter()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.entries.iter().filter_map(ClassifiedLine::transition)
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &ClassifiedLine> {
        self.entries.iter().filter(|e| e.is_diagnostic())
    }

    pub fn valid_count(&self) -> usize {
        self.transitions().count()
    }

    pub fn invalid_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.classification, Classification::InvalidLine { .. }))
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.classification, Classification::StructuralError(_)))
            .count()
    }

    /// True when the whole input was rejected by the global transition rule.
    pub fn is_global_error(&self) -> bool {
        matches!(
            self.entries.as_slice(),
            [ClassifiedLine {
                classification: Classification::StructuralError(
                    StructuralError::GraphWithoutTransitions
                ),
                ..
            }]
        )
    }
}

impl IntoIterator for ParseReport {
    type Item = ClassifiedLine;
    type IntoIter = std::vec::IntoIter<ClassifiedLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
