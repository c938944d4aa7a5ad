//! Rendering of classified lines.
//!
//! - `Text` - human-readable, indented two spaces per nesting level
//! - `Csv` - `from,to,description` for transitions only
//! - `Json` - one object per entry, for downstream tooling

use crate::error::CoreError;
use crate::record::{Classification, ClassifiedLine, ParseReport, Transition};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Indentation per nesting level in text output.
pub const INDENT: &str = "  ";

/// Output representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    Text,
    #[default]
    Csv,
    Json,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output mode '{}'", other)),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Text => f.write_str("text"),
            OutputMode::Csv => f.write_str("csv"),
            OutputMode::Json => f.write_str("json"),
        }
    }
}

/// Maps classified lines to output strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter {
    mode: OutputMode,
}

impl Formatter {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Renders one entry. `None` means the entry has no form in this mode.
    pub fn format(&self, entry: &ClassifiedLine) -> Result<Option<String>, CoreError> {
        match self.mode {
            OutputMode::Text => Ok(Some(render_text(entry))),
            OutputMode::Csv => Ok(entry.transition().map(Transition::to_csv)),
            OutputMode::Json => Ok(Some(serde_json::to_string(&JsonRecord::from(entry))?)),
        }
    }

    /// Renders a whole report, skipping entries with no form in this mode.
    pub fn format_report(&self, report: &ParseReport) -> Result<Vec<String>, CoreError> {
        let mut out = Vec::with_capacity(report.len());
        for entry in report.iter() {
            if let Some(line) = self.format(entry)? {
                out.push(line);
            }
        }
        Ok(out)
    }

    /// Human-readable form used on the diagnostic channel.
    pub fn diagnostic(entry: &ClassifiedLine) -> String {
        render_text(entry)
    }
}

fn render_text(entry: &ClassifiedLine) -> String {
    let body = match &entry.classification {
        Classification::ValidTransition(t) => match &t.description {
            Some(desc) => format!(
                "Valid transition from {} to {} with description '{}'",
                t.from, t.to, desc
            ),
            None => format!("Valid transition from {} to {}", t.from, t.to),
        },
        Classification::CompositeBoundary { name: Some(name) } => {
            format!("Composite state {}:", name)
        }
        Classification::CompositeBoundary { name: None } => "Composite state contains:".to_string(),
        Classification::InvalidLine { text } => format!("Invalid input: {}", text),
        Classification::StructuralError(err) => format!("Error: {}", err),
    };

    format!("{}{}", INDENT.repeat(entry.depth), body)
}

#[derive(Debug, Serialize)]
struct JsonRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    depth: usize,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<'a> From<&'a ClassifiedLine> for JsonRecord<'a> {
    fn from(entry: &'a ClassifiedLine) -> Self {
        let mut record = JsonRecord {
            line: entry.line,
            depth: entry.depth,
            kind: "",
            from: None,
            to: None,
            description: None,
            name: None,
            text: None,
            code: None,
            message: None,
        };

        match &entry.classification {
            Classification::ValidTransition(t) => {
                record.kind = "transition";
                record.from = Some(t.from.as_str());
                record.to = Some(t.to.as_str());
                record.description = Some(t.description_or_placeholder());
            }
            Classification::CompositeBoundary { name } => {
                record.kind = "composite";
                record.name = name.as_deref();
            }
            Classification::InvalidLine { text } => {
                record.kind = "invalid";
                record.text = Some(text);
            }
            Classification::StructuralError(err) => {
                record.kind = "error";
                record.name = err.state_name();
                record.code = Some(err.code());
                record.message = Some(err.to_string());
            }
        }

        record
    }
}
