//! Output channel routing.
//!
//! Rendered records go to standard output; diagnostics go to standard error.

use colored::Colorize;
use stategen_core::{Classification, ClassifiedLine, DiagnosticSink, Formatter, ParseReport};
use std::io::{self, Write};

/// Writes diagnostics to standard error, colourized by kind.
#[derive(Debug, Default)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn report(&mut self, entry: &ClassifiedLine) {
        eprintln!("{}", colorize(entry, &Formatter::diagnostic(entry)));
    }
}

/// Applies the diagnostic colour for the entry's kind.
pub fn colorize(entry: &ClassifiedLine, text: &str) -> String {
    match entry.classification {
        Classification::InvalidLine { .. } => text.yellow().to_string(),
        Classification::StructuralError(_) => text.red().to_string(),
        _ => text.to_string(),
    }
}

/// Writes every entry that has a form in the formatter's mode, one per line.
pub fn write_report<W: Write>(
    out: &mut W,
    formatter: &Formatter,
    report: &ParseReport,
) -> io::Result<usize> {
    let mut written = 0;
    for entry in report.iter() {
        let rendered = formatter
            .format(entry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if let Some(line) = rendered {
            writeln!(out, "{}", line)?;
            written += 1;
        }
    }
    out.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stategen_core::{GrammarPolicy, OutputMode, Parser};

    fn render(mode: OutputMode, input: &[&str]) -> String {
        let report = Parser::new(GrammarPolicy::permissive()).unwrap().parse(input);
        let mut buf = Vec::new();
        write_report(&mut buf, &Formatter::new(mode), &report).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_csv_output() {
        let out = render(OutputMode::Csv, &["A --> B : go", "junk", "B --> C"]);
        assert_eq!(out, "A,B,go\nB,C,-\n");
    }

    #[test]
    fn test_text_output() {
        let out = render(OutputMode::Text, &["{", "A --> B", "junk", "}"]);
        assert_eq!(
            out,
            "Composite state contains:\n  Valid transition from A to B\n  Invalid input: junk\n"
        );
    }

    #[test]
    fn test_json_output_one_object_per_line() {
        let out = render(OutputMode::Json, &["A --> B", "junk"]);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["kind"], "invalid");
        assert_eq!(second["text"], "junk");
        assert_eq!(second["line"], 2);
    }

    #[test]
    fn test_colorize_keeps_text() {
        colored::control::set_override(false);
        let entry = ClassifiedLine::new(
            Some(1),
            0,
            Classification::InvalidLine {
                text: "x".to_string(),
            },
        );
        assert_eq!(colorize(&entry, "Invalid input: x"), "Invalid input: x");
        colored::control::unset_override();
    }
}
