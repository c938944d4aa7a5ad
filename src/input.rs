//! Input acquisition.
//!
//! The whole input is buffered before parsing; composite blocks need
//! unbounded lookahead for brace matching.

use crate::config::InputConfig;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors acquiring input lines.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("error opening '{}': {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("error reading input: {0}")]
    Io(#[from] io::Error),

    #[error("line {line} exceeds maximum length of {max} bytes")]
    LineTooLong { line: usize, max: usize },

    #[error("input exceeds maximum of {max} lines")]
    TooManyLines { max: usize },

    #[error("no input provided")]
    Empty,
}

/// Opens the input file, or standard input when `path` is `None`.
pub fn open(path: Option<&Path>) -> Result<Box<dyn BufRead>, InputError> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|source| InputError::Open {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// Reads all lines, stripped of line terminators, enforcing `limits`.
pub fn read_lines<R: BufRead>(reader: R, limits: &InputConfig) -> Result<Vec<String>, InputError> {
    let mut lines = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;

        if limits.max_input_lines > 0 && index >= limits.max_input_lines {
            return Err(InputError::TooManyLines {
                max: limits.max_input_lines,
            });
        }
        if limits.max_line_length > 0 && line.len() > limits.max_line_length {
            return Err(InputError::LineTooLong {
                line: index + 1,
                max: limits.max_line_length,
            });
        }

        lines.push(line);
    }

    if lines.is_empty() {
        return Err(InputError::Empty);
    }

    tracing::debug!(lines = lines.len(), "input read");
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn limits(max_line_length: usize, max_input_lines: usize) -> InputConfig {
        InputConfig {
            max_line_length,
            max_input_lines,
        }
    }

    #[test]
    fn test_read_strips_terminators() {
        let input = Cursor::new("A --> B\r\nB --> C\n\nC --> D");
        let lines = read_lines(input, &InputConfig::default()).unwrap();
        assert_eq!(lines, vec!["A --> B", "B --> C", "", "C --> D"]);
    }

    #[test]
    fn test_empty_input() {
        let result = read_lines(Cursor::new(""), &InputConfig::default());
        assert!(matches!(result, Err(InputError::Empty)));
    }

    #[test]
    fn test_line_too_long() {
        let input = Cursor::new("A --> B\nA_very_long_state --> B\n");
        let result = read_lines(input, &limits(10, 0));
        assert!(matches!(
            result,
            Err(InputError::LineTooLong { line: 2, max: 10 })
        ));
    }

    #[test]
    fn test_too_many_lines() {
        let input = Cursor::new("a\nb\nc\n");
        let result = read_lines(input, &limits(0, 2));
        assert!(matches!(result, Err(InputError::TooManyLines { max: 2 })));

        let input = Cursor::new("a\nb\n");
        assert_eq!(read_lines(input, &limits(0, 2)).unwrap().len(), 2);
    }

    #[test]
    fn test_zero_means_unlimited() {
        let long = "x".repeat(5000);
        let lines = read_lines(Cursor::new(long.clone()), &limits(0, 0)).unwrap();
        assert_eq!(lines, vec![long]);
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let input = Cursor::new(vec![b'A', 0xff, b'\n']);
        let result = read_lines(input, &InputConfig::default());
        assert!(matches!(result, Err(InputError::Io(_))));
    }

    #[test]
    fn test_open_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "START --> END").unwrap();

        let reader = open(Some(file.path())).unwrap();
        let lines = read_lines(reader, &InputConfig::default()).unwrap();
        assert_eq!(lines, vec!["START --> END"]);
    }

    #[test]
    fn test_open_missing_file() {
        let result = open(Some(Path::new("/nonexistent/transitions.txt")));
        assert!(matches!(result, Err(InputError::Open { .. })));
    }
}
