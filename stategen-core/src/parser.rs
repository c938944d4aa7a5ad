//! Structural parser.
//!
//! Walks the input once, top to bottom. A first pass pairs every opening
//! brace with its balancing `}`; the second pass keeps the open composite
//! blocks on an explicit stack, so nesting depth is bounded only by memory.
//! Nothing here is fatal: every problem becomes an entry in the report and
//! parsing continues with the next line.

use crate::error::{CoreError, StructuralError};
use crate::grammar::{BlockOpening, Grammar, GrammarPolicy};
use crate::record::{Classification, ClassifiedLine, ParseReport};
use crate::report::DiagnosticSink;

/// A trimmed input line with its 1-based position.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    text: &'a str,
}

/// Line classifier for one grammar policy.
///
/// Stateless between calls; a single parser can be shared across threads.
#[derive(Debug, Clone)]
pub struct Parser {
    grammar: Grammar,
}

impl Parser {
    /// Creates a parser for the given policy.
    pub fn new(policy: GrammarPolicy) -> Result<Self, CoreError> {
        Ok(Self::with_grammar(Grammar::new(policy)?))
    }

    pub fn with_grammar(grammar: Grammar) -> Self {
        Self { grammar }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Classifies every line of the input.
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> ParseReport {
        let numbered: Vec<Line<'_>> = lines
            .iter()
            .enumerate()
            .map(|(i, l)| Line {
                number: i + 1,
                text: l.as_ref().trim(),
            })
            .collect();

        let entries = self.parse_lines(&numbered);

        if self.grammar.policy().require_global_transition
            && !entries.iter().any(|e| e.transition().is_some())
        {
            tracing::debug!(lines = lines.len(), "input holds no valid transition");
            return ParseReport::new(vec![ClassifiedLine::new(
                None,
                0,
                Classification::StructuralError(StructuralError::GraphWithoutTransitions),
            )]);
        }

        let report = ParseReport::new(entries);
        tracing::debug!(
            lines = lines.len(),
            valid = report.valid_count(),
            invalid = report.invalid_count(),
            errors = report.error_count(),
            "parse complete"
        );
        report
    }

    /// Classifies the input, then reports each diagnostic to `sink` in order.
    ///
    /// When the global transition rule rejects the input, the sink only sees
    /// that single error.
    pub fn parse_with_sink<S: AsRef<str>>(
        &self,
        lines: &[S],
        sink: &mut dyn DiagnosticSink,
    ) -> ParseReport {
        let report = self.parse(lines);
        for entry in report.diagnostics() {
            sink.report(entry);
        }
        report
    }

    fn parse_lines(&self, lines: &[Line<'_>]) -> Vec<ClassifiedLine> {
        let closes = self.match_braces(lines);
        let mut entries = Vec::with_capacity(lines.len());
        let mut open: Vec<OpenBlock> = Vec::new();
        let mut i = 0;

        loop {
            while open.last().is_some_and(|block| block.end == i) {
                let Some(block) = open.pop() else {
                    break;
                };
                if block.closed {
                    i += 1;
                }
                // Transitions count toward every enclosing block.
                if let Some(parent) = open.last_mut() {
                    parent.has_transition |= block.has_transition;
                }
                self.finish_block(block, &mut entries);
            }

            let Some(&line) = lines.get(i) else {
                break;
            };
            let depth = open.len();

            if line.text.is_empty() {
                i += 1;
                continue;
            }

            // Block openers win over the transition pattern.
            if let Some(opening) = self.grammar.block_opening(line.text) {
                let (name, brace) = match opening {
                    BlockOpening::Anonymous => (None, i),
                    BlockOpening::Named(name) => (Some(name), i),
                    BlockOpening::HeaderOnly(name) => match lines.get(i + 1) {
                        Some(next) if next.text == "{" => (Some(name), i + 1),
                        _ => {
                            entries.push(ClassifiedLine::new(
                                Some(line.number),
                                depth,
                                Classification::StructuralError(
                                    StructuralError::MissingOpeningBrace { name },
                                ),
                            ));
                            i += 1;
                            continue;
                        }
                    },
                };

                let close = closes[brace];
                entries.push(ClassifiedLine::new(
                    Some(line.number),
                    depth,
                    Classification::CompositeBoundary { name: name.clone() },
                ));
                open.push(OpenBlock {
                    entry: entries.len() - 1,
                    name,
                    end: close.unwrap_or(lines.len()),
                    closed: close.is_some(),
                    has_transition: false,
                });
                i = brace + 1;
                continue;
            }

            let classification = if self.grammar.is_block_close(line.text) {
                Classification::StructuralError(StructuralError::UnmatchedClosingBrace)
            } else if let Some(transition) = self.grammar.match_transition(line.text) {
                if let Some(block) = open.last_mut() {
                    block.has_transition = true;
                }
                Classification::ValidTransition(transition)
            } else {
                Classification::InvalidLine {
                    text: line.text.to_string(),
                }
            };
            entries.push(ClassifiedLine::new(Some(line.number), depth, classification));
            i += 1;
        }

        entries
    }

    /// Rewrites the header entry of a block whose body has been consumed.
    fn finish_block(&self, block: OpenBlock, entries: &mut [ClassifiedLine]) {
        let children = entries.len() - block.entry - 1;
        let header = &mut entries[block.entry];
        let (line, depth) = (header.line, header.depth);

        header.classification = if !block.closed {
            tracing::debug!(line = ?line, depth, "composite block never closed");
            Classification::StructuralError(StructuralError::UnclosedComposite { name: block.name })
        } else if !block.has_transition {
            tracing::debug!(line = ?line, depth, "composite block has no transitions");
            Classification::StructuralError(StructuralError::EmptyComposite { name: block.name })
        } else {
            tracing::debug!(line = ?line, depth, children, "composite block");
            Classification::CompositeBoundary { name: block.name }
        };
    }

    /// For every brace-carrying opener, the index of the `}` that balances it.
    fn match_braces(&self, lines: &[Line<'_>]) -> Vec<Option<usize>> {
        let mut closes = vec![None; lines.len()];
        let mut pending = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            if self.grammar.opens_block(line.text) {
                pending.push(i);
            } else if self.grammar.is_block_close(line.text) {
                if let Some(opener) = pending.pop() {
                    closes[opener] = Some(i);
                }
            }
        }

        closes
    }
}

/// A composite block whose body is still being read.
#[derive(Debug)]
struct OpenBlock {
    /// Index of the header entry, patched once the body is done.
    entry: usize,
    name: Option<String>,
    /// Index of the balancing `}`, or the input length when there is none.
    end: usize,
    closed: bool,
    has_transition: bool,
}
