//! Lexical validators for the transition grammar.
//!
//! The grammar recognizes three tokens:
//!
//! - `STATE` - an identifier `[A-Za-z_][A-Za-z0-9_]*` or the pseudo-state `[*]`
//! - `TRANSITION` - `STATE --> STATE` with optional whitespace around the arrow
//! - `DESCRIPTION` - free text after a `:` following the transition
//!
//! Examples:
//! - `[*] --> Idle`
//! - `Idle-->Running`
//! - `Running --> Done : finished cleanly`
//!
//! Several revisions of the grammar are in circulation. They are all expressed
//! through one [`GrammarPolicy`] instead of separate parsers.

use crate::error::CoreError;
use crate::record::Transition;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Punctuation accepted in descriptions under [`DescriptionCharset::Restricted`].
pub const RESTRICTED_PUNCTUATION: &str = "_-.!?'()/&";

const WILDCARD_PATTERN: &str = r"\[\*\]";

/// Which characters a description may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionCharset {
    /// Any text.
    #[default]
    Free,
    /// ASCII letters, digits, blanks and [`RESTRICTED_PUNCTUATION`].
    Restricted,
}

/// How composite-state blocks are introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeSyntax {
    /// Bare `{ ... }` blocks only.
    #[default]
    Anonymous,
    /// `state NAME { ... }` headers in addition to bare blocks.
    Named,
}

/// Named policy bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarPreset {
    #[default]
    Permissive,
    Strict,
}

/// Grammar options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarPolicy {
    /// Minimum length of identifier state names (`[*]` is exempt).
    pub identifier_min_length: usize,
    /// Allowed description characters.
    pub description_charset: DescriptionCharset,
    /// Composite block syntax.
    pub composite_syntax: CompositeSyntax,
    /// Reject the whole input when it holds no valid transition.
    pub require_global_transition: bool,
}

impl Default for GrammarPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}

impl GrammarPolicy {
    pub fn permissive() -> Self {
        Self {
            identifier_min_length: 1,
            description_charset: DescriptionCharset::Free,
            composite_syntax: CompositeSyntax::Anonymous,
            require_global_transition: false,
        }
    }

    pub fn strict() -> Self {
        Self {
            identifier_min_length: 1,
            description_charset: DescriptionCharset::Restricted,
            composite_syntax: CompositeSyntax::Named,
            require_global_transition: true,
        }
    }

    pub fn from_preset(preset: GrammarPreset) -> Self {
        match preset {
            GrammarPreset::Permissive => Self::permissive(),
            GrammarPreset::Strict => Self::strict(),
        }
    }

    /// Checks the policy for values the engine cannot honour.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.identifier_min_length == 0 {
            return Err(CoreError::InvalidPolicy {
                reason: "identifier_min_length must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// How a line opens a composite block, if it does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOpening {
    /// A line that is exactly `{`.
    Anonymous,
    /// `state NAME {`
    Named(String),
    /// `state NAME` without a brace on the same line.
    HeaderOnly(String),
}

impl BlockOpening {
    /// Whether the line itself carries the opening brace.
    pub fn has_brace(&self) -> bool {
        !matches!(self, BlockOpening::HeaderOnly(_))
    }
}

/// A validated policy with its compiled patterns.
#[derive(Debug, Clone)]
pub struct Grammar {
    policy: GrammarPolicy,
    state_regex: Regex,
    transition_regex: Regex,
    header_regex: Regex,
}

impl Grammar {
    /// Compiles the patterns for a policy.
    pub fn new(policy: GrammarPolicy) -> Result<Self, CoreError> {
        policy.validate()?;

        let ident = identifier_pattern(policy.identifier_min_length);
        let state = format!("(?:{}|{})", ident, WILDCARD_PATTERN);

        let state_regex = Regex::new(&format!("^{}$", state))?;
        let transition_regex = Regex::new(&format!(
            r"^({state})\s*-->\s*({state})(?:\s*:(.*))?$",
            state = state
        ))?;
        let header_regex = Regex::new(&format!(r"^state\s+({})\s*(\{{)?$", ident))?;

        Ok(Self {
            policy,
            state_regex,
            transition_regex,
            header_regex,
        })
    }

    pub fn policy(&self) -> &GrammarPolicy {
        &self.policy
    }

    /// Full-string match against the state grammar.
    pub fn is_valid_state(&self, s: &str) -> bool {
        self.state_regex.is_match(s)
    }

    /// Whether the trimmed line is a complete transition.
    pub fn is_valid_transition(&self, line: &str) -> bool {
        self.match_transition(line).is_some()
    }

    /// Empty (or blank) text means "no description" and is accepted.
    pub fn is_valid_description(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return true;
        }
        match self.policy.description_charset {
            DescriptionCharset::Free => true,
            DescriptionCharset::Restricted => text.chars().all(is_restricted_char),
        }
    }

    /// Extracts the transition from a line, if the line is one.
    ///
    /// A colon must be followed by a non-blank description.
    pub fn match_transition(&self, line: &str) -> Option<Transition> {
        let caps = self.transition_regex.captures(line.trim())?;
        let from = caps.get(1)?.as_str();
        let to = caps.get(2)?.as_str();

        let description = match caps.get(3) {
            None => None,
            Some(m) => {
                let text = m.as_str().trim();
                if text.is_empty() || !self.is_valid_description(text) {
                    return None;
                }
                Some(text.to_string())
            }
        };

        Some(Transition::new(from, to, description))
    }

    /// Recognizes a block opener on the trimmed line.
    pub fn block_opening(&self, line: &str) -> Option<BlockOpening> {
        let line = line.trim();
        if line == "{" {
            return Some(BlockOpening::Anonymous);
        }
        if self.policy.composite_syntax != CompositeSyntax::Named {
            return None;
        }

        let caps = self.header_regex.captures(line)?;
        let name = caps.get(1)?.as_str().to_string();
        if caps.get(2).is_some() {
            Some(BlockOpening::Named(name))
        } else {
            Some(BlockOpening::HeaderOnly(name))
        }
    }

    /// Whether the line raises brace depth while scanning a block body.
    pub fn opens_block(&self, line: &str) -> bool {
        self.block_opening(line)
            .map(|o| o.has_brace())
            .unwrap_or(false)
    }

    pub fn is_block_close(&self, line: &str) -> bool {
        line.trim() == "}"
    }
}

fn identifier_pattern(min_length: usize) -> String {
    match min_length {
        0 | 1 => "[A-Za-z_][A-Za-z0-9_]*".to_string(),
        n => format!("[A-Za-z_][A-Za-z0-9_]{{{},}}", n - 1),
    }
}

fn is_restricted_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || c == '\t' || RESTRICTED_PUNCTUATION.contains(c)
}

impl FromStr for DescriptionCharset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "restricted" => Ok(Self::Restricted),
            other => Err(format!("unknown description charset '{}'", other)),
        }
    }
}

impl FromStr for CompositeSyntax {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anonymous" => Ok(Self::Anonymous),
            "named" => Ok(Self::Named),
            other => Err(format!("unknown composite syntax '{}'", other)),
        }
    }
}

impl FromStr for GrammarPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown grammar preset '{}'", other)),
        }
    }
}

impl fmt::Display for GrammarPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarPreset::Permissive => f.write_str("permissive"),
            GrammarPreset::Strict => f.write_str("strict"),
        }
    }
}
