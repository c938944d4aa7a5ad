//! CLI configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via STATEGEN_CONFIG or --config)
//! 3. Environment variables
//! 4. Command-line flags

use serde::{Deserialize, Serialize};
use stategen_core::{GrammarPolicy, GrammarPreset, OutputMode};
use std::path::{Path, PathBuf};

/// Tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grammar options.
    pub grammar: GrammarPolicy,
    /// Output options.
    pub output: OutputConfig,
    /// Input limits.
    pub input: InputConfig,
}

impl Config {
    /// Loads configuration from an optional file, then applies environment overrides.
    ///
    /// The result is not validated; command-line flags may still repair it.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        Ok(config)
    }

    /// Applies environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from an arbitrary key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // The preset replaces the whole policy, so it goes first.
        if let Some(preset) = lookup("STATEGEN_GRAMMAR") {
            if let Ok(preset) = preset.parse::<GrammarPreset>() {
                self.grammar = GrammarPolicy::from_preset(preset);
            }
        }

        if let Some(len) = lookup("STATEGEN_MIN_IDENTIFIER_LENGTH") {
            if let Ok(n) = len.parse() {
                self.grammar.identifier_min_length = n;
            }
        }

        if let Some(charset) = lookup("STATEGEN_DESCRIPTION_CHARSET") {
            if let Ok(charset) = charset.parse() {
                self.grammar.description_charset = charset;
            }
        }

        if let Some(syntax) = lookup("STATEGEN_COMPOSITE_SYNTAX") {
            if let Ok(syntax) = syntax.parse() {
                self.grammar.composite_syntax = syntax;
            }
        }

        if let Some(require) = lookup("STATEGEN_REQUIRE_TRANSITION") {
            self.grammar.require_global_transition = is_truthy(&require);
        }

        self.output.apply_overrides(&lookup);
        self.input.apply_overrides(&lookup);
    }

    /// Validates the combined configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grammar
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output mode for standard output.
    pub mode: OutputMode,
    /// Report diagnostics on standard error.
    pub verbose: bool,
    /// Exit non-zero when any diagnostic was produced.
    pub deny_invalid: bool,
}

impl OutputConfig {
    fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        if let Some(mode) = lookup("STATEGEN_OUTPUT") {
            if let Ok(mode) = mode.parse() {
                self.mode = mode;
            }
        }

        if let Some(verbose) = lookup("STATEGEN_VERBOSE") {
            self.verbose = is_truthy(&verbose);
        }

        if let Some(deny) = lookup("STATEGEN_DENY_INVALID") {
            self.deny_invalid = is_truthy(&deny);
        }
    }
}

/// Input limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Maximum bytes per line (0 = unlimited).
    pub max_line_length: usize,
    /// Maximum number of lines (0 = unlimited).
    pub max_input_lines: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_line_length: 1000,
            max_input_lines: 10_000,
        }
    }
}

impl InputConfig {
    fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        if let Some(max) = lookup("STATEGEN_MAX_LINE_LENGTH") {
            if let Ok(n) = max.parse() {
                self.max_line_length = n;
            }
        }

        if let Some(max) = lookup("STATEGEN_MAX_INPUT_LINES") {
            if let Ok(n) = max.parse() {
                self.max_input_lines = n;
            }
        }
    }
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.to_lowercase() == "true"
}

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    IoError(PathBuf, std::io::Error),
    ParseError(PathBuf, String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, e) => {
                write!(f, "failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::ValidationError(msg) => {
                write!(f, "configuration validation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
