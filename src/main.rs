//! stategen - State transition definition validator
//!
//! Reads a state diagram description, classifies every line, and emits the
//! valid transitions as CSV, annotated text, or JSON lines.

mod config;
mod input;
mod output;

use clap::Parser as ClapParser;
use colored::Colorize;
use config::Config;
use output::StderrSink;
use stategen_core::{
    CompositeSyntax, DescriptionCharset, DiagnosticSink, Formatter, GrammarPolicy, GrammarPreset,
    NullSink, OutputMode, Parser,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "stategen")]
#[command(about = "Validate state transition definitions and emit them as CSV")]
#[command(version)]
struct Cli {
    /// Input file (reads standard input when omitted)
    file: Option<PathBuf>,

    /// Report invalid lines and structural errors on standard error
    #[arg(short, long)]
    verbose: bool,

    /// Output mode: csv, text, or json
    #[arg(short, long)]
    output: Option<OutputMode>,

    /// Grammar preset: permissive or strict
    #[arg(short, long)]
    grammar: Option<GrammarPreset>,

    /// Minimum identifier length
    #[arg(long)]
    min_identifier_length: Option<usize>,

    /// Restrict transition descriptions to a safe character set
    #[arg(long)]
    restricted_descriptions: bool,

    /// Require composite states to be named (`state NAME {`)
    #[arg(long)]
    named_states: bool,

    /// Reject input that holds no valid transition at all
    #[arg(long)]
    require_transition: bool,

    /// Exit with an error when any invalid definition was found
    #[arg(long)]
    deny_invalid: bool,

    /// Path to a YAML config file
    #[arg(short, long, env = "STATEGEN_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Applies command-line flags on top of the loaded configuration.
    fn apply(&self, config: &mut Config) {
        if let Some(preset) = self.grammar {
            config.grammar = GrammarPolicy::from_preset(preset);
        }
        if let Some(len) = self.min_identifier_length {
            config.grammar.identifier_min_length = len;
        }
        if self.restricted_descriptions {
            config.grammar.description_charset = DescriptionCharset::Restricted;
        }
        if self.named_states {
            config.grammar.composite_syntax = CompositeSyntax::Named;
        }
        if self.require_transition {
            config.grammar.require_global_transition = true;
        }

        if let Some(mode) = self.output {
            config.output.mode = mode;
        }
        if self.verbose {
            config.output.verbose = true;
        }
        if self.deny_invalid {
            config.output.deny_invalid = true;
        }
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", "Error".red(), message);
    std::process::exit(1);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).unwrap_or_else(|e| fail(e));
    cli.apply(&mut config);
    if let Err(e) = config.validate() {
        fail(e);
    }
    if let Some(path) = &cli.config {
        tracing::debug!("Loaded config from {}", path.display());
    }

    let lines = input::open(cli.file.as_deref())
        .and_then(|reader| input::read_lines(reader, &config.input))
        .unwrap_or_else(|e| fail(e));

    let parser = Parser::new(config.grammar.clone()).unwrap_or_else(|e| fail(e));

    // Text mode already prints diagnostics inline on stdout.
    let mut stderr_sink = StderrSink;
    let mut null_sink = NullSink;
    let sink: &mut dyn DiagnosticSink =
        if config.output.verbose && config.output.mode != OutputMode::Text {
            &mut stderr_sink
        } else {
            &mut null_sink
        };

    let report = parser.parse_with_sink(&lines, sink);

    let formatter = Formatter::new(config.output.mode);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    output::write_report(&mut out, &formatter, &report)?;

    let diagnostics = report.diagnostics().count();
    tracing::info!(
        valid = report.valid_count(),
        invalid = report.invalid_count(),
        errors = report.error_count(),
        "processed {} lines",
        lines.len()
    );

    if config.output.deny_invalid && diagnostics > 0 {
        fail(format!("found {} invalid state definitions", diagnostics));
    }

    Ok(())
}
