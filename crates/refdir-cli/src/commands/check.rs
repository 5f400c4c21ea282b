//! Check command implementation.

use anyhow::{Context, Result};
use refdir_core::{Analyzer, Direction, LintResult, Program, RefKind};
use std::path::{Path, PathBuf};

use super::output::Sources;
use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Options collected from the command line.
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Per-kind directions given as flags.
    pub overrides: Vec<(RefKind, Direction)>,
    /// `--verbose` was given.
    pub verbose: bool,
    /// `--no-color` was given.
    pub no_color: bool,
}

/// Runs the check command.
pub fn run(programs: &[PathBuf], options: &CheckOptions, source: &ConfigSource) -> Result<()> {
    let mut config = super::load_config(source)?;
    if options.verbose {
        config.verbose = true;
    }
    if options.no_color {
        config.color = false;
    }

    let mut builder = Analyzer::builder().config(config.clone());
    for &(kind, direction) in &options.overrides {
        builder = builder.direction(kind, direction);
    }
    let analyzer = builder.build();

    let mut result = LintResult::new();
    let mut sources = Sources::new();
    for path in programs {
        let program = Program::from_file(path)
            .with_context(|| format!("Failed to load program: {}", path.display()))?;
        result.extend(analyzer.analyze(&program));
        collect_sources(&program, &mut sources);
    }
    result.sort();

    super::output::print(&result, options.format, &config, &sources)?;

    // Exit with error code if there are errors
    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Records each file's text for rich output, reading from disk when the
/// document does not embed it.
fn collect_sources(program: &Program, sources: &mut Sources) {
    for file in &program.files {
        if sources.contains_key(&file.path) {
            continue;
        }
        let text = file
            .source
            .clone()
            .or_else(|| read_source(&file.path));
        if let Some(text) = text {
            sources.insert(file.path.clone(), text);
        }
    }
}

fn read_source(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::debug!("No source text for {}: {}", path.display(), e);
            None
        }
    }
}
