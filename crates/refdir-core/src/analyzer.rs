//! Core analyzer for orchestrating a check over a whole program.

use crate::config::{Config, ConfigError};
use crate::engine::RefDir;
use crate::policy::{Direction, Policy, RefKind};
use crate::program::{AdapterError, Program};
use crate::reporter::{CollectingReporter, Reporter};
use crate::types::LintResult;

use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The program document could not be loaded.
    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Debug, Default)]
pub struct AnalyzerBuilder {
    config: Option<Config>,
    overrides: Vec<(RefKind, Direction)>,
    verbose: Option<bool>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the direction for one kind, on top of the configuration.
    #[must_use]
    pub fn direction(mut self, kind: RefKind, direction: Direction) -> Self {
        self.overrides.push((kind, direction));
        self
    }

    /// Overrides verbose messages.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Builds the analyzer.
    #[must_use]
    pub fn build(self) -> Analyzer {
        let mut config = self.config.unwrap_or_default();
        for (kind, direction) in self.overrides {
            config.directions.set(kind, direction);
        }
        if let Some(verbose) = self.verbose {
            config.verbose = verbose;
        }

        Analyzer {
            engine: RefDir::from_config(&config),
        }
    }
}

/// Runs the engine over every file of a [`Program`].
///
/// Use [`Analyzer::builder()`] to construct an instance.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    engine: RefDir,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// The underlying engine.
    #[must_use]
    pub fn engine(&self) -> &RefDir {
        &self.engine
    }

    /// The policy in force.
    #[must_use]
    pub fn policy(&self) -> &Policy {
        self.engine.policy()
    }

    /// Analyzes all files and returns the sorted findings.
    #[must_use]
    pub fn analyze(&self, program: &Program) -> LintResult {
        let mut collector = CollectingReporter::new();
        let mut result = self.analyze_with(program, &mut collector);
        result.findings = collector.into_findings();
        result.sort();

        let (errors, infos, _) = result.count_by_verdict();
        info!(
            "Analysis complete: {} errors, {} infos in {} files ({} skipped)",
            errors, infos, result.files_checked, result.files_skipped
        );
        result
    }

    /// Analyzes all files, streaming findings to `reporter`.
    ///
    /// The returned result carries file counts only.
    pub fn analyze_with(&self, program: &Program, reporter: &mut dyn Reporter) -> LintResult {
        info!("Starting analysis of {} files", program.files.len());

        let mut result = LintResult::new();
        for file in &program.files {
            self.engine.check_file(file, &program.symbols, reporter);
            if file.generated {
                result.files_skipped += 1;
            } else {
                result.files_checked += 1;
            }
        }
        result
    }

    /// Loads a program document from `path` and analyzes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or validated.
    pub fn analyze_path(&self, path: &Path) -> Result<LintResult, AnalyzerError> {
        let program = Program::from_file(path)?;
        Ok(self.analyze(&program))
    }
}
