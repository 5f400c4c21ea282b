//! Core types for findings and results.

use crate::policy::RefKind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of examining one reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Reference sits on the configured side of its declaration.
    Ok,
    /// Reference was not checked; the message says why.
    Info,
    /// Reference sits on the wrong side of its declaration.
    Error,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Info => write!(f, "info"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path as reported by the front-end.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Length of the span in bytes (for miette integration).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub length: usize,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde skip_serializing_if signature
fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            length: 0,
        }
    }

    /// Sets the span length for this location.
    #[must_use]
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// A single verdict event emitted for a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Verdict for this reference.
    pub verdict: Verdict,
    /// Reference kind, when the reference got as far as classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<RefKind>,
    /// Position of the reference.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
}

impl Finding {
    /// Creates a new finding.
    #[must_use]
    pub fn new(verdict: Verdict, location: Location, message: impl Into<String>) -> Self {
        Self {
            verdict,
            kind: None,
            location,
            message: message.into(),
        }
    }

    /// Creates an [`Verdict::Ok`] finding.
    #[must_use]
    pub fn ok(location: Location, message: impl Into<String>) -> Self {
        Self::new(Verdict::Ok, location, message)
    }

    /// Creates an [`Verdict::Info`] finding.
    #[must_use]
    pub fn info(location: Location, message: impl Into<String>) -> Self {
        Self::new(Verdict::Info, location, message)
    }

    /// Creates an [`Verdict::Error`] finding.
    #[must_use]
    pub fn error(location: Location, message: impl Into<String>) -> Self {
        Self::new(Verdict::Error, location, message)
    }

    /// Tags the finding with the reference kind it was checked as.
    #[must_use]
    pub fn with_kind(mut self, kind: RefKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.verdict, self.message)
    }
}

/// A finding paired with its source text, for rich rendering through miette.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct FindingDiagnostic {
    message: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
    #[help]
    help: Option<String>,
}

impl FindingDiagnostic {
    /// Builds a diagnostic for `finding` against the full text of its file.
    #[must_use]
    pub fn new(finding: &Finding, source: &str) -> Self {
        let offset = crate::context::offset_in(source, finding.location.line, finding.location.column);
        let label_message = match finding.kind {
            Some(kind) => format!("{kind} reference"),
            None => finding.verdict.to_string(),
        };
        let help = (finding.verdict == Verdict::Error).then(|| {
            "move the declaration or the reference, or change the direction for this kind"
                .to_string()
        });
        Self {
            message: format!("[{}] {}", finding.verdict, finding.message),
            source_code: NamedSource::new(
                finding.location.file.display().to_string(),
                source.to_string(),
            ),
            span: SourceSpan::from((offset, finding.location.length)),
            label_message,
            help,
        }
    }
}

/// Result of running an analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All findings, in emission order until [`LintResult::sort`] is called.
    pub findings: Vec<Finding>,
    /// Number of files traversed.
    pub files_checked: usize,
    /// Number of files skipped as generated.
    pub files_skipped: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any ordering violations.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.verdict == Verdict::Error)
    }

    /// Returns findings filtered by verdict.
    #[must_use]
    pub fn by_verdict(&self, verdict: Verdict) -> Vec<&Finding> {
        self.findings
            .iter()
            .filter(|f| f.verdict == verdict)
            .collect()
    }

    /// Counts findings as `(errors, infos, oks)`.
    #[must_use]
    pub fn count_by_verdict(&self) -> (usize, usize, usize) {
        self.findings
            .iter()
            .fold((0, 0, 0), |(e, i, o), f| match f.verdict {
                Verdict::Error => (e + 1, i, o),
                Verdict::Info => (e, i + 1, o),
                Verdict::Ok => (e, i, o + 1),
            })
    }

    /// Sorts findings by file, then line, then column.
    pub fn sort(&mut self) {
        self.findings.sort_by(|a, b| a.location.cmp(&b.location));
    }

    /// Adds findings from another result.
    pub fn extend(&mut self, other: Self) {
        self.findings.extend(other.findings);
        self.files_checked += other.files_checked;
        self.files_skipped += other.files_skipped;
    }
}
