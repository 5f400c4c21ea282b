//! Reporting contract the engine emits findings against.
//!
//! The engine only knows [`Reporter`]. Presentation concerns are decorators
//! stacked in front of a base reporter:
//!
//! ```text
//! engine → SortedReporter → VerbosityFilter → WriterReporter(stdout)
//! ```

use crate::types::{Finding, Verdict};
use std::io::{self, Write};

/// Accepts finding events.
pub trait Reporter {
    /// Receives one finding.
    fn report(&mut self, finding: Finding);

    /// Flushes buffered findings downstream.
    ///
    /// # Errors
    ///
    /// Returns the first IO error hit while writing.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, finding: Finding) {
        (**self).report(finding);
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report(&mut self, finding: Finding) {
        (**self).report(finding);
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Keeps every finding in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    findings: Vec<Finding>,
}

impl CollectingReporter {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Findings collected so far.
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Consumes the collector.
    #[must_use]
    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, finding: Finding) {
        self.findings.push(finding);
    }
}

/// Buffers findings and forwards them sorted by position on flush.
#[derive(Debug)]
pub struct SortedReporter<R> {
    inner: R,
    buffer: Vec<Finding>,
}

impl<R: Reporter> SortedReporter<R> {
    /// Wraps `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }

    /// Unwraps the inner reporter.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Reporter> Reporter for SortedReporter<R> {
    fn report(&mut self, finding: Finding) {
        self.buffer.push(finding);
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut buffer = std::mem::take(&mut self.buffer);
        buffer.sort_by(|a, b| a.location.cmp(&b.location));
        for finding in buffer {
            self.inner.report(finding);
        }
        self.inner.flush()
    }
}

/// Drops everything except errors unless verbose.
#[derive(Debug)]
pub struct VerbosityFilter<R> {
    inner: R,
    verbose: bool,
}

impl<R: Reporter> VerbosityFilter<R> {
    /// Wraps `inner`.
    pub fn new(inner: R, verbose: bool) -> Self {
        Self { inner, verbose }
    }

    /// Unwraps the inner reporter.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Reporter> Reporter for VerbosityFilter<R> {
    fn report(&mut self, finding: Finding) {
        if self.verbose || finding.verdict == Verdict::Error {
            self.inner.report(finding);
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

const RED: &str = "\x1b[31m";
const GRAY: &str = "\x1b[90m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Renders one finding as a single line, optionally colorized by verdict.
#[must_use]
pub fn render(finding: &Finding, color: bool) -> String {
    if !color {
        return finding.to_string();
    }
    let paint = match finding.verdict {
        Verdict::Error => RED,
        Verdict::Info => GRAY,
        Verdict::Ok => GREEN,
    };
    format!(
        "{}: {paint}{}{RESET}: {}",
        finding.location, finding.verdict, finding.message
    )
}

/// Writes each finding as a line to an [`io::Write`].
#[derive(Debug)]
pub struct WriterReporter<W> {
    out: W,
    color: bool,
    error: Option<io::Error>,
}

impl<W: Write> WriterReporter<W> {
    /// Creates a writer reporter.
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            error: None,
        }
    }

    /// Unwraps the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for WriterReporter<W> {
    fn report(&mut self, finding: Finding) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", render(&finding, self.color)) {
            self.error = Some(e);
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()
    }
}
