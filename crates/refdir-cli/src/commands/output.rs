//! Shared output formatting for lint results.

use anyhow::Result;
use miette::{GraphicalReportHandler, GraphicalTheme};
use refdir_core::reporter::{render, Reporter, SortedReporter, VerbosityFilter, WriterReporter};
use refdir_core::{Config, Finding, FindingDiagnostic, LintResult, Verdict};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::OutputFormat;

/// Source text per file, for the pretty format.
pub type Sources = HashMap<PathBuf, String>;

/// Print lint results in the specified format.
pub fn print(
    result: &LintResult,
    format: OutputFormat,
    config: &Config,
    sources: &Sources,
) -> Result<()> {
    let stdout = io::stdout();
    let out = stdout.lock();
    match format {
        OutputFormat::Text => write_text(out, result, config.verbose, config.color)?,
        OutputFormat::Json => write_json(out, result)?,
        OutputFormat::Compact => write_compact(out, result, config.verbose)?,
        OutputFormat::Pretty => write_pretty(out, result, config, sources)?,
    }
    Ok(())
}

fn visible(finding: &Finding, verbose: bool) -> bool {
    verbose || finding.verdict == Verdict::Error
}

fn write_text<W: Write>(out: W, result: &LintResult, verbose: bool, color: bool) -> io::Result<()> {
    let mut reporter =
        SortedReporter::new(VerbosityFilter::new(WriterReporter::new(out, color), verbose));
    for finding in &result.findings {
        reporter.report(finding.clone());
    }
    reporter.flush()?;

    let mut out = reporter.into_inner().into_inner().into_inner();
    let (errors, infos, oks) = result.count_by_verdict();
    let summary = format!(
        "Found {errors} error(s), {infos} info(s), {oks} ok in {} file(s)",
        result.files_checked
    );
    if color {
        let summary_color = if errors > 0 { "\x1b[31m" } else { "\x1b[32m" };
        writeln!(out, "{summary_color}{summary}\x1b[0m")
    } else {
        writeln!(out, "{summary}")
    }
}

fn write_json<W: Write>(mut out: W, result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    writeln!(out, "{json}")?;
    Ok(())
}

fn write_compact<W: Write>(mut out: W, result: &LintResult, verbose: bool) -> io::Result<()> {
    for finding in result.findings.iter().filter(|f| visible(f, verbose)) {
        let kind = finding.kind.map_or("-", |k| k.as_str());
        writeln!(
            out,
            "{}: {} [{}] {}",
            finding.location, finding.verdict, kind, finding.message
        )?;
    }
    Ok(())
}

fn write_pretty<W: Write>(
    mut out: W,
    result: &LintResult,
    config: &Config,
    sources: &Sources,
) -> Result<()> {
    let theme = if config.color {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let handler = GraphicalReportHandler::new_themed(theme);

    for finding in result.findings.iter().filter(|f| visible(f, config.verbose)) {
        match sources.get(&finding.location.file) {
            Some(text) => {
                let diagnostic = FindingDiagnostic::new(finding, text);
                let mut rendered = String::new();
                handler
                    .render_report(&mut rendered, &diagnostic)
                    .map_err(|_| anyhow::anyhow!("Failed to render {}", finding.location))?;
                writeln!(out, "{rendered}")?;
            }
            None => writeln!(out, "{}", render(finding, config.color))?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use refdir_core::{Location, RefKind};

    fn sample() -> LintResult {
        let mut result = LintResult::new();
        result.files_checked = 1;
        result.findings = vec![
            Finding::error(
                Location::new("main.go", 3, 2).with_length(7),
                "func reference MutualA is after definition",
            )
            .with_kind(RefKind::Func),
            Finding::info(Location::new("main.go", 4, 9), "skipping builtin len"),
        ];
        result
    }

    fn to_string(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn text_hides_non_errors_unless_verbose() {
        let mut quiet = Vec::new();
        write_text(&mut quiet, &sample(), false, false).unwrap();
        assert_eq!(
            to_string(quiet),
            "main.go:3:2: error: func reference MutualA is after definition\n\
             Found 1 error(s), 1 info(s), 0 ok in 1 file(s)\n"
        );

        let mut loud = Vec::new();
        write_text(&mut loud, &sample(), true, false).unwrap();
        assert!(to_string(loud).contains("main.go:4:9: info: skipping builtin len"));
    }

    #[test]
    fn text_lists_findings_in_position_order() {
        let mut result = sample();
        result.findings.push(Finding::error(
            Location::new("a.go", 9, 1),
            "var reference total is before definition",
        ));
        result.findings.push(Finding::error(
            Location::new("main.go", 1, 5),
            "const reference Limit is before definition",
        ));

        let mut buf = Vec::new();
        write_text(&mut buf, &result, false, false).unwrap();
        let out = to_string(buf);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[..3],
            [
                "a.go:9:1: error: var reference total is before definition",
                "main.go:1:5: error: const reference Limit is before definition",
                "main.go:3:2: error: func reference MutualA is after definition",
            ]
        );
    }

    #[test]
    fn text_colors_verdicts() {
        let mut buf = Vec::new();
        write_text(&mut buf, &sample(), false, true).unwrap();
        let out = to_string(buf);
        assert!(out.contains("\x1b[31merror\x1b[0m"));
        assert!(out.ends_with("\x1b[0m\n"));
    }

    #[test]
    fn compact_names_the_kind() {
        let mut buf = Vec::new();
        write_compact(&mut buf, &sample(), true).unwrap();
        assert_eq!(
            to_string(buf),
            "main.go:3:2: error [func] func reference MutualA is after definition\n\
             main.go:4:9: info [-] skipping builtin len\n"
        );
    }

    #[test]
    fn json_round_trips_counts() {
        let mut buf = Vec::new();
        write_json(&mut buf, &sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["files_checked"], 1);
        assert_eq!(value["findings"][0]["verdict"], "error");
        assert_eq!(value["findings"][0]["kind"], "func");
    }

    #[test]
    fn pretty_falls_back_to_plain_line_without_source() {
        let config = Config {
            color: false,
            ..Config::default()
        };
        let mut sources = Sources::new();
        let mut buf = Vec::new();
        write_pretty(&mut buf, &sample(), &config, &sources).unwrap();
        assert_eq!(
            to_string(buf),
            "main.go:3:2: error: func reference MutualA is after definition\n"
        );

        sources.insert(
            PathBuf::from("main.go"),
            "package main\n\nfunc b() { MutualA() }\n".to_string(),
        );
        let mut buf = Vec::new();
        write_pretty(&mut buf, &sample(), &config, &sources).unwrap();
        let out = to_string(buf);
        assert!(out.contains("[error] func reference MutualA is after definition"));
        assert!(out.contains("func reference"));
    }
}
