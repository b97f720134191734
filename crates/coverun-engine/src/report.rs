//! Line-oriented outcome reporting
//!
//! The reporter is a stateless sink over any writer: one line per
//! outcome, plus the batch-level notices. Diagnostics (missing configs,
//! load failures) go through `tracing` instead and never through here.

use crate::outcome::{CheckOutcome, Detail};
use std::io::Write;

/// Formats and emits pass/fail/error lines.
pub struct Reporter {
    out: Box<dyn Write + Send>,
}

impl Reporter {
    /// Reporter writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// Reporter discarding everything it is given.
    #[must_use]
    pub fn null() -> Self {
        Self::new(std::io::sink())
    }

    /// Reporter over an arbitrary writer.
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self { out: Box::new(out) }
    }

    /// Emit one check outcome.
    pub fn outcome(&mut self, outcome: &CheckOutcome) {
        let verdict = if outcome.passed { "passed" } else { "failed" };
        let mut line = format!("Cover {verdict}: {}", outcome.label);

        match &outcome.detail {
            Some(Detail::Expr(text)) => {
                line.push_str(&format!(" {{ {text} }}"));
            }
            Some(Detail::Error(message)) => {
                line.push_str(&format!("\n\terror: {message}"));
            }
            None => {}
        }

        let _ = writeln!(self.out, "{line}");
    }

    /// Notice: the selector matched nothing at all.
    pub fn nothing_applicable(&mut self) {
        let _ = writeln!(
            self.out,
            "No cover functions were run, because nothing applicable could be found."
        );
    }

    /// Notice: no verification namespaces were discovered in any loaded
    /// artifact.
    pub fn no_verification_roots(&mut self) {
        let _ = writeln!(
            self.out,
            "No namespaces were found that begin with the prefix \"Cover\"."
        );
    }

    /// Notice: functions matched but produced zero checks.
    pub fn no_checks_produced(&mut self, functions: usize) {
        let _ = writeln!(
            self.out,
            "Matched {functions} cover function(s), but no checks were produced."
        );
    }

    /// Visual separator between runs.
    pub fn separator(&mut self) {
        let _ = writeln!(self.out, "\n{}\n", "-".repeat(80));
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Reporter(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverun_test_utils::CaptureSink;
    use pretty_assertions::assert_eq;

    #[test]
    fn passed_line_format() {
        let sink = CaptureSink::new();
        let mut reporter = Reporter::new(sink.clone());
        reporter.outcome(&CheckOutcome::verdict("Addition", true));
        assert_eq!(sink.contents(), "Cover passed: Addition\n");
    }

    #[test]
    fn failed_line_with_expression_text() {
        let sink = CaptureSink::new();
        let mut reporter = Reporter::new(sink.clone());
        reporter.outcome(&CheckOutcome {
            label: "Addition".to_string(),
            passed: false,
            detail: Some(Detail::Expr("2 + 2 == 5".to_string())),
        });
        assert_eq!(sink.contents(), "Cover failed: Addition { 2 + 2 == 5 }\n");
    }

    #[test]
    fn error_detail_goes_on_a_continuation_line() {
        let sink = CaptureSink::new();
        let mut reporter = Reporter::new(sink.clone());
        reporter.outcome(&CheckOutcome::error("Broken", &anyhow::anyhow!("boom")));
        assert_eq!(sink.contents(), "Cover failed: Broken\n\terror: boom\n");
    }

    #[test]
    fn batch_notices() {
        let sink = CaptureSink::new();
        let mut reporter = Reporter::new(sink.clone());
        reporter.nothing_applicable();
        reporter.no_checks_produced(2);

        let text = sink.contents();
        assert!(text.contains("nothing applicable could be found"));
        assert!(text.contains("Matched 2 cover function(s)"));
    }
}
