//! Cover execution and result interpretation
//!
//! One engine per batch. Matched covers run strictly sequentially in
//! selection order — checks may share mutable environment through their
//! closures, so nothing here is concurrent. Between two checks sharing a
//! verification root, the root's reset hook (when defined) is invoked and
//! awaited to restore a clean environment.
//!
//! The return value of a cover arrives as a [`CheckResult`] and is
//! interpreted in fixed priority order:
//!
//! 1. `Implicit` — running without an error is itself the signal: pass.
//! 2. An invocation error — one failed outcome; the batch continues.
//! 3. `Verdict(bool)` — direct pass/fail.
//! 4. `Single` — the checker's boolean return is the verdict; a checker
//!    error is captured, never propagated.
//! 5. `Many` — one outcome per element, in order, labeled with the same
//!    base name and distinguished by checker expression text.
//! 6. `Stream` — driven to exhaustion, each element awaited before the
//!    next is requested; the only case with suspension inside a check.

use crate::outcome::{CheckOutcome, Detail, RunSummary};
use crate::report::Reporter;
use coverun_registry::{convention, CheckResult, Checker, Cover};
use futures::StreamExt;

/// Runs resolved covers and reports their outcomes.
#[derive(Debug)]
pub struct Engine<'r> {
    reporter: &'r mut Reporter,
}

impl<'r> Engine<'r> {
    /// Engine reporting through `reporter`.
    pub fn new(reporter: &'r mut Reporter) -> Self {
        Self { reporter }
    }

    /// Run a batch of matched covers sequentially, invoking `reset`
    /// between covers (never before the first).
    pub async fn run_batch(
        &mut self,
        matches: &[(String, Cover)],
        reset: Option<&Cover>,
    ) -> RunSummary {
        let mut summary = RunSummary::default();

        for (index, (name, cover)) in matches.iter().enumerate() {
            if index > 0 {
                if let Some(reset) = reset {
                    if let Err(err) = reset.invoke().await {
                        tracing::warn!("reset hook failed: {err:#}");
                    }
                }
            }

            summary.functions += 1;
            for outcome in self.run_one(name, cover).await {
                summary.record(&outcome);
            }
        }

        summary
    }

    /// Invoke one cover and interpret its result, reporting each outcome
    /// as it is produced.
    pub async fn run_one(&mut self, name: &str, cover: &Cover) -> Vec<CheckOutcome> {
        let label = convention::display_label(name);
        let mut outcomes = Vec::new();

        match cover.invoke().await {
            Err(err) => {
                self.emit(CheckOutcome::error(label, &err), &mut outcomes);
            }
            Ok(CheckResult::Implicit) => {
                self.emit(CheckOutcome::implicit_pass(label), &mut outcomes);
            }
            Ok(CheckResult::Verdict(passed)) => {
                self.emit(CheckOutcome::verdict(label, passed), &mut outcomes);
            }
            Ok(CheckResult::Single(checker)) => {
                let outcome = eval_checker(label, checker).await;
                self.emit(outcome, &mut outcomes);
            }
            Ok(CheckResult::Many(sequence)) => {
                for checker in sequence {
                    let outcome = eval_checker(label, checker).await;
                    self.emit(outcome, &mut outcomes);
                }
            }
            Ok(CheckResult::Stream(mut stream)) => {
                while let Some(checker) = stream.next().await {
                    let outcome = eval_checker(label, checker).await;
                    self.emit(outcome, &mut outcomes);
                }
            }
        }

        outcomes
    }

    fn emit(&mut self, outcome: CheckOutcome, outcomes: &mut Vec<CheckOutcome>) {
        self.reporter.outcome(&outcome);
        outcomes.push(outcome);
    }
}

/// Evaluate one checker, capturing its error instead of propagating.
async fn eval_checker(label: &str, checker: Checker) -> CheckOutcome {
    let text = checker.text().map(str::to_owned);

    match checker.eval().await {
        Ok(passed) => CheckOutcome {
            label: label.to_owned(),
            passed,
            detail: text.map(Detail::Expr),
        },
        Err(err) => {
            let message = match text {
                Some(text) => format!("checker {{ {text} }} failed with an error: {err:#}"),
                None => format!("{err:#}"),
            };
            CheckOutcome {
                label: label.to_owned(),
                passed: false,
                detail: Some(Detail::Error(message)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverun_registry::{checker, CheckerStream};
    use coverun_test_utils::EventLog;
    use futures::stream;
    use pretty_assertions::assert_eq;

    fn engine_reporter() -> Reporter {
        Reporter::null()
    }

    #[tokio::test]
    async fn implicit_result_passes() {
        let mut reporter = engine_reporter();
        let mut engine = Engine::new(&mut reporter);
        let cover = Cover::new(|| Ok(CheckResult::Implicit));

        let outcomes = engine.run_one("coverNothing", &cover).await;
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].passed);
        assert_eq!(outcomes[0].label, "Nothing");
    }

    #[tokio::test]
    async fn false_verdict_fails() {
        let mut reporter = engine_reporter();
        let mut engine = Engine::new(&mut reporter);
        let cover = Cover::new(|| Ok(CheckResult::Verdict(false)));

        let outcomes = engine.run_one("coverBad", &cover).await;
        assert!(!outcomes[0].passed);
    }

    #[tokio::test]
    async fn single_checker_produces_one_outcome() {
        let mut reporter = engine_reporter();
        let mut engine = Engine::new(&mut reporter);
        let cover = Cover::new(|| Ok(CheckResult::from(checker!(2 + 2 == 4))));

        let outcomes = engine.run_one("coverAddition", &cover).await;
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].passed);
        assert_eq!(
            outcomes[0].detail,
            Some(Detail::Expr("2 + 2 == 4".to_string()))
        );
    }

    #[tokio::test]
    async fn checker_sequence_produces_ordered_outcomes() {
        let mut reporter = engine_reporter();
        let mut engine = Engine::new(&mut reporter);
        let cover = Cover::new(|| Ok(CheckResult::from(vec![checker!(true), checker!(false)])));

        let outcomes = engine.run_one("coverPair", &cover).await;
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].passed);
        assert!(!outcomes[1].passed);
        assert_eq!(outcomes[0].label, "Pair");
        assert_eq!(outcomes[1].label, "Pair");
    }

    #[tokio::test]
    async fn async_stream_is_driven_strictly_in_order() {
        let events = EventLog::new();
        let (first, second) = (events.clone(), events.clone());

        let cover = Cover::new_async(move || {
            let (first, second) = (first.clone(), second.clone());
            async move {
                let s: CheckerStream = stream::iter(vec![
                    Checker::future(async move {
                        first.push("first");
                        Ok(true)
                    }),
                    Checker::future(async move {
                        second.push("second");
                        Ok(false)
                    }),
                ])
                .boxed();
                Ok(CheckResult::Stream(s))
            }
        });

        let mut reporter = engine_reporter();
        let mut engine = Engine::new(&mut reporter);
        let outcomes = engine.run_one("coverStream", &cover).await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].passed);
        assert!(!outcomes[1].passed);
        assert_eq!(events.snapshot(), ["first", "second"]);
    }

    #[tokio::test]
    async fn thrown_error_is_isolated_to_one_outcome() {
        let mut reporter = engine_reporter();
        let mut engine = Engine::new(&mut reporter);

        let batch = vec![
            (
                "coverBroken".to_string(),
                Cover::new(|| anyhow::bail!("environment exploded")),
            ),
            (
                "coverFine".to_string(),
                Cover::new(|| Ok(CheckResult::Verdict(true))),
            ),
        ];

        let summary = engine.run_batch(&batch, None).await;
        assert_eq!(summary.functions, 2);
        assert_eq!(summary.checks, 2);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
    }

    #[tokio::test]
    async fn checker_error_does_not_propagate() {
        let mut reporter = engine_reporter();
        let mut engine = Engine::new(&mut reporter);
        let cover = Cover::new(|| {
            Ok(CheckResult::from(vec![
                Checker::with_text("explode()", || anyhow::bail!("boom")),
                checker!(true),
            ]))
        });

        let outcomes = engine.run_one("coverMixed", &cover).await;
        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].passed);
        assert!(matches!(outcomes[0].detail, Some(Detail::Error(_))));
        assert!(outcomes[1].passed);
    }

    #[tokio::test]
    async fn reset_runs_between_checks_but_not_before_the_first() {
        let events = EventLog::new();

        let reset_events = events.clone();
        let reset = Cover::new(move || {
            reset_events.push("reset");
            Ok(CheckResult::Implicit)
        });

        let a_events = events.clone();
        let b_events = events.clone();
        let batch = vec![
            (
                "coverA".to_string(),
                Cover::new(move || {
                    a_events.push("A");
                    Ok(CheckResult::Implicit)
                }),
            ),
            (
                "coverB".to_string(),
                Cover::new(move || {
                    b_events.push("B");
                    Ok(CheckResult::Implicit)
                }),
            ),
        ];

        let mut reporter = engine_reporter();
        let mut engine = Engine::new(&mut reporter);
        let summary = engine.run_batch(&batch, Some(&reset)).await;

        assert_eq!(summary.checks, 2);
        assert_eq!(events.snapshot(), ["A", "reset", "B"]);
    }

    #[tokio::test]
    async fn failing_reset_does_not_abort_the_batch() {
        let reset = Cover::new(|| anyhow::bail!("reset broke"));
        let batch = vec![
            ("coverA".to_string(), Cover::new(|| Ok(CheckResult::Verdict(true)))),
            ("coverB".to_string(), Cover::new(|| Ok(CheckResult::Verdict(true)))),
        ];

        let mut reporter = engine_reporter();
        let mut engine = Engine::new(&mut reporter);
        let summary = engine.run_batch(&batch, Some(&reset)).await;
        assert_eq!(summary.passed, 2);
    }
}
