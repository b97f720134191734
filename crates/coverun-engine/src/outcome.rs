//! Check outcomes and run summaries

/// Supplementary text attached to an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    /// Literal expression text of the checker that produced the verdict.
    Expr(String),

    /// Message of an error captured during invocation.
    Error(String),
}

/// The result of exactly one resolved check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Display name, convention prefix stripped.
    pub label: String,

    /// Whether the check passed.
    pub passed: bool,

    /// Present for dynamically generated checkers and captured errors.
    pub detail: Option<Detail>,
}

impl CheckOutcome {
    /// Outcome of a check that completed without returning a verdict.
    #[must_use]
    pub fn implicit_pass(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            passed: true,
            detail: None,
        }
    }

    /// Outcome carrying a direct boolean verdict.
    #[must_use]
    pub fn verdict(label: impl Into<String>, passed: bool) -> Self {
        Self {
            label: label.into(),
            passed,
            detail: None,
        }
    }

    /// Failed outcome capturing an invocation error.
    #[must_use]
    pub fn error(label: impl Into<String>, err: &anyhow::Error) -> Self {
        Self {
            label: label.into(),
            passed: false,
            detail: Some(Detail::Error(format!("{err:#}"))),
        }
    }
}

/// Aggregated counters for one run request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cover functions invoked.
    pub functions: usize,

    /// Check outcomes produced.
    pub checks: usize,

    /// Outcomes that passed.
    pub passed: usize,

    /// Outcomes that failed.
    pub failed: usize,
}

impl RunSummary {
    /// Record one outcome.
    pub fn record(&mut self, outcome: &CheckOutcome) {
        self.checks += 1;
        if outcome.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Fold another summary into this one.
    pub fn absorb(&mut self, other: Self) {
        self.functions += other.functions;
        self.checks += other.checks;
        self.passed += other.passed;
        self.failed += other.failed;
    }

    /// Whether at least one check ran and none failed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.checks > 0 && self.failed == 0
    }
}
