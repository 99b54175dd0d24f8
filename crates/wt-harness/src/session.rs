use crate::category::CategoryKind;
use crate::predicate::Verdict;

use serde::Serialize;
use wt_config::ReportConfig;

/// Outcome of one executed check. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub category: CategoryKind,
    pub name: String,
    pub passed: bool,
    pub warning: bool,
    pub critical: bool,
    pub detail: String,
}

impl TestResult {
    pub fn from_verdict(
        category: CategoryKind,
        name: &str,
        critical: bool,
        verdict: Verdict,
    ) -> Self {
        Self {
            category,
            name: name.to_string(),
            passed: verdict.passed,
            warning: verdict.warning && !verdict.passed,
            critical,
            detail: verdict.detail,
        }
    }

    pub fn failed(category: CategoryKind, name: &str, critical: bool, detail: String) -> Self {
        Self::from_verdict(category, name, critical, Verdict::fail(detail))
    }

    /// Failed without being a warning
    pub fn is_hard_failure(&self) -> bool {
        !self.passed && !self.warning
    }

    pub fn label(&self) -> &'static str {
        match (self.passed, self.warning) {
            (true, _) => "PASS",
            (false, true) => "WARN",
            (false, false) => "FAIL",
        }
    }
}

/// Accumulates results in arrival order.
#[derive(Debug, Default)]
pub struct SessionBuilder {
    results: Vec<TestResult>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: TestResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn finish(self, interrupted: bool) -> TestSession {
        TestSession {
            results: self.results,
            interrupted,
        }
    }
}

impl Extend<TestResult> for SessionBuilder {
    fn extend<I: IntoIterator<Item = TestResult>>(&mut self, iter: I) {
        self.results.extend(iter);
    }
}

impl FromIterator<TestResult> for TestSession {
    fn from_iter<I: IntoIterator<Item = TestResult>>(iter: I) -> Self {
        let mut builder = SessionBuilder::new();
        builder.extend(iter);
        builder.finish(false)
    }
}

/// Read-only view of a completed (or interrupted) run.
#[derive(Debug, Clone, Serialize)]
pub struct TestSession {
    results: Vec<TestResult>,
    interrupted: bool,
}

impl TestSession {
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Hard failures only; warnings are counted separately
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_hard_failure()).count()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| r.warning)
    }

    pub fn critical_failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results
            .iter()
            .filter(|r| r.critical && r.is_hard_failure())
    }

    pub fn other_failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results
            .iter()
            .filter(|r| !r.critical && r.is_hard_failure())
    }

    /// Percentage of passed checks; 0 for an empty session.
    pub fn pass_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.passed() as f64 / self.total() as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    Ready,
    NeedsAttention,
    CriticalIssues,
}

impl Readiness {
    pub fn message(self) -> &'static str {
        match self {
            Self::Ready => "EXCELLENT - Server is ready for evaluation",
            Self::NeedsAttention => "GOOD - Minor issues to address",
            Self::CriticalIssues => "NEEDS WORK - Critical issues found",
        }
    }
}

/// Pass-rate thresholds for the readiness tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadinessPolicy {
    ready: f64,
    attention: f64,
}

impl ReadinessPolicy {
    pub fn new(ready: f64, attention: f64) -> Self {
        Self { ready, attention }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.ready_pass_rate, config.attention_pass_rate)
    }

    pub fn classify(&self, session: &TestSession) -> Readiness {
        let rate = session.pass_rate();
        if session.total() > 0 && rate >= self.ready {
            Readiness::Ready
        } else if session.total() > 0 && rate >= self.attention {
            Readiness::NeedsAttention
        } else {
            Readiness::CriticalIssues
        }
    }
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self::from_config(&ReportConfig::default())
    }
}
