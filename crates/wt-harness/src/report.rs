//! Final summary of a session, as plain text or JSON.

use crate::category::CategoryKind;
use crate::session::{Readiness, ReadinessPolicy, TestResult, TestSession};

use std::fmt;

use serde::Serialize;

const RULE_WIDTH: usize = 60;

/// Borrowed view pairing a session with the readiness policy that grades it.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    session: &'a TestSession,
    policy: ReadinessPolicy,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    total: usize,
    passed: usize,
    failed: usize,
    warnings: usize,
    pass_rate: f64,
    readiness: Readiness,
    interrupted: bool,
    critical_failures: Vec<&'a TestResult>,
    results: &'a [TestResult],
}

impl<'a> Report<'a> {
    pub fn new(session: &'a TestSession, policy: ReadinessPolicy) -> Self {
        Self { session, policy }
    }

    pub fn readiness(&self) -> Readiness {
        self.policy.classify(self.session)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let report = JsonReport {
            total: self.session.total(),
            passed: self.session.passed(),
            failed: self.session.failed(),
            warnings: self.session.warnings().count(),
            pass_rate: self.session.pass_rate(),
            readiness: self.readiness(),
            interrupted: self.session.is_interrupted(),
            critical_failures: self.session.critical_failures().collect(),
            results: self.session.results(),
        };
        serde_json::to_string_pretty(&report)
    }

    fn write_results(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in CategoryKind::ALL {
            let mut in_category = self
                .session
                .results()
                .iter()
                .filter(|r| r.category == kind)
                .peekable();
            if in_category.peek().is_none() {
                continue;
            }

            writeln!(f, "{}", kind.title())?;
            for result in in_category {
                writeln!(
                    f,
                    "  [{}] {}: {}",
                    result.label(),
                    result.name,
                    result.detail
                )?;
            }
        }
        Ok(())
    }

    fn write_section<'r>(
        f: &mut fmt::Formatter<'_>,
        title: &str,
        results: impl Iterator<Item = &'r TestResult>,
    ) -> fmt::Result {
        let mut results = results.peekable();
        if results.peek().is_none() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "{title}:")?;
        for result in results {
            writeln!(
                f,
                "  - [{}] {}: {}",
                result.category, result.name, result.detail
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        let session = self.session;

        writeln!(f, "{rule}")?;
        writeln!(f, "{:^width$}", "TEST SUMMARY", width = RULE_WIDTH)?;
        writeln!(f, "{rule}")?;
        self.write_results(f)?;
        writeln!(f, "{rule}")?;

        if session.is_interrupted() {
            writeln!(f, "Session interrupted; results are partial.")?;
        }
        writeln!(f, "Total Tests: {}", session.total())?;
        writeln!(f, "Passed: {}", session.passed())?;
        writeln!(f, "Failed: {}", session.failed())?;
        writeln!(f, "Warnings: {}", session.warnings().count())?;
        writeln!(f, "Pass Rate: {:.1}%", session.pass_rate())?;

        Self::write_section(f, "Critical failures", session.critical_failures())?;
        Self::write_section(f, "Other failures", session.other_failures())?;
        Self::write_section(f, "Warnings", session.warnings())?;

        writeln!(f)?;
        write!(f, "{}", self.readiness().message())
    }
}
