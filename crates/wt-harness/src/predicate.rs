//! Stateless evaluators of an HTTP exchange, composed with AND.

use crate::client::HttpExchange;

use std::fmt::Debug;

use serde::Serialize;

/// Outcome of evaluating a check: pass/fail plus what was observed.
///
/// A warning is neither a pass nor a hard failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub passed: bool,
    pub warning: bool,
    pub detail: String,
}

impl Verdict {
    pub fn pass(detail: impl Into<String>) -> Self {
        Self {
            passed: true,
            warning: false,
            detail: detail.into(),
        }
    }

    pub fn fail(detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            warning: false,
            detail: detail.into(),
        }
    }

    pub fn warn(detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            warning: true,
            detail: detail.into(),
        }
    }

    /// Logical AND; details are joined in evaluation order.
    pub fn and(self, other: Verdict) -> Verdict {
        let detail = match (self.detail.is_empty(), other.detail.is_empty()) {
            (true, _) => other.detail,
            (_, true) => self.detail,
            _ => format!("{}, {}", self.detail, other.detail),
        };
        Verdict {
            passed: self.passed && other.passed,
            warning: self.warning || other.warning,
            detail,
        }
    }
}

pub trait ResponsePredicate: Debug + Send + Sync {
    fn evaluate(&self, exchange: &HttpExchange) -> Verdict;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusIs(pub u16);

impl ResponsePredicate for StatusIs {
    fn evaluate(&self, exchange: &HttpExchange) -> Verdict {
        if exchange.status == self.0 {
            Verdict::pass(format!("Status: {}", exchange.status))
        } else {
            Verdict::fail(format!(
                "Status: {} (expected {})",
                exchange.status, self.0
            ))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyContains(pub String);

impl BodyContains {
    pub fn new(needle: impl Into<String>) -> Self {
        Self(needle.into())
    }
}

impl ResponsePredicate for BodyContains {
    fn evaluate(&self, exchange: &HttpExchange) -> Verdict {
        if exchange.body_text().contains(self.0.as_str()) {
            Verdict::pass(format!("body contains '{}'", self.0))
        } else {
            Verdict::fail(format!("body missing '{}'", self.0))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyExcludes(pub String);

impl BodyExcludes {
    pub fn new(needle: impl Into<String>) -> Self {
        Self(needle.into())
    }
}

impl ResponsePredicate for BodyExcludes {
    fn evaluate(&self, exchange: &HttpExchange) -> Verdict {
        if exchange.body_text().contains(self.0.as_str()) {
            Verdict::fail(format!("body contains forbidden '{}'", self.0))
        } else {
            Verdict::pass(format!("body free of '{}'", self.0))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLenAtLeast(pub usize);

impl ResponsePredicate for BodyLenAtLeast {
    fn evaluate(&self, exchange: &HttpExchange) -> Verdict {
        let len = exchange.body.len();
        if len >= self.0 {
            Verdict::pass(format!("Size: {len} bytes"))
        } else {
            Verdict::fail(format!("Size: {len} bytes (expected at least {})", self.0))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPresent(pub String);

impl HeaderPresent {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl ResponsePredicate for HeaderPresent {
    fn evaluate(&self, exchange: &HttpExchange) -> Verdict {
        match exchange.header(&self.0) {
            Some(_) => Verdict::pass(format!("header '{}' present", self.0)),
            None => Verdict::fail(format!("header '{}' missing", self.0)),
        }
    }
}

/// Any response at all, whatever the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Responded;

impl ResponsePredicate for Responded {
    fn evaluate(&self, exchange: &HttpExchange) -> Verdict {
        Verdict::pass(format!("Server responsive (status {})", exchange.status))
    }
}

/// Conjunction of predicates. Every member is evaluated so the detail
/// lists each observation.
#[derive(Debug, Default)]
pub struct AllOf(Vec<Box<dyn ResponsePredicate>>);

impl AllOf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(code: u16) -> Self {
        Self::new().and(StatusIs(code))
    }

    pub fn and(mut self, predicate: impl ResponsePredicate + 'static) -> Self {
        self.0.push(Box::new(predicate));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ResponsePredicate for AllOf {
    fn evaluate(&self, exchange: &HttpExchange) -> Verdict {
        self.0
            .iter()
            .map(|p| p.evaluate(exchange))
            .reduce(Verdict::and)
            .unwrap_or_else(|| Verdict::pass(format!("Status: {}", exchange.status)))
    }
}
