mod report;

use crate::category::CategoryKind;
use crate::client::HttpExchange;
use crate::session::TestResult;

pub(crate) fn exchange(status: u16, body: &str) -> HttpExchange {
    HttpExchange {
        status,
        headers: vec![(String::from("Content-Type"), String::from("text/html"))],
        body: body.as_bytes().to_vec(),
    }
}

pub(crate) fn result(passed: bool, critical: bool) -> TestResult {
    TestResult {
        category: CategoryKind::Protocol,
        name: String::from("check"),
        passed,
        warning: false,
        critical,
        detail: String::from("detail"),
    }
}

pub(crate) fn warning() -> TestResult {
    TestResult {
        warning: true,
        ..result(false, false)
    }
}
