use crate::report::Report;
use crate::session::{ReadinessPolicy, TestSession};
use crate::tests::{result, warning};

use googletest::assert_that;
use googletest::prelude::{contains_substring, eq, not};

fn sample_session() -> TestSession {
    let mut critical = result(false, true);
    critical.name = String::from("Path traversal security");
    critical.detail = String::from("Status: 200 (expected 404)");

    vec![result(true, false), critical, warning()]
        .into_iter()
        .collect()
}

#[test]
fn given_session_when_rendered_then_summary_counts_shown() {
    // Given
    let session = sample_session();

    // When
    let text = Report::new(&session, ReadinessPolicy::default()).to_string();

    // Then
    assert_that!(text, contains_substring("TEST SUMMARY"));
    assert_that!(text, contains_substring("Total Tests: 3"));
    assert_that!(text, contains_substring("Passed: 1"));
    assert_that!(text, contains_substring("Failed: 1"));
    assert_that!(text, contains_substring("Warnings: 1"));
    assert_that!(text, contains_substring("Pass Rate: 33.3%"));
}

#[test]
fn given_critical_failure_when_rendered_then_listed_in_own_section() {
    // Given
    let session = sample_session();

    // When
    let text = Report::new(&session, ReadinessPolicy::default()).to_string();

    // Then
    assert_that!(text, contains_substring("Critical failures:"));
    assert_that!(
        text,
        contains_substring("[protocol] Path traversal security: Status: 200 (expected 404)")
    );
    assert_that!(text, contains_substring("NEEDS WORK"));
}

#[test]
fn given_all_passed_when_rendered_then_no_failure_sections() {
    // Given
    let session: TestSession = vec![result(true, true)].into_iter().collect();

    // When
    let text = Report::new(&session, ReadinessPolicy::default()).to_string();

    // Then
    assert_that!(text, not(contains_substring("Critical failures:")));
    assert_that!(text, contains_substring("EXCELLENT"));
}

#[test]
fn given_session_when_to_json_then_counts_and_results_serialized() {
    // Given
    let session = sample_session();

    // When
    let json = Report::new(&session, ReadinessPolicy::default())
        .to_json()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    // Then
    assert_that!(value["total"].as_u64(), eq(Some(3)));
    assert_that!(value["warnings"].as_u64(), eq(Some(1)));
    assert_that!(value["readiness"].as_str(), eq(Some("critical_issues")));
    assert_that!(value["critical_failures"][0]["category"].as_str(), eq(Some("protocol")));
    assert_that!(value["results"].as_array().map(Vec::len), eq(Some(3)));
}
