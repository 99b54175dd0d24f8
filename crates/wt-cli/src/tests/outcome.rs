use crate::outcome::RunOutcome;

use googletest::assert_that;
use googletest::prelude::eq;

#[test]
fn given_missing_precondition_when_exit_status_then_one() {
    // When / Then
    assert_that!(RunOutcome::PreconditionFailed.exit_status(), eq(1));
}

#[test]
fn given_startup_failure_when_exit_status_then_zero() {
    // When / Then
    assert_that!(RunOutcome::StartupFailed.exit_status(), eq(0));
}

#[test]
fn given_interrupted_run_when_exit_status_then_zero() {
    // When / Then
    assert_that!(RunOutcome::Interrupted.exit_status(), eq(0));
}

#[test]
fn given_completed_run_when_exit_status_then_zero() {
    // When / Then
    assert_that!(RunOutcome::Completed.exit_status(), eq(0));
}
