use crate::category::Category;
use crate::check::CheckContext;
use crate::error::CheckError;
use crate::session::{SessionBuilder, TestResult};

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use log::{info, warn};

/// Runs each check of a category once, in order, and records exactly one
/// result per check as soon as it completes. Errors and panics become
/// failed results.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioExecutor<'a> {
    ctx: &'a CheckContext,
}

impl<'a> ScenarioExecutor<'a> {
    pub fn new(ctx: &'a CheckContext) -> Self {
        Self { ctx }
    }

    pub async fn run_category(&self, category: &Category, session: &mut SessionBuilder) {
        info!(
            "=== {} ({} checks) ===",
            category.kind.title(),
            category.len()
        );

        for check in &category.checks {
            let outcome = AssertUnwindSafe(check.run(self.ctx)).catch_unwind().await;

            let result = match outcome {
                Ok(Ok(verdict)) => TestResult::from_verdict(
                    category.kind,
                    check.name(),
                    check.critical(),
                    verdict,
                ),
                Ok(Err(e)) => TestResult::failed(
                    category.kind,
                    check.name(),
                    check.critical(),
                    format!("Error: {e}"),
                ),
                Err(payload) => {
                    let e = CheckError::Panicked {
                        message: panic_message(payload.as_ref()),
                    };
                    TestResult::failed(
                        category.kind,
                        check.name(),
                        check.critical(),
                        format!("Error: {e}"),
                    )
                }
            };

            if result.passed {
                info!("[PASS] {} - {}", result.name, result.detail);
            } else {
                warn!("[{}] {} - {}", result.label(), result.name, result.detail);
            }
            session.record(result);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("unknown panic")
    }
}
