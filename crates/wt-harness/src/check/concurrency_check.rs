use crate::check::{Check, CheckContext};
use crate::client::RequestSpec;
use crate::concurrency::ConcurrencyRunner;
use crate::error::CheckResult;
use crate::predicate::{AllOf, ResponsePredicate, Verdict};

use std::time::Duration;

use async_trait::async_trait;
use log::info;

/// Request made after a burst to confirm the server survived it.
#[derive(Debug)]
pub struct FollowUp {
    pub settle: Duration,
    pub request: RequestSpec,
    pub expect: AllOf,
}

/// A burst of concurrent GETs that must reach `required` successes.
#[derive(Debug)]
pub struct BurstCheck {
    name: String,
    critical: bool,
    path: String,
    requests: usize,
    pool_size: usize,
    per_request_timeout: Duration,
    required: usize,
    follow_up: Option<FollowUp>,
}

impl BurstCheck {
    pub fn new(
        name: &str,
        requests: usize,
        pool_size: usize,
        per_request_timeout: Duration,
        required: usize,
    ) -> Self {
        Self {
            name: name.to_string(),
            critical: true,
            path: String::from("/"),
            requests,
            pool_size,
            per_request_timeout,
            required,
            follow_up: None,
        }
    }

    pub fn with_follow_up(mut self, follow_up: FollowUp) -> Self {
        self.follow_up = Some(follow_up);
        self
    }
}

#[async_trait]
impl Check for BurstCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn critical(&self) -> bool {
        self.critical
    }

    async fn run(&self, ctx: &CheckContext) -> CheckResult<Verdict> {
        let outcome = ConcurrencyRunner::new(ctx.client().clone())
            .run(
                &self.path,
                self.requests,
                self.pool_size,
                self.per_request_timeout,
            )
            .await;
        info!(
            "{}: {}/{} requests succeeded",
            self.name, outcome.succeeded, outcome.dispatched
        );

        let detail = format!(
            "{}/{} requests succeeded (need {})",
            outcome.succeeded, outcome.dispatched, self.required
        );
        let burst = if outcome.meets(self.required) {
            Verdict::pass(detail)
        } else {
            Verdict::fail(detail)
        };

        let Some(follow_up) = &self.follow_up else {
            return Ok(burst);
        };

        tokio::time::sleep(follow_up.settle).await;
        let exchange = ctx.client().send(&follow_up.request).await?;
        let survived = follow_up.expect.evaluate(&exchange);

        Ok(burst.and(Verdict {
            detail: format!("after burst: {}", survived.detail),
            ..survived
        }))
    }
}
