use crate::check::{Check, CheckContext};
use crate::client::RequestSpec;
use crate::error::CheckResult;
use crate::fixture::Fixture;
use crate::predicate::{AllOf, ResponsePredicate, Verdict};

use async_trait::async_trait;

/// One request, evaluated against a set of expectations, with an
/// optional fixture installed for the duration of the exchange.
#[derive(Debug)]
pub struct RequestCheck {
    name: String,
    critical: bool,
    request: RequestSpec,
    fixture: Option<Fixture>,
    expect: AllOf,
}

impl RequestCheck {
    pub fn new(name: &str, request: RequestSpec, expect: AllOf) -> Self {
        Self {
            name: name.to_string(),
            critical: false,
            request,
            fixture: None,
            expect,
        }
    }

    pub fn critical(mut self) -> Self {
        self.critical = true;
        self
    }

    pub fn with_fixture(mut self, fixture: Fixture) -> Self {
        self.fixture = Some(fixture);
        self
    }
}

#[async_trait]
impl Check for RequestCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn critical(&self) -> bool {
        self.critical
    }

    async fn run(&self, ctx: &CheckContext) -> CheckResult<Verdict> {
        let _guard = self
            .fixture
            .as_ref()
            .map(|f| f.install(ctx.content_root()))
            .transpose()?;

        let exchange = ctx.client().send(&self.request).await?;
        Ok(self.expect.evaluate(&exchange))
    }
}
