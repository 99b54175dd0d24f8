use crate::check::{Check, CheckContext};
use crate::client::RequestSpec;
use crate::error::CheckResult;
use crate::fixture::Fixture;
use crate::predicate::{ResponsePredicate, StatusIs, Verdict};

use async_trait::async_trait;

const FIXTURE_CONTENTS: &str = "delete me";

/// Pre-create a file, DELETE it (200), confirm it is gone from disk,
/// then DELETE again (404).
#[derive(Debug)]
pub struct DeleteLifecycleCheck {
    name: String,
    critical: bool,
    file_name: String,
}

impl DeleteLifecycleCheck {
    pub fn new(name: &str, file_name: &str) -> Self {
        Self {
            name: name.to_string(),
            critical: true,
            file_name: file_name.to_string(),
        }
    }
}

#[async_trait]
impl Check for DeleteLifecycleCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn critical(&self) -> bool {
        self.critical
    }

    async fn run(&self, ctx: &CheckContext) -> CheckResult<Verdict> {
        let guard = Fixture::file(&self.file_name, FIXTURE_CONTENTS).install(ctx.content_root())?;
        let request = RequestSpec::delete(&format!("/{}", self.file_name));

        let first = ctx.client().send(&request).await?;
        let deleted = StatusIs(200).evaluate(&first);

        let removed = if guard.path().exists() {
            Verdict::fail("file still on disk")
        } else {
            Verdict::pass("file removed")
        };

        let second = ctx.client().send(&request).await?;
        let gone = StatusIs(404).evaluate(&second);

        Ok(Verdict {
            detail: format!(
                "first DELETE: {}; {}; second DELETE: {}",
                deleted.detail, removed.detail, gone.detail
            ),
            ..deleted.and(removed).and(gone)
        })
    }
}
