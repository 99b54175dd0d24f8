use crate::check::{Check, CheckContext};
use crate::client::RequestSpec;
use crate::error::CheckResult;
use crate::fixture::Fixture;
use crate::predicate::Verdict;

use std::path::PathBuf;

use async_trait::async_trait;

/// Place a symlink to a file outside the content root and request it.
///
/// Serving the target's contents is recorded as a warning, not a failure.
#[derive(Debug)]
pub struct SymlinkEscapeCheck {
    name: String,
    link_name: String,
    target: PathBuf,
    marker: String,
}

impl SymlinkEscapeCheck {
    pub fn new(name: &str, link_name: &str, target: impl Into<PathBuf>, marker: &str) -> Self {
        Self {
            name: name.to_string(),
            link_name: link_name.to_string(),
            target: target.into(),
            marker: marker.to_string(),
        }
    }
}

#[async_trait]
impl Check for SymlinkEscapeCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn critical(&self) -> bool {
        false
    }

    async fn run(&self, ctx: &CheckContext) -> CheckResult<Verdict> {
        if !self.target.exists() {
            return Ok(Verdict::pass(format!(
                "{} absent, nothing to escape to",
                self.target.display()
            )));
        }

        let _guard =
            Fixture::symlink(&self.link_name, &self.target).install(ctx.content_root())?;
        let exchange = ctx
            .client()
            .send(&RequestSpec::get(&format!("/{}", self.link_name)))
            .await?;

        if exchange.status == 200 && exchange.body_text().contains(self.marker.as_str()) {
            Ok(Verdict::warn(format!(
                "Symlink followed to {} (status 200)",
                self.target.display()
            )))
        } else {
            Ok(Verdict::pass(format!(
                "Symlinks handled securely (status {})",
                exchange.status
            )))
        }
    }
}
