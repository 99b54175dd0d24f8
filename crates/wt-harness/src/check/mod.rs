//! Individual checks. Each one performs its own setup, exchange and
//! cleanup and reports a `Verdict`.

mod concurrency_check;
mod delete_check;
mod request_check;
mod symlink_check;

pub use concurrency_check::{BurstCheck, FollowUp};
pub use delete_check::DeleteLifecycleCheck;
pub use request_check::RequestCheck;
pub use symlink_check::SymlinkEscapeCheck;

use crate::client::HttpClient;
use crate::error::CheckResult;
use crate::predicate::Verdict;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// What a check may touch: the server over HTTP and the content root on disk.
#[derive(Debug, Clone)]
pub struct CheckContext {
    client: HttpClient,
    content_root: PathBuf,
}

impl CheckContext {
    pub fn new(client: HttpClient, content_root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            content_root: content_root.into(),
        }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }
}

#[async_trait]
pub trait Check: Send + Sync {
    fn name(&self) -> &str;

    /// Failure blocks acceptance
    fn critical(&self) -> bool;

    /// Errors are turned into failed results by the executor.
    async fn run(&self, ctx: &CheckContext) -> CheckResult<Verdict>;
}
