//! Bounded-concurrency request bursts.

use crate::client::{HttpClient, RequestSpec};

use std::time::Duration;

use futures::StreamExt;
use futures::stream;
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BurstOutcome {
    pub dispatched: usize,
    pub succeeded: usize,
}

impl BurstOutcome {
    pub fn failed(&self) -> usize {
        self.dispatched - self.succeeded
    }

    pub fn meets(&self, required: usize) -> bool {
        self.succeeded >= required
    }
}

/// Sends independent GETs with at most `pool_size` in flight.
///
/// A request succeeds on a 2xx response within its own timeout. Failures
/// are counted and never cancel the other requests.
#[derive(Debug, Clone)]
pub struct ConcurrencyRunner {
    client: HttpClient,
}

impl ConcurrencyRunner {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub async fn run(
        &self,
        path: &str,
        request_count: usize,
        pool_size: usize,
        per_request_timeout: Duration,
    ) -> BurstOutcome {
        let request = RequestSpec::get(path).timeout(per_request_timeout);
        let request = &request;

        let succeeded = stream::iter(0..request_count)
            .map(|i| async move {
                match self.client.send(request).await {
                    Ok(exchange) if exchange.is_success() => true,
                    Ok(exchange) => {
                        debug!("Burst request {i} got status {}", exchange.status);
                        false
                    }
                    Err(e) => {
                        debug!("Burst request {i} failed: {e}");
                        false
                    }
                }
            })
            .buffer_unordered(pool_size.max(1))
            .filter(|ok| futures::future::ready(*ok))
            .count()
            .await;

        BurstOutcome {
            dispatched: request_count,
            succeeded,
        }
    }
}
