use std::time::Duration;

use log::{debug, info, warn};
use tokio::time::sleep;
use wt_config::StartupConfig;

/// Result of one probe attempt
#[derive(Debug)]
pub enum ProbeStep<T, A> {
    /// Target is ready; stop probing
    Ready(T),
    /// Target can never become ready; stop probing
    Abort(A),
    /// Not ready yet, with the reason
    NotYet(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum ProbeOutcome<T, A> {
    Ready { value: T, attempts: u32 },
    Aborted { reason: A, attempts: u32 },
    Exhausted { attempts: u32 },
}

/// Bounded retry with a fixed interval between attempts.
///
/// The attempt closure owns its own per-attempt timeout; the probe only
/// counts attempts and sleeps between them (never after the last one).
#[derive(Debug, Clone)]
pub struct ReadinessProbe {
    attempts: u32,
    interval: Duration,
    attempt_timeout: Duration,
}

impl ReadinessProbe {
    pub fn new(attempts: u32, interval: Duration, attempt_timeout: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            interval,
            attempt_timeout,
        }
    }

    pub fn from_config(config: &StartupConfig) -> Self {
        Self::new(
            config.probe_attempts,
            config.probe_interval(),
            config.probe_timeout(),
        )
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Run `attempt` until it reports Ready or Abort, or attempts run out.
    pub async fn run<F, Fut, T, A>(&self, probe_name: &str, mut attempt: F) -> ProbeOutcome<T, A>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = ProbeStep<T, A>>,
    {
        for n in 1..=self.attempts {
            match attempt(n).await {
                ProbeStep::Ready(value) => {
                    info!("{probe_name} ready after {n} attempt(s)");
                    return ProbeOutcome::Ready { value, attempts: n };
                }
                ProbeStep::Abort(reason) => {
                    warn!("{probe_name} aborted on attempt {n}");
                    return ProbeOutcome::Aborted { reason, attempts: n };
                }
                ProbeStep::NotYet(reason) => {
                    debug!(
                        "{probe_name} attempt {n}/{} not ready: {reason}",
                        self.attempts
                    );
                }
            }

            if n < self.attempts {
                sleep(self.interval).await;
            }
        }

        warn!("{probe_name} not ready after {} attempts", self.attempts);
        ProbeOutcome::Exhausted {
            attempts: self.attempts,
        }
    }
}
