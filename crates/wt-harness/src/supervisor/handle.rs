use crate::error::ShutdownError;
use crate::supervisor::ServerState;

use std::panic::Location;
use std::process::{Child, ExitStatus};
use std::time::{Duration, Instant};

use error_location::ErrorLocation;
use log::{debug, info, warn};
use nix::errno::Errno;
use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const KILL_REAP_TIMEOUT: Duration = Duration::from_secs(2);

/// How a `stop()` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Handle was already terminated; nothing was signalled
    AlreadyTerminated,
    /// Group exited within the graceful deadline after SIGTERM
    Graceful,
    /// SIGKILL was needed
    Forced,
}

/// Exclusive owner of the running server process and its process group.
///
/// Dropping a handle that is not Terminated kills the whole group.
#[derive(Debug)]
pub struct ServerHandle {
    child: Child,
    pgid: Pid,
    state: ServerState,
    base_url: String,
    graceful_timeout: Duration,
}

impl ServerHandle {
    pub(crate) fn new(child: Child, base_url: String, graceful_timeout: Duration) -> Self {
        // setsid() in pre_exec made the child its own group leader
        let pgid = Pid::from_raw(child.id() as i32);

        let mut handle = Self {
            child,
            pgid,
            state: ServerState::Stopped,
            base_url,
            graceful_timeout,
        };
        handle.advance(ServerState::Starting);
        handle
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    pub fn pgid(&self) -> i32 {
        self.pgid.as_raw()
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn advance(&mut self, next: ServerState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid server state transition {} -> {}",
            self.state,
            next
        );
        debug!("Server {} -> {}", self.state, next);
        self.state = next;
    }

    /// Exit status of the group leader if it has exited (reaping it).
    pub(crate) fn try_exit_status(&mut self) -> Option<ExitStatus> {
        match self.child.try_wait() {
            Ok(status) => status,
            Err(e) => {
                warn!("Failed to poll server process {}: {e}", self.pid());
                None
            }
        }
    }

    /// Stop the server: SIGTERM to the group, wait up to the graceful
    /// deadline, then SIGKILL. Idempotent; always ends Terminated.
    pub async fn stop(&mut self) -> ShutdownOutcome {
        match self.state {
            ServerState::Terminated => {
                debug!("Server already terminated");
                return ShutdownOutcome::AlreadyTerminated;
            }
            ServerState::Running => self.advance(ServerState::Terminating),
            ServerState::Terminating => {}
            ServerState::Stopped | ServerState::Starting => {
                self.kill_now();
                return ShutdownOutcome::Forced;
            }
        }

        info!("Sending SIGTERM to process group {}", self.pgid);
        if let Err(e) = self.signal_group(Signal::SIGTERM) {
            warn!("{e}");
        }

        if self.wait_for_group(self.graceful_timeout).await {
            self.advance(ServerState::Terminated);
            info!("Server stopped");
            return ShutdownOutcome::Graceful;
        }

        warn!(
            "Server did not stop within {:?}, force killing process group {}",
            self.graceful_timeout, self.pgid
        );
        if let Err(e) = self.signal_group(Signal::SIGKILL) {
            warn!("{e}");
        }
        if !self.wait_for_group(KILL_REAP_TIMEOUT).await {
            warn!(
                "Process group {} still has members after SIGKILL",
                self.pgid
            );
        }

        self.advance(ServerState::Terminated);
        info!("Server killed");
        ShutdownOutcome::Forced
    }

    /// SIGKILL the group and reap the leader without waiting on a deadline.
    pub(crate) fn kill_now(&mut self) {
        if self.state.is_terminated() {
            return;
        }
        if self.state == ServerState::Running {
            self.advance(ServerState::Terminating);
        }

        if let Err(e) = self.signal_group(Signal::SIGKILL) {
            warn!("{e}");
        }
        if let Err(e) = self.child.wait().map_err(ShutdownError::from) {
            warn!("{e}");
        }

        self.advance(ServerState::Terminated);
    }

    /// Poll until the leader is reaped and no group member remains.
    async fn wait_for_group(&mut self, deadline: Duration) -> bool {
        let start = Instant::now();

        loop {
            if self.try_exit_status().is_some() && !self.group_alive() {
                return true;
            }
            if start.elapsed() >= deadline {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    fn group_alive(&self) -> bool {
        match killpg(self.pgid, None) {
            Ok(()) => true,
            Err(Errno::ESRCH) => false,
            // EPERM: a member exists but we may not signal it
            Err(_) => true,
        }
    }

    #[track_caller]
    fn signal_group(&self, signal: Signal) -> Result<(), ShutdownError> {
        match killpg(self.pgid, signal) {
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(source) => Err(ShutdownError::Signal {
                signal: signal.as_str(),
                pgid: self.pgid.as_raw(),
                source,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if !self.state.is_terminated() {
            warn!(
                "Server handle dropped while {}, killing process group {}",
                self.state, self.pgid
            );
            self.kill_now();
        }
    }
}
