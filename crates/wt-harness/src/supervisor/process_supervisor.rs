use crate::error::{StartError, StartResult};
use crate::supervisor::{
    PortManager, ProbeOutcome, ProbeStep, ReadinessProbe, ServerHandle, ServerState,
};

use std::fs::OpenOptions;
use std::os::unix::process::CommandExt;
use std::panic::Location;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use error_location::ErrorLocation;
use log::info;
use wt_config::{HarnessConfig, TargetConfig};

/// Launches the server-under-test and hands back an exclusive handle.
#[derive(Debug, Clone)]
pub struct ProcessSupervisor {
    target: TargetConfig,
    probe: ReadinessProbe,
    grace: Duration,
    graceful_timeout: Duration,
}

impl ProcessSupervisor {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            target: config.target.clone(),
            probe: ReadinessProbe::from_config(&config.startup),
            grace: config.startup.grace(),
            graceful_timeout: config.shutdown.graceful_timeout(),
        }
    }

    /// Spawn `executable <config_path>` and wait until it answers HTTP.
    ///
    /// Any response status counts as ready. On every failure the spawned
    /// process group is killed before the error is returned.
    pub async fn start(&self, config_path: &Path, port: u16) -> StartResult<ServerHandle> {
        if self.target.require_free_port && !PortManager::is_available(&self.target.host, port) {
            return Err(StartError::PortInUse {
                port,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(self.probe.attempt_timeout())
            .pool_max_idle_per_host(0)
            .build()?;

        let base_url = self.target.base_url_for(port);
        let child = self.spawn(config_path)?;
        let mut handle = ServerHandle::new(child, base_url.clone(), self.graceful_timeout);
        info!(
            "Spawned {} {} with PID {} (process group {})",
            self.target.executable.display(),
            config_path.display(),
            handle.pid(),
            handle.pgid()
        );

        if !self.grace.is_zero() {
            tokio::time::sleep(self.grace).await;
        }

        let outcome = self
            .probe
            .run("Server readiness", |_| {
                let exited = handle.try_exit_status();
                let request = client.get(&base_url);
                async move {
                    if let Some(status) = exited {
                        return ProbeStep::Abort(status);
                    }
                    match request.send().await {
                        Ok(response) => ProbeStep::Ready(response.status()),
                        Err(e) => ProbeStep::NotYet(e.to_string()),
                    }
                }
            })
            .await;

        match outcome {
            ProbeOutcome::Ready { value: status, .. } => {
                handle.advance(ServerState::Running);
                info!("Server is running on {base_url} (probe answered {status})");
                Ok(handle)
            }
            ProbeOutcome::Aborted { reason: status, .. } => {
                handle.kill_now();
                Err(StartError::ImmediateExit {
                    code: status.code(),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
            ProbeOutcome::Exhausted { attempts } => {
                // The leader may have died during the last attempt
                let exited = handle.try_exit_status();
                handle.kill_now();
                match exited {
                    Some(status) => Err(StartError::ImmediateExit {
                        code: status.code(),
                        location: ErrorLocation::from(Location::caller()),
                    }),
                    None => Err(StartError::Unresponsive {
                        attempts,
                        location: ErrorLocation::from(Location::caller()),
                    }),
                }
            }
        }
    }

    fn spawn(&self, config_path: &Path) -> StartResult<Child> {
        let mut cmd = Command::new(&self.target.executable);
        cmd.arg(config_path);

        // New session: pgid == pid, so the whole tree can be signalled at once
        unsafe {
            cmd.pre_exec(|| {
                libc::setsid();
                Ok(())
            });
        }

        let (stdout, stderr) = self.server_output()?;
        cmd.stdin(Stdio::null()).stdout(stdout).stderr(stderr);

        cmd.spawn().map_err(|source| StartError::Spawn {
            executable: self.target.executable.clone(),
            source,
            location: ErrorLocation::from(Location::caller()),
        })
    }

    fn server_output(&self) -> StartResult<(Stdio, Stdio)> {
        let Some(path) = &self.target.server_log else {
            return Ok((Stdio::null(), Stdio::null()));
        };

        let to_error = |source| StartError::ServerLog {
            path: path.clone(),
            source,
            location: ErrorLocation::from(Location::caller()),
        };

        let stdout = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(to_error)?;
        let stderr = stdout.try_clone().map_err(to_error)?;

        Ok((Stdio::from(stdout), Stdio::from(stderr)))
    }
}
