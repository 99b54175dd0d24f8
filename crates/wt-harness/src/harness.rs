//! One full session: start the server, run the categories, always stop it.

use crate::category::Category;
use crate::check::CheckContext;
use crate::client::HttpClient;
use crate::error::{StartError, StartResult};
use crate::executor::ScenarioExecutor;
use crate::session::{SessionBuilder, TestSession};
use crate::supervisor::{ProcessSupervisor, ShutdownOutcome};

use std::panic::Location;

use error_location::ErrorLocation;
use log::{info, warn};
use wt_config::{HarnessConfig, TargetConfig};

#[derive(Debug)]
pub struct SessionRun {
    pub session: TestSession,
    pub shutdown: ShutdownOutcome,
}

/// Fail fast when the server binary or its config file is missing.
pub fn check_preconditions(target: &TargetConfig) -> StartResult<()> {
    if !target.executable.is_file() {
        return Err(StartError::MissingExecutable {
            path: target.executable.clone(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    if !target.config.is_file() {
        return Err(StartError::MissingConfig {
            path: target.config.clone(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    if !target.content_root.is_dir() {
        warn!(
            "Content root {} does not exist; filesystem checks will fail",
            target.content_root.display()
        );
    }

    Ok(())
}

/// Start the server, run `categories` in order and stop the server on
/// every path.
///
/// Resolving `interrupt` ends the run early, during startup as well as
/// during checks. Every check that completed before the interrupt keeps
/// its result; the check in flight is dropped along with its fixtures.
pub async fn run_session<I>(
    config: &HarnessConfig,
    categories: &[Category],
    interrupt: I,
) -> StartResult<SessionRun>
where
    I: Future<Output = ()>,
{
    let client = HttpClient::new(&config.target.base_url(), config.requests.timeout())?;
    tokio::pin!(interrupt);

    let supervisor = ProcessSupervisor::new(config);
    let mut server = tokio::select! {
        started = supervisor.start(&config.target.config, config.target.port) => started?,
        () = &mut interrupt => {
            // Dropping the start future drops the handle, which kills the group
            warn!("Session interrupted during server startup");
            return Ok(SessionRun {
                session: SessionBuilder::new().finish(true),
                shutdown: ShutdownOutcome::Forced,
            });
        }
    };

    let ctx = CheckContext::new(client, &config.target.content_root);
    let executor = ScenarioExecutor::new(&ctx);
    let mut builder = SessionBuilder::new();

    let interrupted = {
        let run = async {
            for category in categories {
                executor.run_category(category, &mut builder).await;
            }
        };
        tokio::pin!(run);

        tokio::select! {
            () = &mut run => false,
            () = &mut interrupt => {
                warn!("Session interrupted, stopping server");
                true
            }
        }
    };

    let shutdown = server.stop().await;
    info!("Server shutdown: {shutdown:?}");

    Ok(SessionRun {
        session: builder.finish(interrupted),
        shutdown,
    })
}
