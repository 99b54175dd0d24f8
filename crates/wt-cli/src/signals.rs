use crate::error::{CliError, Result as CliResult};

use std::future::Future;
use std::thread;

use log::{error, info};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use tokio::sync::oneshot;

/// Register SIGINT/SIGTERM and return a future that resolves on the first
/// one received. Handlers are installed before this returns.
pub fn interrupt_listener() -> CliResult<impl Future<Output = ()>> {
    let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(CliError::signals)?;
    let (tx, rx) = oneshot::channel();

    thread::Builder::new()
        .name("signal-listener".into())
        .spawn(move || {
            if let Some(sig) = signals.forever().next() {
                info!("Received signal {sig}, stopping server...");
                if tx.send(()).is_err() {
                    error!("Session already finished; signal ignored");
                }
            }
        })
        .map_err(CliError::signals)?;

    Ok(async move {
        // A dropped sender means the listener thread died; never interrupt.
        if rx.await.is_err() {
            std::future::pending::<()>().await;
        }
    })
}
