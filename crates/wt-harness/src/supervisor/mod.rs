mod handle;
mod port;
mod process_supervisor;
mod readiness;
mod server_state;

pub use handle::{ServerHandle, ShutdownOutcome};
pub use port::PortManager;
pub use process_supervisor::ProcessSupervisor;
pub use readiness::{ProbeOutcome, ProbeStep, ReadinessProbe};
pub use server_state::ServerState;
