use std::process::ExitCode;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Interrupted,
    StartupFailed,
    /// Server executable or its config file is missing
    PreconditionFailed,
}

impl RunOutcome {
    /// Only a failed precondition is fatal. Failed checks, a server that
    /// never came up and an interrupted run all exit 0.
    pub fn exit_status(self) -> u8 {
        match self {
            Self::PreconditionFailed => 1,
            Self::Completed | Self::Interrupted | Self::StartupFailed => 0,
        }
    }
}

impl From<RunOutcome> for ExitCode {
    fn from(outcome: RunOutcome) -> Self {
        ExitCode::from(outcome.exit_status())
    }
}
