use serde::Serialize;

/// Lifecycle of the supervised server process.
///
/// Moves forward only: Stopped → Starting → Running → Terminating → Terminated.
/// A failed start goes straight from Starting to Terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerState {
    /// Not spawned yet
    Stopped,
    /// Spawned, readiness not confirmed
    Starting,
    /// Answered a readiness probe
    Running,
    /// SIGTERM sent to the group
    Terminating,
    /// Process group reaped or killed
    Terminated,
}

impl ServerState {
    fn rank(self) -> u8 {
        match self {
            Self::Stopped => 0,
            Self::Starting => 1,
            Self::Running => 2,
            Self::Terminating => 3,
            Self::Terminated => 4,
        }
    }

    pub fn can_transition_to(self, next: ServerState) -> bool {
        next.rank() == self.rank() + 1 || (self == Self::Starting && next == Self::Terminated)
    }

    pub fn is_terminated(self) -> bool {
        self == Self::Terminated
    }
}

impl std::fmt::Display for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Terminating => "terminating",
            Self::Terminated => "terminated",
        };
        f.write_str(name)
    }
}
