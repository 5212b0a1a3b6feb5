//! Process exit codes and the run-wide status accumulator

use serde::{Deserialize, Serialize};

/// Exit code of a test process or of a whole benchmark run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);

    pub fn is_success(&self) -> bool {
        *self == Self::SUCCESS
    }

    pub fn code(&self) -> i32 {
        self.0
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Run-wide status. Starts at success and keeps the last failing code it
/// was shown; failures are overwritten, never combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStatus {
    current: ExitCode,
}

impl RunStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, status: ExitCode) {
        if !status.is_success() {
            self.current = status;
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        self.current
    }
}
