//! Run identity and lifecycle.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Run is accepting records
    Running,
    /// Run completed successfully
    Finished,
    /// Run ended with an error
    Failed,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Running)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Running => "running",
            RunStatus::Finished => "finished",
            RunStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Identifies one execution of the workflow.
///
/// Returned by the backend when a run starts and passed explicitly to every
/// recorder operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    pub experiment_id: String,
    pub experiment_name: String,
    pub run_id: String,
    pub run_name: String,
    pub status: RunStatus,
    /// Where the run's artifacts are stored
    pub artifact_uri: String,
}

impl RunContext {
    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }
}
