use serde::{Deserialize, Serialize};

/// Execution status as reported by the control plane.
///
/// This is the single source of truth for what counts as terminal; both
/// the Log Engine's router and any CLI status checker consult
/// [`ExecutionStatus::is_terminal`] rather than re-deriving the partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    /// Non-terminal, pre-live: scheduled but not yet streaming.
    Starting,
    /// Non-terminal, live.
    Running,
    /// Non-terminal, live.
    Started,
    /// Non-terminal, winding down.
    Terminating,
    /// Terminal.
    Succeeded,
    /// Terminal.
    Failed,
    /// Terminal.
    Stopped,
}

impl ExecutionStatus {
    /// Once a status enters the terminal partition it never leaves it.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ExecutionStatus::Succeeded | ExecutionStatus::Failed | ExecutionStatus::Stopped
        )
    }

    pub fn is_live(self) -> bool {
        matches!(self, ExecutionStatus::Running | ExecutionStatus::Started)
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExecutionStatus::Starting => "STARTING",
            ExecutionStatus::Running => "RUNNING",
            ExecutionStatus::Started => "STARTED",
            ExecutionStatus::Terminating => "TERMINATING",
            ExecutionStatus::Succeeded => "SUCCEEDED",
            ExecutionStatus::Failed => "FAILED",
            ExecutionStatus::Stopped => "STOPPED",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_partition_is_exact() {
        let terminal = [
            ExecutionStatus::Succeeded,
            ExecutionStatus::Failed,
            ExecutionStatus::Stopped,
        ];
        let non_terminal = [
            ExecutionStatus::Starting,
            ExecutionStatus::Running,
            ExecutionStatus::Started,
            ExecutionStatus::Terminating,
        ];
        for s in terminal {
            assert!(s.is_terminal(), "{s} should be terminal");
        }
        for s in non_terminal {
            assert!(!s.is_terminal(), "{s} should not be terminal");
        }
    }

    #[test]
    fn serializes_screaming_snake_case() {
        let s = serde_json::to_string(&ExecutionStatus::Running).unwrap();
        assert_eq!(s, "\"RUNNING\"");
    }
}
