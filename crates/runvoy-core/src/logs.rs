use serde::{Deserialize, Serialize};

use crate::status::ExecutionStatus;

/// One log line as emitted by the remote execution service.
///
/// Events carry no intrinsic line number; the client assigns 1-based line
/// numbers at display time, in the order it receives/sorts them.
/// Duplicates and equal timestamps are explicitly permitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Milliseconds since epoch. Monotonic within one execution in the
    /// emitter's ordering, but duplicates are allowed.
    pub timestamp: i64,
    pub message: String,
}

impl LogEvent {
    /// The message with trailing newlines trimmed for display.
    pub fn trimmed_message(&self) -> &str {
        self.message.trim_end_matches(['\n', '\r'])
    }
}

/// Response to `GetLogs`: a finite (possibly empty) sequence of events
/// alongside the execution's current status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsResponse {
    pub execution_id: String,
    #[serde(default)]
    pub events: Vec<LogEvent>,
    pub status: ExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub websocket_url: Option<String>,
}

/// One rendered, numbered log line for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    /// 1-based, dense, never reset within one call; not comparable across
    /// calls or across executions.
    pub line_number: usize,
    pub timestamp: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_newlines_only() {
        let e = LogEvent {
            timestamp: 0,
            message: "hello\n\r\n".to_string(),
        };
        assert_eq!(e.trimmed_message(), "hello");
    }

    #[test]
    fn leaves_interior_newlines_intact() {
        let e = LogEvent {
            timestamp: 0,
            message: "a\nb\n".to_string(),
        };
        assert_eq!(e.trimmed_message(), "a\nb");
    }
}
