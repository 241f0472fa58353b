use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::status::ExecutionStatus;

/// Git source default ref when a repo is given but no ref is specified.
pub const DEFAULT_GIT_REF: &str = "main";
/// Git source default path when a repo is given but no path is specified.
pub const DEFAULT_GIT_PATH: &str = ".";

/// A command plus optional image/git source/env/secrets submitted to the
/// remote execution service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_path: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secrets: Vec<String>,
    #[serde(default)]
    pub timeout_seconds: u64,
}

impl ExecutionRequest {
    /// Fill in the git ref/path defaults when a repo is present but the
    /// other fields were left empty. The client permits an empty
    /// `git_ref` to pass through (the server may itself default it); this
    /// helper is opt-in for callers (e.g. the playbook compiler) that want
    /// the client-side default applied.
    pub fn with_git_defaults(mut self) -> Self {
        if self.git_repo.is_some() {
            if self.git_ref.as_deref().unwrap_or("").is_empty() {
                self.git_ref = Some(DEFAULT_GIT_REF.to_string());
            }
            if self.git_path.as_deref().unwrap_or("").is_empty() {
                self.git_path = Some(DEFAULT_GIT_PATH.to_string());
            }
        }
        self
    }
}

/// Server-returned envelope for a submitted execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionEnvelope {
    pub execution_id: String,
    pub status: ExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub websocket_url: Option<String>,
}

impl ExecutionEnvelope {
    /// A `websocket_url` is honored only while the observed status is
    /// non-terminal; this returns `Some` only in that case.
    pub fn live_websocket_url(&self) -> Option<&str> {
        if self.status.is_terminal() {
            None
        } else {
            self.websocket_url.as_deref()
        }
    }
}

/// Summary row as returned by `ListExecutions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    pub execution_id: String,
    pub status: ExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Response to `KillExecution`. The server returns an empty/absent
/// envelope for an execution that is already terminated; the client
/// surfaces that as an informational "already terminated" outcome rather
/// than an error.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KillResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl KillResult {
    pub fn was_already_terminated(&self) -> bool {
        self.execution_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn git_defaults_only_apply_when_repo_set() {
        let req = ExecutionRequest {
            command: "echo hi".into(),
            ..Default::default()
        }
        .with_git_defaults();
        assert!(req.git_ref.is_none());
        assert!(req.git_path.is_none());

        let req = ExecutionRequest {
            command: "echo hi".into(),
            git_repo: Some("org/repo".into()),
            ..Default::default()
        }
        .with_git_defaults();
        assert_eq!(req.git_ref.as_deref(), Some(DEFAULT_GIT_REF));
        assert_eq!(req.git_path.as_deref(), Some(DEFAULT_GIT_PATH));
    }

    #[test]
    fn empty_git_ref_explicitly_set_is_still_defaulted() {
        let req = ExecutionRequest {
            command: "echo hi".into(),
            git_repo: Some("org/repo".into()),
            git_ref: Some(String::new()),
            ..Default::default()
        }
        .with_git_defaults();
        assert_eq!(req.git_ref.as_deref(), Some(DEFAULT_GIT_REF));
    }

    #[test]
    fn live_websocket_url_hidden_when_terminal() {
        let env = ExecutionEnvelope {
            execution_id: "e-1".into(),
            status: ExecutionStatus::Succeeded,
            image_id: None,
            websocket_url: Some("wss://example/ws".into()),
        };
        assert_eq!(env.live_websocket_url(), None);
    }

    #[test]
    fn live_websocket_url_present_when_non_terminal() {
        let env = ExecutionEnvelope {
            execution_id: "e-1".into(),
            status: ExecutionStatus::Running,
            image_id: None,
            websocket_url: Some("wss://example/ws".into()),
        };
        assert_eq!(env.live_websocket_url(), Some("wss://example/ws"));
    }

    #[test]
    fn kill_result_already_terminated_on_empty_envelope() {
        let kr = KillResult::default();
        assert!(kr.was_already_terminated());
    }
}
