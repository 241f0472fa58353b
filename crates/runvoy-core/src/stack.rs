use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Whether a `Deploy` call resulted in a create or an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Create,
    Update,
}

/// A named bundle of cloud resources managed as a unit by a provider.
///
/// Lifecycle: absent -> CREATE -> present; present -> UPDATE -> present;
/// present -> DESTROY -> absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stack {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub outputs: HashMap<String, String>,
    #[serde(default)]
    pub no_changes: bool,
    #[serde(default)]
    pub not_found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<OperationType>,
}

impl Stack {
    pub fn in_progress(name: impl Into<String>, operation_type: OperationType) -> Self {
        Self {
            name: name.into(),
            status: "IN_PROGRESS".to_string(),
            outputs: HashMap::new(),
            no_changes: false,
            not_found: false,
            operation_type: Some(operation_type),
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: String::new(),
            outputs: HashMap::new(),
            no_changes: false,
            not_found: true,
            operation_type: None,
        }
    }

    pub fn no_changes(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
            outputs: HashMap::new(),
            no_changes: true,
            not_found: false,
            operation_type: None,
        }
    }
}

/// Result of a `Destroy` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestroyResult {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub not_found: bool,
}
