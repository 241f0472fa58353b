//! Shared, I/O-free data model for the runvoy control-plane client:
//! execution requests/envelopes, status classification, log events,
//! stacks, the catalog types (images/secrets/users) the HTTP client
//! speaks, and the Output Sink trait consumed by the Log Engine and Run
//! Orchestrator.

pub mod catalog;
pub mod execution;
pub mod logs;
pub mod output;
pub mod stack;
pub mod status;

pub use catalog::{
    ClaimApiKeyResult, CreateSecretRequest, CreateUserResult, HealthReport, HealthStatus,
    ImageActionResult, ImageInfo, RegisterImageRequest, SecretActionResult, SecretInfo,
    TraceEntry, TraceResponse, UpdateSecretRequest, User, UserRole,
};
pub use execution::{
    Execution, ExecutionEnvelope, ExecutionRequest, KillResult, DEFAULT_GIT_PATH, DEFAULT_GIT_REF,
};
pub use logs::{DisplayLine, LogEvent, LogsResponse};
pub use output::{NullSink, NullSpinnerHandle, Sink, SpinnerHandle};
pub use stack::{DestroyResult, OperationType, Stack};
pub use status::ExecutionStatus;
