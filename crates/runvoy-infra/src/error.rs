use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read template from {path}: {source}")]
    TemplateRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported infrastructure provider: {0}")]
    UnsupportedProvider(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("stack operation did not complete within the timeout")]
    Timeout,

    #[error("stack operation failed: {0}")]
    OperationFailed(String),

    #[error("stack disappeared mid-operation")]
    StackDisappeared,

    #[error("config store error: {0}")]
    Config(#[from] runvoy_config::ConfigError),
}

pub type Result<T> = std::result::Result<T, InfraError>;
