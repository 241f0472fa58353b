use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunvoyError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("command timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] runvoy_config::ConfigError),

    #[error(transparent)]
    Client(#[from] runvoy_client::ClientError),

    #[error(transparent)]
    Playbook(#[from] runvoy_playbook::PlaybookError),

    #[error(transparent)]
    Logs(#[from] runvoy_logs::LogEngineError),

    #[error(transparent)]
    Infra(#[from] runvoy_infra::InfraError),
}

pub type Result<T> = std::result::Result<T, RunvoyError>;
