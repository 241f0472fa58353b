use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogEngineError {
    #[error("failed to fetch logs: {0}")]
    Client(#[from] runvoy_client::ClientError),

    #[error("failed to open log stream: {0}")]
    Dial(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("execution is non-terminal but the server did not supply a websocket URL")]
    MissingWebsocketUrl,
}

pub type Result<T> = std::result::Result<T, LogEngineError>;
