use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
    #[error("unknown stomp command {0}")]
    UnknownCommand(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
