use std::io;

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("no mailbox connected: {0}")]
    MissingMailbox(String),
    #[error("credential error: {0}")]
    Credential(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("send failed: {0}")]
    Send(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
}
