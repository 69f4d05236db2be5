use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarqueeError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid route: {0}")]
    InvalidRoute(String),

    #[error("unknown media type: {0}")]
    UnknownMediaType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
