use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid filter specification: {0}")]
    InvalidSpec(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Filter design failed: {0}")]
    Design(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, FilterError>;
