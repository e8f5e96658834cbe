use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(PathBuf),

    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("invalid presence matrix: {0}")]
    InvalidMatrix(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
