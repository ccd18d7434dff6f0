use crystmap::core::models::grid::GridError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to decode map '{path}': {source}", path = path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: crystmap::core::io::DecodeError,
    },

    #[error("could not determine map format of '{path}'; pass --format", path = path.display())]
    UnknownFormat { path: PathBuf },

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("invalid argument: {0}")]
    Argument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
