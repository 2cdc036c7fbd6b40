use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NamesError {
    #[error("Not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Data quality: {0}")]
    DataQuality(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    General(String),
}
