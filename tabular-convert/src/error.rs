//! FILENAME: tabular-convert/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid profile JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown remap target '{target}' for column type '{column_type}'")]
    UnknownType { column_type: String, target: String },
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Cache(#[from] tabular_engine::CacheError),
}
