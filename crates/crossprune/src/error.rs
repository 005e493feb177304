use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrossPruneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Inaccessible: {path}: {reason}")]
    Inaccessible { path: PathBuf, reason: String },

    #[error("File listing unavailable for {hash}: {message}")]
    ListingUnavailable { hash: String, message: String },

    #[error("Torrent service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Torrent service API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to apply label '{label}': {message}")]
    LabelApplicationFailed { label: String, message: String },

    #[error("Invalid schedule '{expr}': {message}")]
    Schedule { expr: String, message: String },
}

pub type Result<T> = std::result::Result<T, CrossPruneError>;
