use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request for {resource} failed: {message}")]
    Transport { resource: String, message: String },

    #[error("catalog answered {status} for {resource}")]
    Status { resource: String, status: u16 },

    #[error("could not parse {resource} response: {source}")]
    Parse {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("set {0} not found")]
    SetNotFound(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode stored value: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid store key {0:?}")]
    InvalidKey(String),
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("you must enter the correct secret code to change ownership")]
    AccessDenied,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BINDER_API_URL is not a valid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{name} is not a valid header value")]
    InvalidHeader { name: &'static str },
}
