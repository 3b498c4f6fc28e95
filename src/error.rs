//! Error types for mapdiff operations

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MapdiffError>;

#[derive(Error, Debug)]
pub enum MapdiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No cached data yet: {}", path.display())]
    ArtifactAbsent { path: PathBuf },

    #[error("Unknown relation: {name}")]
    UnknownRelation { name: String },

    #[error("Overpass error: HTTP {status}: {body}")]
    RemoteQuery { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed reference input: {message}")]
    MalformedReference { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl MapdiffError {
    pub fn artifact_absent(path: impl Into<PathBuf>) -> Self {
        Self::ArtifactAbsent { path: path.into() }
    }

    pub fn unknown_relation(name: impl Into<String>) -> Self {
        Self::UnknownRelation { name: name.into() }
    }

    pub fn remote_query(status: u16, body: impl Into<String>) -> Self {
        Self::RemoteQuery {
            status,
            body: body.into(),
        }
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn malformed_reference(msg: impl Into<String>) -> Self {
        Self::MalformedReference {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    /// True for the "run an update first" condition, which callers present
    /// as a call to action rather than a failure.
    pub fn is_artifact_absent(&self) -> bool {
        matches!(self, Self::ArtifactAbsent { .. })
    }
}
