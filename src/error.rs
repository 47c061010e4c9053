use std::path::PathBuf;

use thiserror::Error;

use crate::preprocess::StemmerKind;

#[derive(Error, Debug)]
pub enum SpamError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Artifact {} is unusable: {reason}", .path.display())]
    Artifact { path: PathBuf, reason: String },

    #[error("Invalid model parameters: {0}")]
    InvalidModel(String),

    #[error("Stop-word set error: {0}")]
    StopWords(String),

    #[error("Feature vector has {actual} columns, classifier expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Vectorizers disagree on the stemmer: message uses {message:?}, email uses {email:?}")]
    StemmerMismatch {
        message: StemmerKind,
        email: StemmerKind,
    },

    #[error("Class index {index} has no label")]
    UnknownClass { index: usize },

    #[error("Invalid type selected: {0}")]
    InvalidTrack(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SpamError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SpamError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn artifact(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SpamError::Artifact {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SpamError>;
