/// Level loading errors.

use std::path::PathBuf;

use thiserror::Error;

/// A level document that cannot be turned into spawn descriptors.
/// Fatal to level start; nothing is spawned.
#[derive(Debug, Error, PartialEq)]
pub enum MalformedLevel {
    #[error("level document could not be parsed: {0}")]
    Parse(String),

    #[error("missing required field `{field}`")]
    MissingField { field: String },

    #[error("field `{field}` is not a finite number")]
    NonFinite { field: String },

    #[error("field `{field}` names unknown platform image `{key}`")]
    UnknownImage { field: String, key: String },
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("could not read level file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed level {origin}: {source}")]
    Malformed {
        origin: String,
        #[source]
        source: MalformedLevel,
    },
}
