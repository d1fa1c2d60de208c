//! Error taxonomy shared by the loader, the renderer and the publisher.
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A type node carries none of the recognized kind tags, or a declared
    /// facet contradicts itself (e.g. `minItems != maxItems`).
    #[error("malformed schema at {path}: {reason}")]
    MalformedSchema { path: String, reason: String },

    #[error("missing required field `{field}` at {path}")]
    MissingField { path: String, field: &'static str },

    #[error("namespace `{name}` is declared more than once")]
    DuplicateNamespace { name: String },

    /// Deserialization failure with the JSON path that triggered it.
    #[error("at JSON path {path} → {message}")]
    Json { path: String, message: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to publish {url}: {message}")]
    Publish { url: String, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedSchema { path: path.into(), reason: reason.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    /// Short, stable label used in run reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MalformedSchema { .. } => "MalformedSchema",
            Error::MissingField { .. } => "MissingRequiredField",
            Error::DuplicateNamespace { .. } => "DuplicateNamespace",
            Error::Json { .. } => "Json",
            Error::Io { .. } => "Io",
            Error::Config(_) => "Config",
            Error::Publish { .. } | Error::Http(_) => "Publish",
        }
    }
}

/// One entity whose page could not be produced. Siblings are unaffected.
#[derive(Debug, thiserror::Error)]
#[error("{namespace}.{entity} ({kind}): {error}")]
pub struct EntityFailure {
    pub namespace: String,
    pub kind: crate::ir::EntityKind,
    pub entity: String,
    #[source]
    pub error: Error,
}

/// A schema document that contributed nothing (unreadable, unparsable) or
/// only part of its namespaces (a name already taken by an earlier document).
#[derive(Debug, thiserror::Error)]
#[error("{}: {error}", path.display())]
pub struct DocumentFailure {
    pub path: std::path::PathBuf,
    #[source]
    pub error: Error,
}
