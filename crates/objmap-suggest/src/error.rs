use std::path::PathBuf;

use thiserror::Error;

/// A type definition could not be read or located.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not determine type name from file: {path}")]
    NoTypeDefinition { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("failed to read review answer: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("failed to render mapping fragment: {0}")]
    Render(#[from] serde_json::Error),
}
