//! Requested models file
//!
//! ```json
//! {"models": ["GPT 4o", "Claude 3.5 Sonnet"]}
//! ```
//!
//! A bare JSON array of names is accepted as well.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RequestedError {
    #[error("requested models file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read requested models from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("requested models file {path:?} must be a list of names or {{\"models\": [...]}}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RequestedDocument {
    Wrapped { models: Vec<String> },
    Bare(Vec<String>),
}

/// Read the requested canonical model names, in file order.
pub fn load_requested(path: &Path) -> Result<Vec<String>, RequestedError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            RequestedError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            RequestedError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let models = parse_requested(&content, path)?;
    debug!(path = %path.display(), count = models.len(), "Loaded requested models");
    Ok(models)
}

fn parse_requested(content: &str, path: &Path) -> Result<Vec<String>, RequestedError> {
    let document: RequestedDocument =
        serde_json::from_str(content).map_err(|source| RequestedError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(match document {
        RequestedDocument::Wrapped { models } | RequestedDocument::Bare(models) => models,
    })
}
