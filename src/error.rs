use std::path::PathBuf;

use thiserror::Error;

/// Why an `amtexpr:` expression produced no amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("empty expression")]
    Empty,
    #[error("expression nests deeper than {0} levels")]
    TooDeep(usize),
    #[error("parse error: {0}")]
    Syntax(String),
    #[error("unexpected trailing: {0}")]
    Trailing(String),
    #[error("expression does not evaluate to a finite number")]
    NonFinite,
}

/// Failure to load a configuration file or an inventory snapshot.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}
