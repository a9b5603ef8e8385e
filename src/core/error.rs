use thiserror::Error;

use crate::utils::AppError;

/// Process-level failures raised during startup and shutdown.
///
/// Request-level errors are [`AppError`] and carry an HTTP status; this type
/// covers everything that happens before the router is serving.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    App(#[from] AppError),
}

/// Result alias for server lifecycle functions.
pub type Result<T> = std::result::Result<T, ServerError>;
