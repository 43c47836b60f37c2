use thiserror::Error;

/// Errors that can occur during workflow extraction and rendering.
#[derive(Error, Debug)]
pub enum PutError {
    #[error("path error: {message} (path: {path})")]
    Path { message: String, path: String },

    #[error("pattern library error: {message}")]
    Pattern { message: String },

    #[error("diagram error: {message}")]
    Diagram { message: String },

    #[error("invalid option: {message}")]
    InvalidOption { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `PutError`.
pub type Result<T> = std::result::Result<T, PutError>;
