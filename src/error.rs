use thiserror::Error;

/// Errors raised while planning or submitting a sweep.
#[derive(Error, Debug)]
pub enum SweepError {
    /// A `"<title>/<input>"` address could not be built.
    #[error("Invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// An axis candidate does not have the shape its axis requires.
    #[error("Unexpected value for axis '{key}': {reason}")]
    UnexpectedShape { key: String, reason: String },

    /// The output-existence pattern built from a filename prefix was not valid.
    #[error("{0} is not a valid glob pattern: {1}")]
    InvalidGlobPattern(String, globset::Error),

    /// The remote service returned a non-success HTTP status.
    #[error("Remote service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The remote service accepted the graph but rejected some nodes.
    #[error("Workflow node errors: {0}")]
    NodeErrors(String),

    /// Network-level request failure with context.
    #[error("{context}: {source}")]
    Network {
        context: String,
        source: reqwest::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SweepError>;
