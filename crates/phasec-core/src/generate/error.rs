use thiserror::Error;

/// Errors from a text-generation backend.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("API key not found: set the {var} environment variable")]
    MissingApiKey { var: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
