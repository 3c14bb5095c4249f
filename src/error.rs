// File: ./src/error.rs
// Error taxonomy for remote API calls. Callers branch on the variant to
// decide recovery: AuthRequired is terminal until the user supplies a token,
// everything else is retryable by re-issuing the request.
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The server rejected the credentials (or none were configured).
    /// Retrying without a new token is pointless.
    #[error("authentication required")]
    AuthRequired,
    /// The request never completed: DNS, connect, or timeout trouble.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status other than 401.
    #[error("server returned {status}: {message}")]
    Http { status: u16, message: String },
    /// The body arrived but did not parse as the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}
