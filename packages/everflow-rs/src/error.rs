use thiserror::Error;

pub type Result<T> = std::result::Result<T, EverflowError>;

#[derive(Debug, Error)]
pub enum EverflowError {
    /// Transport-level failure (DNS, connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the Everflow API.
    #[error("Everflow API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Still rate limited after exhausting all retries.
    #[error("rate limited by Everflow after {attempts} attempts")]
    RateLimited { attempts: u32 },
}
