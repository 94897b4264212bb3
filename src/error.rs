use thiserror::Error;

/// Why a tactical-advice request produced no usable text.
#[derive(Error, Debug)]
pub enum AdviceError {
    /// No credential was configured
    #[error("no API key configured (set GEMINI_API_KEY or API_KEY)")]
    MissingApiKey,

    /// Network, timeout or body decoding failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Errors that abort the application.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build advice client: {0}")]
    Advice(#[from] AdviceError),

    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
