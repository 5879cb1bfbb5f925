use thiserror::Error;

/// Errors produced while generating, uploading or downloading a report.
///
/// Every variant is terminal: nothing in this crate retries. The type is
/// `Clone` so a single failed fetch can be handed to every caller waiting on it.
#[derive(Debug, Clone, Error)]
pub enum ReportError {
    /// No API token could be resolved for the direct PDF service.
    #[error("token is required")]
    AuthenticationRequired,

    /// The rendering backend answered with a non-success status.
    #[error("Failed to generate PDF: {status_text}\n{body}")]
    GenerationFailed {
        status: u16,
        status_text: String,
        body: String,
    },

    /// Downloading the rendered document answered with a non-success status.
    #[error("{status_text}: {body}")]
    DownloadFailed {
        status: u16,
        status_text: String,
        body: String,
    },

    /// A fetch succeeded but did not deliver a usable byte buffer.
    #[error("Not a buffer: {0}")]
    InvalidResult(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// A request could not be built before anything was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The backend answered with a success status but an unreadable envelope.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ReportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ReportError::GenerationFailed { status, .. }
            | ReportError::DownloadFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ReportError {
    fn from(error: reqwest::Error) -> Self {
        ReportError::Transport(error.to_string())
    }
}

impl From<config::ConfigError> for ReportError {
    fn from(error: config::ConfigError) -> Self {
        ReportError::Config(error.to_string())
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
