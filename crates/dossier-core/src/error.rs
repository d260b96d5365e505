//! Error types for the dossier pipeline

use thiserror::Error;

/// Message reported when the model credential is absent.
pub const MISSING_CREDENTIAL: &str = "OPENAI_API_KEY is not set in .env";

/// Result type alias for model gateway calls
pub type ModelResult<T> = Result<T, ModelError>;

/// Classified failures of one upstream completion call. None of them are retried.
#[derive(Error, Debug)]
pub enum ModelError {
    /// No credential configured; the call was never attempted.
    #[error("{}", MISSING_CREDENTIAL)]
    MissingCredential,

    #[error("OpenAI API error {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("OpenAI request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("OpenAI response decode: {0}")]
    Decode(String),
}

/// Failures of the popup's call to the relay.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid backend URL: {0}")]
    BackendUrl(String),

    #[error("Server error: {0}")]
    Status(u16),

    #[error("backend request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend response decode: {0}")]
    Decode(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("a fetch is already in progress")]
    FetchInProgress,

    #[error("nothing to export yet")]
    NothingToExport,

    #[error("export serialization: {0}")]
    Serialize(String),
}
