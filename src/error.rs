//! Error types for the stability engine

use thiserror::Error;

/// Rejected request input. Raised before any ratio is computed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("{field} must be >= 0")]
    Negative { field: &'static str },

    #[error("{field} is out of range")]
    OutOfRange { field: &'static str },

    #[error("monthly_income must be > 0")]
    ZeroIncome,

    #[error("age must be > 0")]
    InvalidAge,
}

/// Failure of the text-generation collaborator. Always recovered locally.
#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("narrator API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("narrator returned an empty reply")]
    EmptyReply,

    #[error("narrator did not answer within {0:?}")]
    Timeout(std::time::Duration),
}
