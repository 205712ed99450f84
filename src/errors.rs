use axum::http::StatusCode;
use thiserror::Error;

use crate::rag::parser::ParseFailure;

#[derive(Error, Debug)]
pub enum RecipeRagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Corpus error: {0}")]
    CorpusError(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Parse(ParseFailure),

    #[error("Deadline exceeded during {stage}")]
    Timeout { stage: &'static str },

    #[error("Request cancelled during {stage}")]
    Cancelled { stage: &'static str },

    #[error("{0}")]
    InvalidRequest(String),

    #[error("RAG service is initializing, please try again in a moment")]
    NotReady,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

impl RecipeRagError {
    /// HTTP status used when this error reaches the request boundary
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to an API caller.
    ///
    /// Parse failures carry the raw model output; that text is logged, never returned.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Parse(failure) => failure.public_message().to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ParseFailure> for RecipeRagError {
    fn from(failure: ParseFailure) -> Self {
        Self::Parse(failure)
    }
}

impl From<reqwest::Error> for RecipeRagError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl From<config::ConfigError> for RecipeRagError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RecipeRagError>;
