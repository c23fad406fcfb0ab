use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Failure the HTTP layer maps straight onto a status code and JSON body
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct HttpError {
    pub status_code: u16,
    pub message: String,
    pub details: Option<Value>,
}

impl HttpError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            details: None,
        }
    }

    /// Caller supplied something missing or invalid
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    /// An upstream collaborator failed or broke its contract
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(502, message)
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Everything a search can fail with
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl SearchError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Http(err) => err.status_code,
            Self::Internal(_) => 500,
        }
    }

    /// JSON error body; unclassified failures never leak their cause
    pub fn to_body(&self) -> ErrorBody {
        match self {
            Self::Http(err) => ErrorBody {
                error: err.message.clone(),
                details: err.details.clone(),
            },
            Self::Internal(_) => ErrorBody {
                error: "Internal Server Error".to_string(),
                details: None,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

pub type Result<T> = std::result::Result<T, SearchError>;
