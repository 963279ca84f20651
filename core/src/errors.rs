use std::time::Duration;
use thiserror::Error;

/// Errors raised while turning a query into an answer
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },

    #[error("API Error: {0}")]
    ApiError(String),

    #[error("Parsing Error: {0}")]
    ParsingError(String),

    #[error("Missing answer field at '{0}'")]
    MissingField(String),
}

impl BridgeError {
    /// Short, user-readable rendition of the error, safe to show in a UI.
    ///
    /// Never includes upstream bodies or credentials; those go to the log.
    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigError(_) => {
                "The assistant is not configured correctly. Please contact the operator.".to_string()
            }
            Self::Timeout(after) => format!(
                "The language model did not answer within {} seconds. Please try again.",
                after.as_secs()
            ),
            Self::RequestError(_) => {
                "Could not reach the language model service. Please try again later.".to_string()
            }
            Self::HttpError { status_code, .. } => format!(
                "The language model service returned an error (HTTP {}). Please try again later.",
                status_code
            ),
            Self::ApiError(_) => {
                "The language model service rejected the request. Please try again.".to_string()
            }
            Self::ParsingError(_) | Self::MissingField(_) => {
                "The language model service sent a response that could not be read.".to_string()
            }
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::RequestError(format!("Failed to send request: {}", err))
        }
    }
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;
