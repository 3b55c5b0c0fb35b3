use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Failures of a persistence gateway or of the checks in front of it.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Rejected locally; nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// The action does not apply to the record's current state.
    #[error("{0}")]
    Conflict(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("record storage failed: {0}")]
    Storage(String),

    #[error("stored records are not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::Storage(err.to_string())
    }
}

impl GatewayError {
    /// Prefixes the message with the failed user action, keeping the status.
    ///
    /// Local validation and conflicts are already phrased for the user and
    /// pass through untouched.
    pub fn during(self, action: &str) -> Self {
        match self {
            GatewayError::Validation(_) | GatewayError::Conflict(_) => self,
            other => GatewayError::Backend {
                status: other.status_code().as_u16(),
                message: format!("{action}: {other}"),
            },
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Conflict(_) => StatusCode::CONFLICT,
            GatewayError::Backend { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::Transport(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Storage(_) | GatewayError::Decode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
