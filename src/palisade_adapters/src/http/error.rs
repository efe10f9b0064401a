use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use palisade_core::AuthFlowError;

/// HTTP-facing error: a status code and a displayable message.
///
/// Authentication failures map to 401 with the flow's own human-readable
/// reason; validation failures to 400; operational failures are logged and
/// surface as an opaque 500.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<AuthFlowError> for ApiError {
    fn from(error: AuthFlowError) -> Self {
        match error {
            AuthFlowError::AuthenticationFailure(message) => Self {
                status: StatusCode::UNAUTHORIZED,
                message,
            },
            AuthFlowError::ValidationFailure(message) => Self {
                status: StatusCode::BAD_REQUEST,
                message,
            },
            AuthFlowError::OperationFailure(reason) => {
                tracing::error!(error = %reason, "Request failed on a downstream dependency");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "An unexpected error occurred.".to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        let auth: ApiError = AuthFlowError::authentication("no").into();
        assert_eq!(auth.status, StatusCode::UNAUTHORIZED);
        assert_eq!(auth.message, "no");

        let validation: ApiError = AuthFlowError::validation("bad field").into();
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);

        let operation: ApiError = AuthFlowError::operation("db down").into();
        assert_eq!(operation.status, StatusCode::INTERNAL_SERVER_ERROR);
        // Internal details never reach the response body.
        assert_eq!(operation.message, "An unexpected error occurred.");
    }
}
