use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application error taxonomy. Every failure is terminal for the call that
/// produced it; the client re-invokes explicitly (no retries anywhere).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Guest-mode fallback: the identity has no persisted numeric account,
    /// so persistence is skipped with a friendly message.
    #[error("Please log in to {0}.")]
    GuestSession(&'static str),

    #[error("database error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::GuestSession(_) => StatusCode::UNAUTHORIZED,
            AppError::Persistence(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_distinct_from_persistence() {
        let nf = AppError::NotFound("Analysis").into_response();
        assert_eq!(nf.status(), StatusCode::NOT_FOUND);

        let db = AppError::Persistence(sqlx::Error::PoolClosed).into_response();
        assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn guest_session_carries_login_hint() {
        let err = AppError::GuestSession("save recipes");
        assert_eq!(err.to_string(), "Please log in to save recipes.");
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let err = AppError::invalid("Invalid user ID or recipe content");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
