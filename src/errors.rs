use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy surfaced to API clients. Every variant maps to a status
/// code plus a JSON `message`; nothing is retried server-side.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    /// The seat code is not registered to the showtime's theater.
    #[error("Seat {0} does not exist in this theater!")]
    InvalidSeat(String),

    /// Uniqueness conflict on (showtime_id, seat_code).
    #[error("Sorry, that seat is already booked!")]
    SeatTaken,

    /// Processor-reported failure; the reason is passed through verbatim.
    #[error("Payment Failed: {0}")]
    PaymentDeclined(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("password hashing failed")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("token creation failed")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidSeat(_)
            | ApiError::SeatTaken
            | ApiError::PaymentDeclined(_)
            | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Database(_) | ApiError::Hash(_) | ApiError::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {:?}", self);
        }

        let body = match &self {
            ApiError::PaymentDeclined(reason) => {
                json!({ "message": "Payment Failed", "error": reason })
            }
            // Internal detail stays in the logs.
            ApiError::Database(_) | ApiError::Hash(_) | ApiError::Token(_) => {
                json!({ "message": "Internal server error" })
            }
            other => json!({ "message": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            ApiError::NotFound("Showtime not found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InvalidSeat("Z9".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::SeatTaken.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::PaymentDeclined("declined".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_seat_message_names_the_seat() {
        let msg = ApiError::InvalidSeat("B7".into()).to_string();
        assert_eq!(msg, "Seat B7 does not exist in this theater!");
    }
}
