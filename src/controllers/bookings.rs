use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::{
    errors::ApiError,
    middleware::AuthUser,
    models::Booking,
    services::{booking::BookingCoordinator, payment::CardDetails},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/bookings", post(book_ticket).get(my_bookings))
}

#[derive(Debug, Deserialize)]
struct BookTicketRequest {
    showtime_id: i64,
    seat_code: String,
    #[serde(default = "missing_card")]
    card_details: CardDetails,
}

// Missing card details behave like an empty card number: the request parses
// and the gateway rejects it, so the client sees a payment error, not a 422.
fn missing_card() -> CardDetails {
    CardDetails {
        number: String::new(),
    }
}

// POST /bookings — the reservation flow (validate, charge, commit, notify).
async fn book_ticket(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<BookTicketRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.seat_code.trim().is_empty() {
        return Err(ApiError::Validation("seat_code must not be empty".to_string()));
    }

    let coordinator = BookingCoordinator::from_state(&state);
    let confirmation = coordinator
        .reserve(user.user_id, req.showtime_id, &req.seat_code, &req.card_details)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Booking confirmed!",
            "booking_id": confirmation.booking_id,
            "transaction_id": confirmation.transaction_id
        })),
    ))
}

// GET /bookings — the caller's own bookings, newest first.
async fn my_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let bookings = Booking::list_for_user(user.user_id, &state.db).await?;
    Ok(Json(json!({ "bookings": bookings })))
}
