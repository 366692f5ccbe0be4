use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::{cache, errors::ApiError, middleware::AuthUser, AppState};

const SHOW_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/showtimes", post(create_showtime))
}

#[derive(Debug, Deserialize)]
struct CreateShowtimeRequest {
    show_time: String,
    movie_id: i64,
    theater_id: i64,
    price: Option<f64>,
}

// POST /showtimes
async fn create_showtime(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(req): Json<CreateShowtimeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let show_time = NaiveDateTime::parse_from_str(&req.show_time, SHOW_TIME_FORMAT)
        .map_err(|_| {
            ApiError::Validation("show_time must be formatted as YYYY-MM-DD HH:MM".to_string())
        })?;

    let result = sqlx::query(
        "INSERT INTO showtimes (show_time, price, movie_id, theater_id) VALUES ($1, $2, $3, $4)",
    )
    .bind(show_time)
    .bind(req.price.unwrap_or(10.0))
    .bind(req.movie_id)
    .bind(req.theater_id)
    .execute(&state.db.pool)
    .await;

    if let Err(e) = result {
        // A dangling movie_id/theater_id trips the FK, not a lookup.
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_foreign_key_violation() {
                return Err(ApiError::NotFound("Movie or theater not found".to_string()));
            }
        }
        return Err(e.into());
    }

    state.cache.invalidate(&cache::showtimes_key(req.movie_id)).await;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Showtime created!" })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_time_format_matches_the_wire_contract() {
        let parsed = NaiveDateTime::parse_from_str("2024-12-01 18:30", SHOW_TIME_FORMAT).unwrap();
        assert_eq!(parsed.format(SHOW_TIME_FORMAT).to_string(), "2024-12-01 18:30");
    }

    #[test]
    fn seconds_and_bare_dates_are_rejected() {
        assert!(NaiveDateTime::parse_from_str("2024-12-01 18:30:00", SHOW_TIME_FORMAT).is_err());
        assert!(NaiveDateTime::parse_from_str("2024-12-01", SHOW_TIME_FORMAT).is_err());
    }
}
