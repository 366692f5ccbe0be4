use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    errors::ApiError,
    middleware::AuthUser,
    models::{seat, Seat, Theater},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/theaters", post(create_theater))
        .route("/theaters/{id}/seats", post(create_seats).get(list_seats))
}

#[derive(Debug, Deserialize, Validate)]
struct CreateTheaterRequest {
    #[validate(length(min = 1, max = 50))]
    name: String,
    #[validate(length(min = 1, max = 50))]
    location: String,
}

// POST /theaters
async fn create_theater(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(req): Json<CreateTheaterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    sqlx::query("INSERT INTO theaters (name, location) VALUES ($1, $2)")
        .bind(&req.name)
        .bind(&req.location)
        .execute(&state.db.pool)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Theater created!" })),
    ))
}

#[derive(Debug, Deserialize, Validate)]
struct CreateSeatsRequest {
    #[validate(length(min = 1, message = "rows must not be empty"))]
    rows: Vec<String>,
    #[validate(range(min = 1, max = 100))]
    seats_per_row: i32,
}

// POST /theaters/{id}/seats — bulk seat initialisation for a theater.
async fn create_seats(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(theater_id): Path<i64>,
    Json(req): Json<CreateSeatsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let theater = Theater::find_by_id(theater_id, &state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Theater not found".to_string()))?;

    let layout = seat::codes_for_layout(&req.rows, req.seats_per_row);

    // All rows land or none do; a duplicate code aborts the whole batch.
    let mut tx = state.db.pool.begin().await?;
    for (row, number, code) in &layout {
        let result = sqlx::query(
            r#"INSERT INTO seats (theater_id, "row", number, code) VALUES ($1, $2, $3, $4)"#,
        )
        .bind(theater_id)
        .bind(row)
        .bind(number)
        .bind(code)
        .execute(&mut *tx)
        .await;

        if let Err(e) = result {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return Err(ApiError::Validation(format!(
                        "Seat {} already exists in this theater",
                        code
                    )));
                }
            }
            return Err(e.into());
        }
    }
    tx.commit().await?;

    let codes: Vec<&str> = layout.iter().map(|(_, _, code)| code.as_str()).collect();
    tracing::info!(theater_id, seats = codes.len(), "seats created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("Created {} seats for {}", codes.len(), theater.name),
            "seats": codes
        })),
    ))
}

// GET /theaters/{id}/seats
async fn list_seats(
    State(state): State<Arc<AppState>>,
    Path(theater_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    if Theater::find_by_id(theater_id, &state.db).await?.is_none() {
        return Err(ApiError::NotFound("Theater not found".to_string()));
    }

    let seats = Seat::list_for_theater(theater_id, &state.db).await?;
    Ok(Json(json!({ "seats": seats })))
}
