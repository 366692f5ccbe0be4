use axum::{
    extract::{Path, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    cache,
    errors::ApiError,
    middleware::AuthUser,
    models::{Movie, Review},
    services::sentiment,
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", post(create_movie).get(list_movies))
        .route("/movies/{id}/showtimes", get(movie_showtimes))
        .route("/movies/{id}/reviews", get(movie_reviews))
}

#[derive(Debug, Deserialize, Validate)]
struct CreateMovieRequest {
    #[validate(length(min = 1, max = 100))]
    title: String,
    #[validate(length(min = 1, max = 100))]
    director: String,
    rating: Option<f64>,
}

// POST /movies
async fn create_movie(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(req): Json<CreateMovieRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    sqlx::query("INSERT INTO movies (title, director, rating) VALUES ($1, $2, $3)")
        .bind(&req.title)
        .bind(&req.director)
        .bind(req.rating)
        .execute(&state.db.pool)
        .await?;

    state.cache.invalidate(cache::MOVIES_LIST_KEY).await;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Movie added successfully!" })),
    ))
}

// GET /movies
async fn list_movies(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    // Cache hit skips the DB and serialization entirely.
    if let Ok(Some(cached)) = state.cache.get_cached(cache::MOVIES_LIST_KEY).await {
        return Ok(json_response(cached, "HIT"));
    }

    let movies = Movie::list_all(&state.db).await?;
    let payload = serde_json::to_string(&json!({ "movies": movies }))
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    if let Err(e) = state
        .cache
        .cache(cache::MOVIES_LIST_KEY, &payload, cache::MOVIES_TTL_SECONDS)
        .await
    {
        tracing::warn!("Failed to cache movie list: {:?}", e);
    }

    Ok(json_response(payload, "MISS"))
}

#[derive(Debug, Serialize)]
struct ShowtimeListing {
    showtime_id: i64,
    time: String,
    theater: String,
    location: String,
    price: f64,
}

// GET /movies/{id}/showtimes
async fn movie_showtimes(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i64>,
) -> Result<Response, ApiError> {
    let cache_key = cache::showtimes_key(movie_id);
    if let Ok(Some(cached)) = state.cache.get_cached(&cache_key).await {
        return Ok(json_response(cached, "HIT"));
    }

    let movie = Movie::find_by_id(movie_id, &state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Movie not found".to_string()))?;

    let rows: Vec<(i64, chrono::NaiveDateTime, f64, String, String)> = sqlx::query_as(
        "SELECT s.id, s.show_time, s.price, t.name, t.location
         FROM showtimes s
         JOIN theaters t ON t.id = s.theater_id
         WHERE s.movie_id = $1
         ORDER BY s.show_time",
    )
    .bind(movie_id)
    .fetch_all(&state.db.pool)
    .await?;

    let showtimes: Vec<ShowtimeListing> = rows
        .into_iter()
        .map(|(id, show_time, price, theater, location)| ShowtimeListing {
            showtime_id: id,
            time: show_time.format("%Y-%m-%d %H:%M").to_string(),
            theater,
            location,
            price,
        })
        .collect();

    let payload = serde_json::to_string(&json!({
        "movie": movie.title,
        "showtimes": showtimes
    }))
    .map_err(|e| ApiError::Validation(e.to_string()))?;

    if let Err(e) = state
        .cache
        .cache(&cache_key, &payload, cache::SHOWTIMES_TTL_SECONDS)
        .await
    {
        tracing::warn!("Failed to cache showtime list: {:?}", e);
    }

    Ok(json_response(payload, "MISS"))
}

#[derive(Debug, Serialize)]
struct ReviewListing {
    id: i64,
    text: String,
    rating: i32,
    score: f64,
    verdict: &'static str,
}

// GET /movies/{id}/reviews
async fn movie_reviews(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let movie = Movie::find_by_id(movie_id, &state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Movie not found".to_string()))?;

    let reviews: Vec<ReviewListing> = Review::list_for_movie(movie_id, &state.db)
        .await?
        .into_iter()
        .map(|r| ReviewListing {
            id: r.id,
            text: r.text,
            rating: r.rating,
            score: r.sentiment,
            // Verdict is derived from the stored score, never re-analyzed.
            verdict: sentiment::verdict(r.sentiment),
        })
        .collect();

    Ok(Json(json!({ "movie": movie.title, "reviews": reviews })))
}

fn json_response(payload: String, cache_status: &'static str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/json"),
            (HeaderName::from_static("x-cache"), cache_status),
        ],
        payload,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_response_carries_cache_status_and_content_type() {
        let response = json_response(r#"{"movies":[]}"#.to_string(), "HIT");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-cache").unwrap(), "HIT");
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
