use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    errors::ApiError, middleware::AuthUser, models::Movie, services::sentiment, AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/reviews", post(create_review))
}

#[derive(Debug, Deserialize, Validate)]
struct CreateReviewRequest {
    movie_id: i64,
    text: String,
    #[validate(range(min = 1, max = 10, message = "rating must be between 1 and 10"))]
    rating: i32,
}

// POST /reviews — scores the text once at creation; the stored score is
// never recomputed.
async fn create_review(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    if Movie::find_by_id(req.movie_id, &state.db).await?.is_none() {
        return Err(ApiError::NotFound("Movie not found".to_string()));
    }

    let analysis = sentiment::analyze(&req.text);

    sqlx::query(
        "INSERT INTO reviews (user_id, movie_id, text, rating, sentiment)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user.user_id)
    .bind(req.movie_id)
    .bind(&req.text)
    .bind(req.rating)
    .bind(analysis.score)
    .execute(&state.db.pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Review added!",
            "sentiment_analysis": {
                "score": analysis.score,
                "verdict": analysis.verdict
            }
        })),
    ))
}
