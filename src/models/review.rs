use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::database::Database;

// sentiment is computed once at creation and never recomputed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub movie_id: i64,
    pub text: String,
    pub rating: i32,
    pub sentiment: f64,
    pub created_at: NaiveDateTime,
}

impl Review {
    pub async fn list_for_movie(movie_id: i64, db: &Database) -> Result<Vec<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            "SELECT id, user_id, movie_id, text, rating, sentiment, created_at
             FROM reviews WHERE movie_id = $1
             ORDER BY created_at DESC, id",
        )
        .bind(movie_id)
        .fetch_all(&db.pool)
        .await
    }
}
