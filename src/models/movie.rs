use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::Database;

// Immutable once created: there are no update/delete endpoints.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub director: String,
    pub rating: Option<f64>,
}

impl Movie {
    pub async fn find_by_id(id: i64, db: &Database) -> Result<Option<Movie>, sqlx::Error> {
        sqlx::query_as::<_, Movie>("SELECT id, title, director, rating FROM movies WHERE id = $1")
            .bind(id)
            .fetch_optional(&db.pool)
            .await
    }

    pub async fn list_all(db: &Database) -> Result<Vec<Movie>, sqlx::Error> {
        sqlx::query_as::<_, Movie>("SELECT id, title, director, rating FROM movies ORDER BY id")
            .fetch_all(&db.pool)
            .await
    }
}
