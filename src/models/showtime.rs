use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::Database;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Showtime {
    pub id: i64,
    pub show_time: NaiveDateTime,
    pub price: f64,
    pub movie_id: i64,
    pub theater_id: i64,
}

impl Showtime {
    pub async fn find_by_id(id: i64, db: &Database) -> Result<Option<Showtime>, sqlx::Error> {
        sqlx::query_as::<_, Showtime>(
            "SELECT id, show_time, price, movie_id, theater_id FROM showtimes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&db.pool)
        .await
    }
}
