use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::database::Database;

// seat_code is a plain string, not a FK to seats; the coordinator validates
// it against the showtime's theater before inserting.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub showtime_id: i64,
    pub seat_code: String,
    pub transaction_id: String,
    pub created_at: NaiveDateTime,
}

impl Booking {
    pub async fn exists(
        showtime_id: i64,
        seat_code: &str,
        db: &Database,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE showtime_id = $1 AND seat_code = $2)",
        )
        .bind(showtime_id)
        .bind(seat_code)
        .fetch_one(&db.pool)
        .await
    }

    /// Inserts the booking unless the (showtime_id, seat_code) pair is already
    /// taken. `None` means a concurrent booking holds the seat.
    pub async fn insert(
        user_id: i64,
        showtime_id: i64,
        seat_code: &str,
        transaction_id: &str,
        db: &Database,
    ) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO bookings (user_id, showtime_id, seat_code, transaction_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (showtime_id, seat_code) DO NOTHING
             RETURNING id",
        )
        .bind(user_id)
        .bind(showtime_id)
        .bind(seat_code)
        .bind(transaction_id)
        .fetch_optional(&db.pool)
        .await
    }

    pub async fn list_for_user(user_id: i64, db: &Database) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            "SELECT id, user_id, showtime_id, seat_code, transaction_id, created_at
             FROM bookings WHERE user_id = $1
             ORDER BY created_at DESC, id",
        )
        .bind(user_id)
        .fetch_all(&db.pool)
        .await
    }
}
