use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::Database;

// Seats are theater-scoped: a code like "A1" is valid for every showtime in
// its theater.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Seat {
    pub id: i64,
    pub theater_id: i64,
    pub row: String,
    pub number: i32,
    pub code: String,
}

impl Seat {
    pub async fn exists(
        theater_id: i64,
        code: &str,
        db: &Database,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM seats WHERE theater_id = $1 AND code = $2)",
        )
        .bind(theater_id)
        .bind(code)
        .fetch_one(&db.pool)
        .await
    }

    pub async fn list_for_theater(
        theater_id: i64,
        db: &Database,
    ) -> Result<Vec<Seat>, sqlx::Error> {
        sqlx::query_as::<_, Seat>(
            r#"SELECT id, theater_id, "row", number, code
               FROM seats WHERE theater_id = $1 ORDER BY "row", number"#,
        )
        .bind(theater_id)
        .fetch_all(&db.pool)
        .await
    }
}

/// Expands a seating layout into (row, number, code) triples: rows ["A", "B"]
/// with 3 seats per row become A1..A3, B1..B3.
pub fn codes_for_layout(rows: &[String], seats_per_row: i32) -> Vec<(String, i32, String)> {
    let mut seats = Vec::with_capacity(rows.len() * seats_per_row.max(0) as usize);
    for row in rows {
        for num in 1..=seats_per_row {
            seats.push((row.clone(), num, format!("{}{}", row, num)));
        }
    }
    seats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_expands_rows_times_seats() {
        let rows = vec!["A".to_string(), "B".to_string()];
        let seats = codes_for_layout(&rows, 3);

        assert_eq!(seats.len(), 6);
        assert_eq!(seats[0], ("A".to_string(), 1, "A1".to_string()));
        assert_eq!(seats[5], ("B".to_string(), 3, "B3".to_string()));
    }

    #[test]
    fn layout_with_zero_seats_per_row_is_empty() {
        let rows = vec!["A".to_string()];
        assert!(codes_for_layout(&rows, 0).is_empty());
    }

    #[test]
    fn codes_are_unique_within_a_layout() {
        let rows: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        let seats = codes_for_layout(&rows, 10);
        let mut codes: Vec<&str> = seats.iter().map(|(_, _, c)| c.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 30);
    }
}
