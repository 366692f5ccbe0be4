use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::Database;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Theater {
    pub id: i64,
    pub name: String,
    pub location: String,
}

impl Theater {
    pub async fn find_by_id(id: i64, db: &Database) -> Result<Option<Theater>, sqlx::Error> {
        sqlx::query_as::<_, Theater>("SELECT id, name, location FROM theaters WHERE id = $1")
            .bind(id)
            .fetch_optional(&db.pool)
            .await
    }
}
