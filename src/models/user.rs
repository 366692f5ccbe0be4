use serde::Serialize;
use sqlx::FromRow;

use crate::database::Database;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    pub async fn find_by_username(
        username: &str,
        db: &Database,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&db.pool)
        .await
    }

    pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST)
    }

    pub fn verify_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        // Low cost to keep the test quick; production uses DEFAULT_COST.
        let hash = bcrypt::hash("hunter2", 4).unwrap();
        let user = User {
            id: 1,
            username: "alice".to_string(),
            password_hash: hash,
        };

        assert!(user.verify_password("hunter2"));
        assert!(!user.verify_password("hunter3"));
    }

    #[test]
    fn stored_credential_is_not_plaintext() {
        let hash = User::hash_password("secret").unwrap();
        assert_ne!(hash, "secret");
        assert!(hash.starts_with("$2"));
    }
}
