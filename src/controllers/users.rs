use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{errors::ApiError, middleware, models::User, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[derive(Debug, Deserialize, Validate)]
struct CredentialsRequest {
    #[validate(length(min = 1, max = 50, message = "username must be 1-50 characters"))]
    username: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    password: String,
}

// POST /register
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    if User::find_by_username(&req.username, &state.db)
        .await?
        .is_some()
    {
        return Err(ApiError::Validation("Username already exists".to_string()));
    }

    let password_hash = User::hash_password(&req.password)?;

    // Two concurrent registrations can both pass the lookup above; the UNIQUE
    // constraint decides, and the loser gets the same 400 as a sequential
    // duplicate.
    sqlx::query("INSERT INTO users (username, password_hash) VALUES ($1, $2)")
        .bind(&req.username)
        .bind(&password_hash)
        .execute(&state.db.pool)
        .await
        .map_err(map_username_conflict)?;

    tracing::info!(username = %req.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully!" })),
    ))
}

fn map_username_conflict(err: sqlx::Error) -> ApiError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            ApiError::Validation("Username already exists".to_string())
        }
        other => other.into(),
    }
}

// POST /login
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = User::find_by_username(&req.username, &state.db).await?;

    // Same rejection whether the user is unknown or the password is wrong.
    let user = user.filter(|u| u.verify_password(&req.password));
    let user = user.ok_or(ApiError::Unauthorized)?;

    let access_token = middleware::create_token(user.id, &state.config.jwt)?;

    Ok((StatusCode::OK, Json(json!({ "access_token": access_token }))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::error::Error as StdError;

    #[derive(Debug)]
    struct DuplicateKey;

    impl std::fmt::Display for DuplicateKey {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("duplicate key value violates unique constraint")
        }
    }

    impl StdError for DuplicateKey {}

    impl DatabaseError for DuplicateKey {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn duplicate_username_insert_maps_to_validation() {
        // A registration that loses the race past the pre-lookup trips the
        // unique constraint; that must read as the usual duplicate response.
        let err = map_username_conflict(sqlx::Error::Database(Box::new(DuplicateKey)));
        match err {
            ApiError::Validation(msg) => assert_eq!(msg, "Username already exists"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn other_database_errors_stay_internal() {
        let err = map_username_conflict(sqlx::Error::RowNotFound);
        assert!(matches!(err, ApiError::Database(_)));
    }
}
