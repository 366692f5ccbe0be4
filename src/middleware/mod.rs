use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{config::JwtConfig, errors::ApiError};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    // Stringified user id.
    pub sub: String,
    pub exp: usize,
}

pub fn create_token(user_id: i64, config: &JwtConfig) -> Result<String, ApiError> {
    let expires_at = Utc::now() + Duration::hours(config.expires_in_hours);
    let claims = Claims {
        sub: user_id.to_string(),
        exp: expires_at.timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok(token)
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
}

// Bearer-token extractor; protected handlers just take an AuthUser argument.
impl FromRequestParts<Arc<crate::AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        // An expired or tampered token is a 401, never a 500.
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.config.jwt.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| ApiError::Unauthorized)?;

        let user_id = data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(AuthUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expires_in_hours: 24,
        }
    }

    #[test]
    fn token_round_trips_user_id() {
        let config = test_config();
        let token = create_token(42, &config).unwrap();

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(config.secret.as_bytes()),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(data.claims.sub, "42");
        assert!(data.claims.exp > Utc::now().timestamp() as usize);
    }

    #[test]
    fn token_fails_with_wrong_secret() {
        let token = create_token(42, &test_config()).unwrap();

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"other-secret"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
