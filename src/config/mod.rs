use serde::Deserialize;
use std::env;

// Top-level configuration container, one section per concern
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub payment: PaymentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_in_hours: i64,
}

// Knobs for the simulated payment gateway. Latency and decline rate are
// configuration, not constants, so tests can run with zero latency and a
// deterministic decline rate.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    pub latency_ms: u64,
    pub decline_rate: f64,
    pub timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .expect("PORT must be a valid number"),
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "movie_system=debug,tower_http=debug".to_string()),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
                pool_size: env::var("DB_POOL_SIZE")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .expect("DB_POOL_SIZE must be a valid number"),
            },
            redis: RedisConfig {
                url: env::var("REDIS_URL").expect("REDIS_URL must be set"),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
                expires_in_hours: env::var("JWT_EXPIRES_IN_HOURS")
                    .unwrap_or_else(|_| "24".to_string())
                    .parse()
                    .expect("JWT_EXPIRES_IN_HOURS must be a valid number"),
            },
            payment: PaymentConfig {
                latency_ms: env::var("PAYMENT_LATENCY_MS")
                    .unwrap_or_else(|_| "2000".to_string())
                    .parse()
                    .expect("PAYMENT_LATENCY_MS must be a valid number"),
                decline_rate: env::var("PAYMENT_DECLINE_RATE")
                    .unwrap_or_else(|_| "0.1".to_string())
                    .parse()
                    .expect("PAYMENT_DECLINE_RATE must be a valid number"),
                timeout_seconds: env::var("PAYMENT_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .expect("PAYMENT_TIMEOUT_SECONDS must be a valid number"),
            },
        }
    }
}
