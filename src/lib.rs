pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod redis_client;
pub mod services;

use std::sync::Arc;

use crate::services::broadcast::SeatEventBroadcaster;
use crate::services::payment::{MockPaymentGateway, PaymentProcessor};

// Shared state for the whole application
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub redis: redis_client::RedisClient,
    pub cache: cache::CacheService,
    pub config: config::Config,
    pub broadcaster: SeatEventBroadcaster,
    // Behind a trait so a real gateway (or a test double) can be swapped in
    // without touching the booking coordinator.
    pub payment: Arc<dyn PaymentProcessor>,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::new(&config.database.url, config.database.pool_size).await?;

        db.run_migrations().await?;

        let redis = redis_client::RedisClient::new(&config.redis.url).await?;
        let cache = cache::CacheService::new(redis.clone());
        let broadcaster = SeatEventBroadcaster::new();
        let payment: Arc<dyn PaymentProcessor> =
            Arc::new(MockPaymentGateway::from_config(&config.payment));

        Ok(Arc::new(Self {
            db,
            redis,
            cache,
            config,
            broadcaster,
            payment,
        }))
    }
}
