use crate::redis_client::RedisClient;
use redis::AsyncCommands;
use tracing::info;

pub const MOVIES_LIST_KEY: &str = "movies:list";
pub const MOVIES_TTL_SECONDS: u64 = 3600;
pub const SHOWTIMES_TTL_SECONDS: u64 = 600;

pub fn showtimes_key(movie_id: i64) -> String {
    format!("showtimes:{}", movie_id)
}

// Read-side cache for the hot listing endpoints. Payloads are the serialized
// response bodies, so a hit skips both the DB and serialization. Any Redis
// failure degrades to the database.
#[derive(Clone)]
pub struct CacheService {
    redis: RedisClient,
}

impl CacheService {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }

    pub async fn get_cached(&self, key: &str) -> Result<Option<String>, redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        conn.get(key).await
    }

    pub async fn cache(
        &self,
        key: &str,
        payload: &str,
        ttl_seconds: u64,
    ) -> Result<(), redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        conn.set_ex(key, payload, ttl_seconds).await
    }

    pub async fn invalidate(&self, key: &str) {
        let mut conn = self.redis.conn.clone();
        let _: Result<(), _> = conn.del(key).await;
        info!("Invalidated cache key {}", key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn showtimes_keys_are_scoped_per_movie() {
        assert_eq!(showtimes_key(1), "showtimes:1");
        assert_ne!(showtimes_key(1), showtimes_key(2));
        assert_ne!(showtimes_key(1), MOVIES_LIST_KEY);
    }
}
