//! Redis connection pool module.

mod redis_pool;

pub(crate) use redis_pool::redact;
pub use redis_pool::{
    create_shared_pool, RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool,
};
