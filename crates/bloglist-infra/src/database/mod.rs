//! Persistence: PostgreSQL via SeaORM, with an in-memory fallback.

mod memory;
mod pool;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use memory::{InMemoryBlogRepository, InMemoryStore, InMemoryUserRepository};
pub use pool::DatabaseConfig;

#[cfg(feature = "postgres")]
pub use pool::DbPool;

#[cfg(feature = "postgres")]
pub use postgres_repo::{PostgresBlogRepository, PostgresUserRepository};
