//! Application state - shared across all handlers.

use std::sync::Arc;

use bloglist_core::ports::{BlogRepository, PasswordService, TokenService, UserRepository};
use bloglist_infra::{
    Argon2PasswordService, InMemoryBlogRepository, InMemoryStore, InMemoryUserRepository,
    JwtTokenService,
};

#[cfg(feature = "postgres")]
use bloglist_infra::{DbPool, PostgresBlogRepository, PostgresUserRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blogs: Arc<dyn BlogRepository>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DbPool>>,
}

impl AppState {
    /// Build the application state from configuration.
    ///
    /// Falls back to in-memory repositories when no database is configured
    /// or the database cannot be reached.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        if let Some(state) = Self::connect(config, tokens.clone(), passwords.clone()).await {
            tracing::info!("Application state initialized (postgres)");
            return state;
        }

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory(tokens, passwords)
    }

    #[cfg(feature = "postgres")]
    async fn connect(
        config: &AppConfig,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Option<Self> {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return None;
        };

        match DbPool::init(db_config).await {
            Ok(pool) => {
                let pool = Arc::new(pool);
                Some(Self {
                    blogs: Arc::new(PostgresBlogRepository::new(pool.conn.clone())),
                    users: Arc::new(PostgresUserRepository::new(pool.conn.clone())),
                    tokens,
                    passwords,
                    db: Some(pool),
                })
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                None
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(
        config: &AppConfig,
        _tokens: Arc<dyn TokenService>,
        _passwords: Arc<dyn PasswordService>,
    ) -> Option<Self> {
        if config.database.is_some() {
            tracing::warn!("Built without postgres feature - ignoring database configuration");
        }
        None
    }

    /// State backed by in-memory repositories.
    pub fn in_memory(tokens: Arc<dyn TokenService>, passwords: Arc<dyn PasswordService>) -> Self {
        let store = InMemoryStore::new();

        Self {
            blogs: Arc::new(InMemoryBlogRepository::new(store.clone())),
            users: Arc::new(InMemoryUserRepository::new(store)),
            tokens,
            passwords,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    /// Storage status for the health endpoint.
    #[cfg(feature = "postgres")]
    pub async fn storage_status(&self) -> &'static str {
        let Some(pool) = &self.db else {
            return "in-memory";
        };

        match pool.ping().await {
            Ok(()) => "up",
            Err(e) => {
                tracing::warn!(error = %e, "Database ping failed");
                "down"
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    pub async fn storage_status(&self) -> &'static str {
        "in-memory"
    }
}
