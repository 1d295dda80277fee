//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::PostService;
use blog_core::ports::{PostRepository, SessionTokenService};
use blog_infra::{InMemoryPostRepository, JwtSessionTokenService};

#[cfg(feature = "postgres")]
use blog_infra::{DatabasePool, PostgresPostRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub tokens: Arc<dyn SessionTokenService>,
    pub posts_per_page: i64,
}

impl AppState {
    /// Build the application state, falling back to the in-memory store
    /// when no database is reachable.
    pub async fn new(config: &AppConfig) -> Self {
        let repo = Self::post_repository(config).await;
        let tokens = Arc::new(JwtSessionTokenService::new(config.jwt.clone()));

        tracing::info!("Application state initialized");

        Self::from_parts(repo, tokens, config.posts_per_page)
    }

    pub fn from_parts(
        repo: Arc<dyn PostRepository>,
        tokens: Arc<dyn SessionTokenService>,
        posts_per_page: i64,
    ) -> Self {
        Self {
            posts: PostService::new(repo),
            tokens,
            posts_per_page,
        }
    }

    #[cfg(feature = "postgres")]
    async fn post_repository(config: &AppConfig) -> Arc<dyn PostRepository> {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Arc::new(InMemoryPostRepository::new());
        };

        match DatabasePool::init(db_config).await {
            Ok(pool) => Arc::new(PostgresPostRepository::new(pool.conn)),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Arc::new(InMemoryPostRepository::new())
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn post_repository(_config: &AppConfig) -> Arc<dyn PostRepository> {
        tracing::info!("Running without postgres feature - using in-memory repository");
        Arc::new(InMemoryPostRepository::new())
    }
}
