//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::PostStore;
use blog_infra::{DatabaseConfig, InMemoryPostStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
}

impl AppState {
    /// Build the application state with the store matching the configuration.
    ///
    /// Without a database URL the server runs on the in-memory store.
    /// A configured database that cannot be reached is an error.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> anyhow::Result<Self> {
        let posts: Arc<dyn PostStore> = match db_config {
            #[cfg(feature = "postgres")]
            Some(config) => {
                let conn = blog_infra::database::connect(config).await?;
                Arc::new(blog_infra::PostgresPostStore::new(conn))
            }
            #[cfg(not(feature = "postgres"))]
            Some(_) => {
                tracing::warn!(
                    "Database configured but postgres feature is disabled - using in-memory store"
                );
                Arc::new(InMemoryPostStore::new())
            }
            None => {
                tracing::warn!("No database URL set. Running with the in-memory post store.");
                Arc::new(InMemoryPostStore::new())
            }
        };

        tracing::info!("Application state initialized");

        Ok(Self { posts })
    }

    /// State over an existing store.
    pub fn with_store(posts: Arc<dyn PostStore>) -> Self {
        Self { posts }
    }
}
