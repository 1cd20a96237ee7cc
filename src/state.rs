//! Application state shared by every handler.

use std::sync::Arc;
use std::time::Instant;

use sqlx::AnyPool;
use tokio::sync::OnceCell;

use crate::config::Config;
use crate::db::{self, Database};
use crate::error::ApiError;
use crate::readiness::{Readiness, WriteBlock};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Option<Database>,
    pub readiness: Arc<Readiness>,
    pub started_at: Instant,
    schema: Arc<OnceCell<()>>,
}

impl AppState {
    pub fn new(config: Config, db: Option<Database>, connected: bool, read_only: bool) -> Self {
        let readiness = Arc::new(Readiness::new(config.role, connected, read_only));
        Self {
            config: Arc::new(config),
            db,
            readiness,
            started_at: Instant::now(),
            schema: Arc::new(OnceCell::new()),
        }
    }

    /// Connect, bootstrap and build state. A database that cannot be reached
    /// is logged and leaves the instance serving with `connected = false`.
    pub async fn initialize(config: Config) -> Self {
        let database = match db::connect(&config.database).await {
            Ok(database) => {
                tracing::info!(driver = ?database.driver, "Database connection established.");
                database
            }
            Err(e) => {
                tracing::error!("Failed to connect to database: {}", e);
                let lazy = db::connect_lazy(&config.database)
                    .map_err(|e| tracing::error!("Invalid database configuration: {}", e))
                    .ok();
                return Self::new(config, lazy, false, false);
            }
        };

        let read_only = match db::is_read_only(&database).await {
            Ok(read_only) => read_only,
            Err(e) => {
                tracing::error!("Failed to read database read-only state: {}", e);
                return Self::new(config, Some(database), false, false);
            }
        };

        let state = Self::new(config, Some(database), true, read_only);
        if read_only {
            tracing::info!("Database is read-only, skipping schema bootstrap");
        } else if let Err(e) = state.ensure_schema().await {
            tracing::error!("Schema bootstrap failed: {}", e);
        }

        state
    }

    /// Create and seed tables, at most once per process. A failed attempt
    /// leaves the cell empty so the next caller tries again.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        let Some(database) = &self.db else {
            return Ok(());
        };

        self.schema
            .get_or_try_init(|| async {
                db::schema::bootstrap(database).await?;
                tracing::info!(driver = ?database.driver, "Schema ready");
                Ok::<(), sqlx::Error>(())
            })
            .await?;
        Ok(())
    }

    /// Pool for a read, or `Unavailable` without touching the database.
    pub fn pool(&self) -> Result<&AnyPool, ApiError> {
        match &self.db {
            Some(database) if self.readiness.is_connected() => Ok(&database.pool),
            _ => Err(ApiError::Unavailable),
        }
    }

    /// Pool for a write. Role and read-only policy are checked first.
    pub fn writable_pool(&self) -> Result<&AnyPool, ApiError> {
        self.readiness
            .check_writable()
            .map_err(|block: WriteBlock| ApiError::WriteRefused(block.reason().to_string()))?;
        self.pool()
    }
}
