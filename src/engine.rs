//! Process-wide state shared by every request handler.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::AppConfig;
use crate::fetch::PartitionFetcher;
use crate::partition::Resolver;

/// The engine owns the connection pool and the pieces of configuration
/// the handlers need. One instance lives behind an `Arc` for the whole
/// process.
pub struct ScanEngine {
    fetcher: PartitionFetcher,
    resolver: Resolver,
    static_dir: PathBuf,
}

impl ScanEngine {
    /// Build the engine from configuration.
    ///
    /// The pool is lazy: no connection is opened until the first
    /// request borrows one, and every borrow is health-checked.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .test_before_acquire(true)
            .connect_lazy(&config.database.url)
            .context("Failed to configure database pool")?;

        Ok(Self::with_pool(pool, config))
    }

    /// Assemble the engine around an existing pool.
    pub fn with_pool(pool: PgPool, config: &AppConfig) -> Self {
        let query_timeout = Duration::from_secs(config.database.query_timeout_secs);
        ScanEngine {
            fetcher: PartitionFetcher::new(pool, query_timeout),
            resolver: Resolver::new(config.scan.pin_demo_partition),
            static_dir: PathBuf::from(config.paths.static_dir()),
        }
    }

    pub fn fetcher(&self) -> &PartitionFetcher {
        &self.fetcher
    }

    pub fn resolver(&self) -> Resolver {
        self.resolver
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    /// Close the pool, waiting for checked-out connections to drain.
    pub async fn shutdown(&self) {
        self.fetcher.pool().close().await;
        info!("Database pool closed");
    }
}
