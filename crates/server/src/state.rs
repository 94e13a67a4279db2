//! Application state shared across handlers.

use std::sync::Arc;

use moka::future::Cache;
use sqlx::PgPool;

use makhzan_core::qr;

use crate::config::ServerConfig;

/// Rendered QR PNGs cached per payload. Encoding is deterministic, so an
/// entry never goes stale.
const QR_CACHE_CAPACITY: u64 = 256;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    qr_cache: Cache<String, Arc<Vec<u8>>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                qr_cache: Cache::builder().max_capacity(QR_CACHE_CAPACITY).build(),
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Render the QR PNG for a payload, serving repeats from cache.
    ///
    /// # Errors
    ///
    /// Returns `qr::EncodeError` if the payload cannot be rendered.
    pub async fn qr_png(&self, payload: &str) -> Result<Arc<Vec<u8>>, qr::EncodeError> {
        if let Some(png) = self.inner.qr_cache.get(payload).await {
            return Ok(png);
        }

        let png = Arc::new(qr::encode(payload)?);
        self.inner
            .qr_cache
            .insert(payload.to_string(), Arc::clone(&png))
            .await;
        Ok(png)
    }
}
