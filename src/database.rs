use std::sync::{
    Arc,
    atomic::{AtomicU8, Ordering},
};

use anyhow::Context;
use serde::Serialize;
use sqlx::PgPool;
use tokio::{
    sync::RwLock,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{error, info, instrument, warn};

use crate::{configuration::DatabaseSettings, error::format_error_details};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Observable state of the connection pool, reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PoolStatus {
    Healthy = 0,
    Reconnecting = 1,
    Degraded = 2,
}

impl From<u8> for PoolStatus {
    fn from(value: u8) -> Self {
        match value {
            0 => PoolStatus::Healthy,
            1 => PoolStatus::Reconnecting,
            _ => PoolStatus::Degraded,
        }
    }
}

/// Owns the one live Postgres pool.
///
/// The pool is replaced wholesale on failure, never patched in place: readers
/// take a cheap clone of the current handle, so a swap by the health-check
/// task is a single atomic handoff and in-flight queries finish on the old
/// pool.
#[derive(Clone)]
pub struct Database {
    pool: Arc<RwLock<PgPool>>,
    status: Arc<AtomicU8>,
    settings: DatabaseSettings,
}

impl Database {
    /// Applies pending migrations, opens the pool and verifies connectivity.
    /// Startup must treat a failure here as fatal.
    #[instrument(name = "Initializing database", skip_all)]
    pub async fn init(settings: &DatabaseSettings) -> Result<Self, anyhow::Error> {
        let pool = open_pool(settings).await?;
        info!("Database pool initialized");
        Ok(Self {
            pool: Arc::new(RwLock::new(pool)),
            status: Arc::new(AtomicU8::new(PoolStatus::Healthy as u8)),
            settings: settings.clone(),
        })
    }

    /// Handle over a pool that only connects on first use. No migrations, no
    /// connectivity check.
    pub fn connect_lazy(settings: &DatabaseSettings) -> Self {
        Self {
            pool: Arc::new(RwLock::new(settings.get_pg_pool())),
            status: Arc::new(AtomicU8::new(PoolStatus::Healthy as u8)),
            settings: settings.clone(),
        }
    }

    /// The current pool handle. Callers hold their clone for the duration of
    /// a query; a concurrent swap is not visible to them.
    pub async fn pool(&self) -> PgPool {
        self.pool.read().await.clone()
    }

    pub fn status(&self) -> PoolStatus {
        PoolStatus::from(self.status.load(Ordering::SeqCst))
    }

    fn set_status(&self, status: PoolStatus) {
        self.status.store(status as u8, Ordering::SeqCst);
    }

    /// Spawns the background health-check loop. It shares no lock with query
    /// execution beyond the brief pool-handle swap.
    pub fn spawn_health_check(&self) -> JoinHandle<()> {
        let db = self.clone();
        tokio::spawn(async move { db.health_check_loop().await })
    }

    async fn health_check_loop(self) {
        let mut ticker = interval(self.settings.health_check_interval_ms);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let pool = self.pool().await;
            if ping(&pool).await.is_ok() {
                self.set_status(PoolStatus::Healthy);
                continue;
            }

            warn!("lost connection to Postgres, reopening the pool");
            self.set_status(PoolStatus::Reconnecting);

            match open_pool(&self.settings).await {
                Ok(new_pool) => {
                    *self.pool.write().await = new_pool;
                    self.set_status(PoolStatus::Healthy);
                    info!("successfully reconnected to Postgres");
                }
                Err(e) => {
                    self.set_status(PoolStatus::Degraded);
                    error!(
                        error = %format_error_details(&e),
                        "failed to reconnect to Postgres, retrying at the next interval"
                    );
                }
            }
        }
    }
}

#[instrument(name = "Opening connection pool", skip_all)]
async fn open_pool(settings: &DatabaseSettings) -> Result<PgPool, anyhow::Error> {
    let pool = settings.get_pg_pool();
    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to apply database migrations")?;
    ping(&pool).await.context("Failed to ping Postgres")?;
    Ok(pool)
}

async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
