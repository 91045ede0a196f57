//! Serves the reviewer rota HTTP API.
//!
//! Configuration is read from the environment (see
//! [`reviewer_rota::config::Config`]). Without `DATABASE_URL` the server keeps
//! its state in memory and loses it on exit. With it, pending migrations are
//! applied before the listener is bound.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use mockable::DefaultClock;
use reviewer_rota::config::{Config, ConfigError};
use reviewer_rota::http::router;
use reviewer_rota::review::adapters::memory::InMemoryReviewRepository;
use reviewer_rota::review::adapters::postgres::{
    MigrationError, PostgresReviewRepository, ReviewPgPool, run_migrations,
};
use reviewer_rota::review::ports::ReviewRepository;
use reviewer_rota::review::services::ReviewEngine;
use reviewer_rota::telemetry::{TelemetryError, init_tracing};
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tracing::{info, warn};

/// Errors that stop the server.
#[derive(Debug, Error)]
enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("database pool failed: {0}")]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error("database setup task failed: {0}")]
    Join(#[from] JoinError),
    #[error("server I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = Config::from_env()?;
    init_tracing(&config.log_filter)?;

    let Some(url) = config.database_url.clone() else {
        warn!("DATABASE_URL not set; state is kept in memory");
        return serve(Arc::new(InMemoryReviewRepository::new()), &config).await;
    };
    let pool = migrate(connect(url, config.pool_size).await?).await?;
    info!(pool_size = config.pool_size, "using PostgreSQL storage");
    serve(Arc::new(PostgresReviewRepository::new(pool)), &config).await
}

async fn connect(url: String, max_size: u32) -> Result<ReviewPgPool, ServerError> {
    let pool = tokio::task::spawn_blocking(move || {
        Pool::builder()
            .max_size(max_size)
            .build(ConnectionManager::<PgConnection>::new(url))
    })
    .await??;
    Ok(pool)
}

async fn migrate(pool: ReviewPgPool) -> Result<ReviewPgPool, ServerError> {
    tokio::task::spawn_blocking(move || -> Result<ReviewPgPool, ServerError> {
        let mut connection = pool.get()?;
        let applied = run_migrations(&mut connection)?;
        info!(applied, "database schema is up to date");
        Ok(pool)
    })
    .await?
}

async fn serve<R>(repository: Arc<R>, config: &Config) -> Result<(), ServerError>
where
    R: ReviewRepository + 'static,
{
    let engine = Arc::new(ReviewEngine::new(repository, Arc::new(DefaultClock)));
    let app = router(engine, config.request_timeout);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => info!("interrupt received"),
        () = terminate => info!("terminate received"),
    }
    info!("shutdown requested");
}
