use tracing_subscriber::EnvFilter;

use tagrec_api::{
    config::{Config, StorageBackend},
    db::{create_pool, create_redis_client, run_migrations, Cache, CacheWriterHandle},
    repository::{CachedStore, MemoryStore, PgStore, Store},
    routes::{create_router, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let (state, cache_writer) = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url, config.db_max_connections).await?;
            run_migrations(&pool).await?;
            build_state(PgStore::new(pool), &config)?
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            build_state(MemoryStore::new(), &config)?
        }
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Puts the snapshot cache in front of `store` when Redis is configured
fn build_state<S: Store + 'static>(
    store: S,
    config: &Config,
) -> anyhow::Result<(AppState, Option<CacheWriterHandle>)> {
    match config.snapshot_cache_url() {
        Some(redis_url) => {
            let client = create_redis_client(redis_url)?;
            let (cache, handle) = Cache::new(client);
            tracing::info!(
                ttl_secs = config.snapshot_cache_ttl_secs,
                "Snapshot cache enabled"
            );
            let store = CachedStore::new(store, cache, config.snapshot_cache_ttl_secs);
            Ok((AppState::from_store(store), Some(handle)))
        }
        None => Ok((AppState::from_store(store), None)),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
