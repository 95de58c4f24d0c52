use actix_web::dev::Service;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod domain;
mod metrics;
mod settings;
mod store;
mod utils;

use api::AppState;
use settings::{AppConfig, BackendKind};
use store::{KvBackend, MemoryBackend, OrderStore, RedisBackend, StoreResult};
use utils::{retry_on_transient, RetryConfig};

async fn connect_backend(config: &AppConfig) -> StoreResult<Arc<dyn KvBackend>> {
    let backend: Arc<dyn KvBackend> = match config.backend {
        BackendKind::Redis => {
            Arc::new(RedisBackend::connect(&config.redis_url, config.command_timeout()).await?)
        }
        BackendKind::Memory => Arc::new(MemoryBackend::new()),
    };

    backend.ping().await?;
    Ok(backend)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,orders_api=debug")),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    tracing::info!(
        backend = ?config.backend,
        redis_url = %store::redact_url(&config.redis_url),
        port = config.server_port,
        "Starting orders API"
    );

    // === 1. Key-value backend, checked once before serving ===
    let retry = RetryConfig {
        max_attempts: config.startup_ping_attempts,
        ..RetryConfig::default()
    };
    let backend = retry_on_transient(retry, "backend startup ping", |_attempt| connect_backend(&config))
        .await
        .into_result()
        .map_err(|e| anyhow::anyhow!("failed to reach key-value backend: {}", e))?;

    let store = OrderStore::new(backend);
    tracing::info!(backend = store.backend_name(), "Key-value backend reachable");

    // === 2. Metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);

    // === 3. HTTP server ===
    let state = web::Data::new(AppState::new(store, metrics.clone(), config.page_size));

    HttpServer::new(move || {
        let metrics = metrics.clone();

        App::new()
            .app_data(state.clone())
            .app_data(api::json_config())
            .wrap(middleware::Logger::default())
            .wrap_fn(move |req, srv| {
                let metrics = metrics.clone();
                let method = req.method().to_string();
                let route = req
                    .match_pattern()
                    .unwrap_or_else(|| "unmatched".to_string());
                let fut = srv.call(req);

                async move {
                    let res = fut.await?;
                    metrics.record_request(&method, &route, res.status().as_u16());
                    Ok(res)
                }
            })
            .configure(api::routes)
    })
    .bind(("0.0.0.0", config.server_port))?
    .shutdown_timeout(config.shutdown_timeout_secs)
    .run()
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}
