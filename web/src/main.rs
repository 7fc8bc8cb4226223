//! Seckill flash-sale HTTP server.
//!
//! Startup order matters: the stock synchronizer must seed the fast
//! counter gate before the listener binds, and a synchronizer failure is
//! fatal — the process must not serve purchase traffic through an
//! unseeded or stale gate.

use metrics_exporter_prometheus::PrometheusBuilder;
use seckill_core::{FixedWindowLimiter, PurchaseCoordinator, StockSynchronizer, SystemClock};
use seckill_postgres::PostgresStore;
use seckill_redis::RedisCounterStore;
use seckill_web::{build_router, AppState, Config};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seckill=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting seckill HTTP server");

    // Load configuration
    let config = Config::from_env();
    info!(
        pg_host = %config.postgres.host,
        pg_database = %config.postgres.database,
        redis_url = %config.redis.url,
        "Configuration loaded"
    );

    // Durable store
    info!("Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .max_connections(config.postgres.max_connections)
        .connect_with(config.postgres.connect_options())
        .await?;
    let store = Arc::new(PostgresStore::new(pool));

    info!("Running database migrations...");
    store.migrate().await?;
    info!("Durable store ready");

    // Fast counter store
    info!("Connecting to Redis...");
    let counters = Arc::new(RedisCounterStore::connect(&config.redis.url).await?);
    info!("Fast counter store connected");

    // Metrics exporter (scraped out-of-band; never on the request path)
    let metrics_addr: SocketAddr = format!(
        "{}:{}",
        config.server.metrics_host, config.server.metrics_port
    )
    .parse()?;
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()?;
    seckill_web::metrics::register_business_metrics();
    info!(address = %metrics_addr, "Metrics exporter listening");

    // Seed the stock gate before accepting traffic; failure here is fatal.
    info!("Synchronizing stock counters...");
    let synchronizer = StockSynchronizer::new(store.clone(), counters.clone());
    let report = synchronizer.run().await?;
    info!(
        seeded = report.seeded,
        skipped = report.skipped,
        "Stock gate seeded"
    );

    // Wire the coordination core
    let coordinator = Arc::new(PurchaseCoordinator::new(counters.clone(), store.clone()));
    let limiter = Arc::new(FixedWindowLimiter::new(counters, Arc::new(SystemClock)));
    let state = AppState::new(coordinator, limiter, store);

    // Build router
    let app = build_router(state);

    // Create server address
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    // Run server with graceful shutdown; connect info feeds the
    // client-identity fallback for rate limiting.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

/// Graceful shutdown signal handler.
///
/// Waits for Ctrl+C (SIGINT) or SIGTERM (in production environments).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
