use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    http::{HeaderValue, Method},
    routing::post,
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use leavedesk_backend::{
    api,
    config::{Config, LogFormat},
    seed,
    store::{MemoryStore, Store},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (dev convenience)
    let _ = dotenvy::dotenv();

    let cfg = Config::from_env()?;

    // Tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    match cfg.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }

    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    seed::seed_departments(store.as_ref()).await?;
    if cfg.seed_default_users {
        seed::seed_default_users(store.as_ref()).await?;
    }

    let state = AppState::new(&cfg, store).await?;
    tracing::info!(
        allowance = cfg.monthly_leave_allowance,
        scope = ?cfg.reviewer_scope,
        timezone = %cfg.timezone,
        "Services ready"
    );

    // Login gets its own limiter: 5 attempts in a burst, refilled at 2/s per IP.
    let governor = GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(5)
        .finish()
        .context("invalid rate limiter configuration")?;
    let login = Router::new()
        .route("/api/auth/login", post(api::auth::login))
        .layer(GovernorLayer {
            config: Arc::new(governor),
        })
        .with_state(state.clone());

    // CORS
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any)
        .allow_origin(
            cfg.cors_origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        );

    let app = api::router(state)
        .merge(login)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("Listening on {}", cfg.listen_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
