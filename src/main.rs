use std::sync::Arc;

use storefront_web::{
    AppState, HttpConnector,
    config::{AppConfig, Env},
    create_router,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, initialises logging and serves the storefront shell.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast in production)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise verbose for this crate.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storefront_web=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Storefront shell starting in {:?} mode", config.env);
    tracing::info!(backend = %config.api_base(), "Using storefront backend");

    // 3. Backend connector: one cookie-carrying client per session.
    let connector = Arc::new(HttpConnector::new(
        config.api_base(),
        config.backend_timeout,
    ));
    let bind_addr = config.bind_addr.clone();
    let session_ttl = config.session_ttl;
    let state = AppState::new(config, connector);

    // 4. Idle sessions are also swept on a timer, not only when new ones open.
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut sweep = tokio::time::interval(session_ttl);
        loop {
            sweep.tick().await;
            sessions.evict_idle();
        }
    });

    let app = create_router(state);

    // 5. Server
    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: failed to bind BIND_ADDR");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: server terminated unexpectedly");
}
