use std::sync::{Arc, Mutex};

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use roomdesk::config::AppConfig;
use roomdesk::handlers;
use roomdesk::state::AppState;
use roomdesk::store::SheetStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let sheet = SheetStore::open(&config.sheet_path)?;
    tracing::info!(path = %config.sheet_path, "booking sheet open");

    let state = Arc::new(AppState {
        sheet: Mutex::new(sheet),
        config: config.clone(),
    });

    // One endpoint, three verbs: the booking form and the admin panel
    // both talk to /exec, the way the original sheet web app exposed it.
    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/exec",
            get(handlers::bookings::get_bookings)
                .post(handlers::bookings::post_bookings)
                .put(handlers::bookings::put_bookings),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
