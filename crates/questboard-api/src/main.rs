//! Quest Board API server entry point.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use questboard_core::clock::{Clock, SystemClock};
use questboard_core::rng::{DeterministicRng, StdRandRng};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use questboard_api::config::AppConfig;
use questboard_api::error::AppError;
use questboard_api::routes;
use questboard_api::state::AppState;
use questboard_api::sweeper;

/// How often idle sessions are looked for.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Quest Board API server");

    // Read configuration from environment.
    let config = AppConfig::from_env()?;
    let addr = config.bind_addr()?;
    let max_idle = chrono::Duration::from_std(config.session_idle_timeout)
        .map_err(|e| AppError::Config(format!("QUEST_BOARD_SESSION_IDLE_SECS out of range: {e}")))?;

    // Build application state.
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let rng = match config.rng_seed {
        Some(seed) => StdRandRng::seeded(seed),
        None => StdRandRng::from_entropy(),
    };
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
    let app_state = AppState::with_rewards(&config, clock, rng);

    let _sweeper = sweeper::spawn_idle_sweeper(app_state.sessions.clone(), max_idle, SWEEP_INTERVAL);

    // Build router.
    let app = routes::app_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    tracing::info!(quests = config.quests.len(), "Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
