use std::net::SocketAddr;
use std::sync::Arc;

use departure_board::board::BoardConfig;
use departure_board::cache::BoardCache;
use departure_board::hafas::HafasClient;
use departure_board::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Default listen address.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load config (fail fast if a configured file is unusable)
    let config = match std::env::var("BOARD_CONFIG") {
        Ok(path) => {
            let config = BoardConfig::from_file(&path).expect("Failed to load board config");
            info!(path = %path, "Loaded board config");
            config
        }
        Err(_) => {
            info!("BOARD_CONFIG not set, using built-in config");
            BoardConfig::default()
        }
    };
    config.validate().expect("Invalid board config");

    let addr: SocketAddr = std::env::var("BOARD_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .expect("Invalid BOARD_ADDR");

    info!(
        home_stop = %config.home_stop,
        inbound = config.inbound_slots,
        outbound = config.outbound_slots,
        api = %config.api.base_url,
        "Starting departure board"
    );

    let client = HafasClient::new(&config.api).expect("Failed to create HAFAS client");
    let config = Arc::new(config);
    let board = Arc::new(BoardCache::new(client, Arc::clone(&config)));

    // Initial fetch, so the first request doesn't wait for upstream
    let snapshot = board.ensure_fresh().await;
    info!(departures = snapshot.departures.len(), "Initial refresh done");

    // Spawn background task to keep the board fresh
    let board_refresh = Arc::clone(&board);
    let refresh_interval = config
        .min_refresh_interval()
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(50));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_interval);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            let snapshot = board_refresh.ensure_fresh().await;
            if snapshot.departures.is_empty() {
                warn!("Board is empty after refresh");
            }
        }
    });

    let app = create_router(AppState::new(board));

    info!(%addr, "Departure board listening");
    info!("  GET  /health        - Health check");
    info!("  GET  /board         - Assembled board");
    info!("  GET  /board/status  - Refresh status");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
