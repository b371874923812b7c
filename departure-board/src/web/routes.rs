//! HTTP route handlers.

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/board", get(board))
        .route("/board/status", get(status))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The assembled board, refreshed first if it is stale.
///
/// Never fails: upstream problems show up as stale or missing data.
async fn board(State(state): State<AppState>) -> Json<BoardResponse> {
    let snapshot = state.board.ensure_fresh().await;
    let display = snapshot.display(state.board.config());

    Json(BoardResponse::new(display, &snapshot))
}

/// Refresh status. Does not trigger a refresh.
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let snapshot = state.board.snapshot();

    Json(StatusResponse::from_snapshot(&snapshot, Utc::now()))
}
