//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::BoardCache;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Board state and refresh scheduling
    pub board: Arc<BoardCache>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(board: Arc<BoardCache>) -> Self {
        Self { board }
    }
}
