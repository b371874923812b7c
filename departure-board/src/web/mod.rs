//! Web layer for the departure board.
//!
//! Serves the assembled board as JSON for the renderer, plus a status view
//! for monitoring.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
