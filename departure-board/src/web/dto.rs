//! Data transfer objects for web responses.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::board::BoardDisplay;
use crate::cache::BoardSnapshot;
use crate::domain::RouteDisplay;

/// Response for `GET /board`.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    /// Night layout: routes are north to south
    pub night: bool,

    /// Start of the refresh cycle the data comes from
    pub refreshed_at: DateTime<Utc>,

    /// Routes in display order
    pub routes: Vec<RouteDisplay>,
}

impl BoardResponse {
    /// Create from an assembled board and the snapshot it came from.
    pub fn new(display: BoardDisplay, snapshot: &BoardSnapshot) -> Self {
        Self {
            night: display.night,
            refreshed_at: snapshot.refreshed_at,
            routes: display.routes,
        }
    }
}

/// Response for `GET /board/status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Start of the last refresh cycle, `None` before the first one
    pub refreshed_at: Option<DateTime<Utc>>,

    /// Seconds since the last refresh cycle started
    pub age_secs: Option<i64>,

    /// Departures on the raw board
    pub departures: usize,

    /// Direction groups
    pub directions: usize,

    pub inbound_connections: usize,
    pub outbound_connections: usize,
}

impl StatusResponse {
    /// Create from a snapshot, relative to `now`.
    pub fn from_snapshot(snapshot: &BoardSnapshot, now: DateTime<Utc>) -> Self {
        let refreshed_at = Some(snapshot.refreshed_at)
            .filter(|t| *t != DateTime::<Utc>::UNIX_EPOCH);

        Self {
            refreshed_at,
            age_secs: refreshed_at.map(|t| now.signed_duration_since(t).num_seconds()),
            departures: snapshot.departures.len(),
            directions: snapshot.groups.len(),
            inbound_connections: snapshot.inbound.len(),
            outbound_connections: snapshot.outbound.len(),
        }
    }
}
