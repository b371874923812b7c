//! Display-ready route and connection types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Mode, Stopover};

/// A transfer onward from a station the home line reaches.
///
/// Derived from one selected journey and its transfer leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    /// Normalized direction of the transfer ride ("Ring" for circular lines).
    pub destination: String,
    pub line: String,
    /// Arrival of the initial ride at the transfer station.
    pub arrival: DateTime<Utc>,
    /// Departure of the transfer ride.
    pub departure: DateTime<Utc>,
    pub stopover: Stopover,
    /// Normalized name of the transfer station.
    pub change_station: String,
    pub mode: Mode,
}

/// One route on the board: a line in one direction from the home stop,
/// with its upcoming departures and the transfers reachable along it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDisplay {
    pub mode: Mode,
    pub line: String,
    /// The terminus the route was matched on.
    pub destination: String,
    pub departures: Vec<String>,
    pub connections: Vec<Connection>,
}
