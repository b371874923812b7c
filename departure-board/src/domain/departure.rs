//! Departures as read from a stop's departure board.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Mode;

/// One departure from the home stop.
///
/// `when` is the realtime estimate if the upstream board had one, otherwise
/// the planned time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawDeparture {
    pub line_name: String,
    pub mode: Mode,
    /// Raw direction as reported upstream, before normalization.
    pub direction: String,
    pub when: DateTime<Utc>,
}

impl RawDeparture {
    pub fn new(
        line_name: impl Into<String>,
        mode: Mode,
        direction: impl Into<String>,
        when: DateTime<Utc>,
    ) -> Self {
        Self {
            line_name: line_name.into(),
            mode,
            direction: direction.into(),
            when,
        }
    }
}
