//! Transfer selection.
//!
//! A journeys query from the home stop returns up to two itineraries, each
//! starting with a ride on the home line. The board wants the onward ride at
//! the first station where the rider changes: its line, direction and how
//! long the wait there is.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::domain::{
    Connection, LineBehaviors, RING_DESTINATION, Stopover, normalize, transfer_leg_index,
};
use crate::hafas::{ConversionError, JourneysResponse, convert_leg, leg_departure};

/// Journeys leaving sooner than this can't be caught any more.
const MIN_LEAD_SECS: i64 = 30;

/// Select the connection to show for one journeys response.
///
/// Returns `None` if no journey leaves far enough in the future, the chosen
/// journey has no transfer, the wait is unbounded, or the chosen journey is
/// malformed. Malformed data is logged.
pub fn select_transfer(
    response: &JourneysResponse,
    now: DateTime<Utc>,
    lines: &LineBehaviors,
) -> Option<Connection> {
    match try_select_transfer(response, now, lines) {
        Ok(connection) => connection,
        Err(e) => {
            warn!(error = %e, "Discarding malformed journey");
            None
        }
    }
}

/// Like [`select_transfer`], but reports malformed data as an error.
pub fn try_select_transfer(
    response: &JourneysResponse,
    now: DateTime<Utc>,
    lines: &LineBehaviors,
) -> Result<Option<Connection>, ConversionError> {
    let earliest = now + Duration::seconds(MIN_LEAD_SECS);

    let mut chosen = None;
    for journey in &response.journeys {
        let first = journey
            .legs
            .first()
            .ok_or(ConversionError::MissingField("legs"))?;
        if leg_departure(first)? > earliest {
            chosen = Some(journey);
            break;
        }
    }
    let Some(journey) = chosen else {
        debug!(
            journeys = response.journeys.len(),
            "No journey leaves late enough"
        );
        return Ok(None);
    };

    let walking: Vec<bool> = journey.legs.iter().map(|leg| leg.is_walking()).collect();
    let Some(transfer_index) = transfer_leg_index(&walking) else {
        debug!(legs = journey.legs.len(), "Journey has no transfer");
        return Ok(None);
    };

    let initial = convert_leg(&journey.legs[0])?;
    let transfer = convert_leg(&journey.legs[transfer_index])?;

    let line = transfer.line.ok_or(ConversionError::MissingField("line.name"))?;
    let destination = if lines.is_ring(&line.name) {
        RING_DESTINATION.to_string()
    } else {
        let direction = transfer
            .direction
            .as_deref()
            .ok_or(ConversionError::MissingField("direction"))?;
        normalize(direction)
    };

    let wait = transfer.departure.signed_duration_since(initial.arrival);
    let stopover = Stopover::classify(wait);
    if stopover.is_unbounded() {
        debug!(line = %line.name, "Transfer wait is unbounded");
        return Ok(None);
    }

    Ok(Some(Connection {
        destination,
        line: line.name,
        arrival: initial.arrival,
        departure: transfer.departure,
        stopover,
        change_station: normalize(&initial.destination),
        mode: line.mode,
    }))
}
