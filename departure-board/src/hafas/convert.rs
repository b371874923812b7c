//! Conversion from HAFAS DTOs to domain types.
//!
//! Board records that fail to convert are skipped individually. Journey legs
//! are converted on demand by the transfer selector, which treats a failure
//! as "no connection" for that one journeys response.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::{JourneyLeg, LineRef, Mode, RawDeparture};

use super::types::{DepartureDto, LegDto};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Failed to parse an ISO 8601 timestamp
    #[error("invalid time: {0}")]
    InvalidTime(String),
}

/// Parse an ISO 8601 / RFC 3339 timestamp with offset.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, ConversionError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| ConversionError::InvalidTime(s.to_string()))
}

/// Pick the realtime value if present, else the planned one.
fn realtime_or_planned(
    realtime: Option<&str>,
    planned: Option<&str>,
    field: &'static str,
) -> Result<DateTime<Utc>, ConversionError> {
    let raw = realtime
        .or(planned)
        .ok_or(ConversionError::MissingField(field))?;
    parse_instant(raw)
}

/// Convert a board departure to a domain departure.
pub fn convert_departure(dto: &DepartureDto) -> Result<RawDeparture, ConversionError> {
    let line = dto.line.as_ref().ok_or(ConversionError::MissingField("line"))?;
    let line_name = line
        .name
        .clone()
        .ok_or(ConversionError::MissingField("line.name"))?;
    let mode = line
        .product
        .as_deref()
        .map(Mode::from_product)
        .unwrap_or(Mode::Other);
    let direction = dto
        .direction
        .clone()
        .ok_or(ConversionError::MissingField("direction"))?;
    let when = realtime_or_planned(dto.when.as_deref(), dto.planned_when.as_deref(), "when")?;

    Ok(RawDeparture {
        line_name,
        mode,
        direction,
        when,
    })
}

/// Convert a departure board, skipping cancelled and invalid records.
pub fn convert_departures(dtos: &[DepartureDto]) -> Vec<RawDeparture> {
    dtos.iter()
        .filter(|dto| !dto.cancelled.unwrap_or(false))
        .filter_map(|dto| match convert_departure(dto) {
            Ok(departure) => Some(departure),
            Err(e) => {
                warn!(
                    trip = dto.trip_id.as_deref().unwrap_or("?"),
                    error = %e,
                    "Skipping departure"
                );
                None
            }
        })
        .collect()
}

/// Departure of a leg: realtime if known, else planned.
pub fn leg_departure(dto: &LegDto) -> Result<DateTime<Utc>, ConversionError> {
    realtime_or_planned(
        dto.departure.as_deref(),
        dto.planned_departure.as_deref(),
        "departure",
    )
}

/// Arrival of a leg: realtime if known, else planned.
pub fn leg_arrival(dto: &LegDto) -> Result<DateTime<Utc>, ConversionError> {
    realtime_or_planned(
        dto.arrival.as_deref(),
        dto.planned_arrival.as_deref(),
        "arrival",
    )
}

/// Convert a journey leg to a domain leg.
pub fn convert_leg(dto: &LegDto) -> Result<JourneyLeg, ConversionError> {
    let destination = dto
        .destination
        .as_ref()
        .and_then(|d| d.display_name())
        .ok_or(ConversionError::MissingField("destination.name"))?
        .to_string();

    let walking = dto.is_walking();
    let line = if walking {
        None
    } else {
        dto.line.as_ref().and_then(|line| {
            line.name.clone().map(|name| LineRef {
                name,
                mode: line
                    .product
                    .as_deref()
                    .map(Mode::from_product)
                    .unwrap_or(Mode::Other),
            })
        })
    };

    Ok(JourneyLeg {
        destination,
        direction: dto.direction.clone(),
        line,
        walking,
        departure: leg_departure(dto)?,
        arrival: leg_arrival(dto)?,
    })
}
