//! transport.rest API response DTOs.
//!
//! These types map directly to the HAFAS REST JSON responses. Every field is
//! optional: HAFAS omits or nulls fields freely (cancelled trips have no
//! `when`, walking legs have no `line`), and a missing field should only
//! invalidate the record that needs it, not the whole response.

use serde::Deserialize;

/// Response from `GET /stops/{id}/departures`.
///
/// v5 of the API returned a bare array; v6 wraps it in an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DeparturesResponse {
    Wrapped { departures: Vec<DepartureDto> },
    Bare(Vec<DepartureDto>),
}

impl DeparturesResponse {
    pub fn into_departures(self) -> Vec<DepartureDto> {
        match self {
            DeparturesResponse::Wrapped { departures } => departures,
            DeparturesResponse::Bare(departures) => departures,
        }
    }
}

/// A single departure on a stop's board.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureDto {
    /// HAFAS trip ID.
    pub trip_id: Option<String>,

    /// Realtime departure (ISO 8601). Null for cancelled trips.
    pub when: Option<String>,

    /// Scheduled departure (ISO 8601).
    pub planned_when: Option<String>,

    /// Raw direction, e.g. "U Alt-Tegel".
    pub direction: Option<String>,

    pub line: Option<LineDto>,

    pub cancelled: Option<bool>,
}

/// Line information shared by departures and legs.
#[derive(Debug, Clone, Deserialize)]
pub struct LineDto {
    /// Display name, e.g. "U6", "M13", "S41".
    pub name: Option<String>,

    /// Product, e.g. "subway", "bus", "suburban", "tram".
    pub product: Option<String>,
}

/// Response from `GET /journeys`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JourneysResponse {
    #[serde(default)]
    pub journeys: Vec<JourneyDto>,
}

/// One itinerary option.
#[derive(Debug, Clone, Deserialize)]
pub struct JourneyDto {
    #[serde(default)]
    pub legs: Vec<LegDto>,
}

/// One ride or walk within a journey.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegDto {
    pub origin: Option<LocationDto>,
    pub destination: Option<LocationDto>,

    /// Realtime departure (ISO 8601).
    pub departure: Option<String>,
    /// Scheduled departure (ISO 8601).
    pub planned_departure: Option<String>,

    /// Realtime arrival (ISO 8601).
    pub arrival: Option<String>,
    /// Scheduled arrival (ISO 8601).
    pub planned_arrival: Option<String>,

    /// Direction of the vehicle. Absent for walks.
    pub direction: Option<String>,

    /// Absent for walks.
    pub line: Option<LineDto>,

    /// Present and true for walking legs.
    pub walking: Option<bool>,
}

impl LegDto {
    pub fn is_walking(&self) -> bool {
        self.walking.unwrap_or(false)
    }
}

/// A stop, station or address.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationDto {
    pub id: Option<String>,

    /// Set for stops and stations.
    pub name: Option<String>,

    /// Set for address locations.
    pub address: Option<String>,
}

impl LocationDto {
    /// Name for display: the stop name, or the address for address locations.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.address.as_deref())
    }
}
