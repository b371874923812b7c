//! transport.rest (HAFAS) client.
//!
//! This module provides an HTTP client for the transport.rest REST API,
//! which exposes the HAFAS journey planner of German transit agencies.
//!
//! Key characteristics of the API:
//! - Times are ISO 8601 with offset; realtime fields (`when`, `departure`,
//!   `arrival`) are null when no prediction exists, and the planned field
//!   is the fallback
//! - Fields are omitted freely, so DTOs are all-optional and conversion to
//!   domain types is fallible per record
//! - The public instances throttle aggressively; callers should expect
//!   timeouts and 5xx responses and degrade instead of failing

mod client;
mod convert;
mod error;
mod query;
mod types;

pub use client::{HafasClient, HafasConfig};
pub use convert::{
    ConversionError, convert_departure, convert_departures, convert_leg, leg_arrival,
    leg_departure, parse_instant,
};
pub use error::TransitError;
pub use query::{Destination, JourneyQuery, Products};
pub use types::{
    DepartureDto, DeparturesResponse, JourneyDto, JourneysResponse, LegDto, LineDto, LocationDto,
};
