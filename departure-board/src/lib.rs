//! Departure board server.
//!
//! Aggregates live departures and transfer connections for one transit stop
//! from the transport.rest HAFAS API, and serves them as display-ready JSON
//! for a status board renderer.

pub mod board;
pub mod cache;
pub mod domain;
pub mod hafas;
pub mod web;
