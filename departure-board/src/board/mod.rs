//! Departure board aggregation.
//!
//! This module turns raw upstream data into what the board shows: the
//! departures from the home stop grouped by direction, the transfers
//! reachable along each route, and the final ordered route list.
//!
//! Fetching is separate from processing. [`Fetcher`] produces a
//! [`CycleResult`] with holes where requests failed, and the pure functions
//! [`group_departures`], [`select_transfer`] and [`assemble`] work on
//! whatever came back.

mod assemble;
mod config;
mod fetch;
mod group;
mod select;

pub use assemble::{BoardDisplay, assemble};
pub use config::{BoardConfig, ConfigError, Termini, TransferTarget};
pub use fetch::{Bound, CycleResult, Fetcher};
pub use group::{DirectionGroup, DirectionGroups, MIN_SUBWAY_DIRECTIONS, group_departures};
pub use select::{select_transfer, try_select_transfer};
