//! Domain types for the departure board.
//!
//! Everything here is pure: no I/O, no clock access. Functions that depend
//! on the current time take it as a parameter.

mod connection;
mod departure;
mod journey;
mod line;
mod mode;
mod station;
mod time;

pub use connection::{Connection, RouteDisplay};
pub use departure::RawDeparture;
pub use journey::{JourneyLeg, LineRef, transfer_leg_index};
pub use line::{LineBehavior, LineBehaviors, RING_DESTINATION};
pub use mode::Mode;
pub use station::normalize;
pub use time::{NOW_LABEL, Stopover, delta_to_label, instant_to_label};
