//! Journey legs.
//!
//! A journey is one itinerary option returned by a journeys query: an
//! ordered sequence of legs, each either a ride on a line or a walk.

use chrono::{DateTime, Utc};

use super::Mode;

/// The line a leg rides on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef {
    pub name: String,
    pub mode: Mode,
}

/// One continuous ride or walk segment of a journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyLeg {
    pub destination: String,
    /// Direction of the vehicle, absent for walks.
    pub direction: Option<String>,
    /// Absent for walks.
    pub line: Option<LineRef>,
    pub walking: bool,
    /// Realtime if known, else planned.
    pub departure: DateTime<Utc>,
    /// Realtime if known, else planned.
    pub arrival: DateTime<Utc>,
}

/// Index of the transfer leg: the first non-walking leg after the initial ride.
///
/// Returns `None` if every leg after the first is a walk, or there is only
/// one leg.
///
/// # Examples
///
/// ```
/// use departure_board::domain::transfer_leg_index;
///
/// assert_eq!(transfer_leg_index(&[false, true, true, false]), Some(3));
/// assert_eq!(transfer_leg_index(&[false, false]), Some(1));
/// assert_eq!(transfer_leg_index(&[false, true]), None);
/// ```
pub fn transfer_leg_index(walking: &[bool]) -> Option<usize> {
    (1..walking.len()).find(|&i| !walking[i])
}
