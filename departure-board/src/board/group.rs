//! Departure grouping.
//!
//! The board shows one row per direction. Subway directions always win;
//! buses only fill in when the subway board is thin (late at night, or
//! during a closure with replacement buses).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::domain::{Mode, RawDeparture, instant_to_label, normalize};

/// Below this many subway directions, bus directions are merged in.
pub const MIN_SUBWAY_DIRECTIONS: usize = 2;

/// Upcoming departures in one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionGroup {
    pub mode: Mode,
    /// Line of the earliest departure in this direction.
    pub line: String,
    /// Timing labels, soonest first. Only departures after "now".
    pub departures: Vec<String>,
}

/// Direction groups keyed by normalized direction.
pub type DirectionGroups = HashMap<String, DirectionGroup>;

fn group_mode(
    departures: &[RawDeparture],
    mode: Mode,
    now: DateTime<Utc>,
    tz: Tz,
) -> DirectionGroups {
    let mut by_direction: HashMap<String, Vec<&RawDeparture>> = HashMap::new();
    for departure in departures.iter().filter(|d| d.mode == mode) {
        by_direction
            .entry(normalize(&departure.direction))
            .or_default()
            .push(departure);
    }

    by_direction
        .into_iter()
        .map(|(direction, mut entries)| {
            // Stable, so simultaneous departures keep board order
            entries.sort_by_key(|d| d.when);
            let group = DirectionGroup {
                mode,
                line: entries[0].line_name.clone(),
                departures: entries
                    .iter()
                    .filter(|d| d.when > now)
                    .map(|d| instant_to_label(d.when, now, tz))
                    .collect(),
            };
            (direction, group)
        })
        .collect()
}

/// Group a raw departure board by mode and normalized direction.
///
/// Only subway and bus departures are considered. Bus directions are added
/// if there are fewer than [`MIN_SUBWAY_DIRECTIONS`] subway directions, and
/// never replace a subway direction of the same name.
///
/// A direction whose departures are all in the past still gets a group,
/// with no labels.
pub fn group_departures(
    departures: &[RawDeparture],
    now: DateTime<Utc>,
    tz: Tz,
) -> DirectionGroups {
    let mut groups = group_mode(departures, Mode::Subway, now, tz);

    if groups.len() < MIN_SUBWAY_DIRECTIONS {
        for (direction, group) in group_mode(departures, Mode::Bus, now, tz) {
            groups.entry(direction).or_insert(group);
        }
    }

    groups
}
