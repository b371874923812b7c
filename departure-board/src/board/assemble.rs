//! Display assembly.
//!
//! Turns direction groups and connections into the ordered list of routes
//! the renderer draws.

use serde::Serialize;

use crate::domain::{Connection, LineBehaviors, RouteDisplay, normalize};

use super::config::Termini;
use super::group::{DirectionGroup, DirectionGroups};

/// What the renderer draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardDisplay {
    /// Night mode: the night line is running, or nothing is.
    pub night: bool,
    /// Southbound first, unless `night` is set.
    pub routes: Vec<RouteDisplay>,
}

/// First terminus, in priority order, that has a direction group.
fn find_route<'a>(
    groups: &'a DirectionGroups,
    termini: &[String],
) -> Option<(String, &'a DirectionGroup)> {
    termini.iter().find_map(|terminus| {
        let key = normalize(terminus);
        groups.get(&key).map(|group| (key, group))
    })
}

fn route(
    destination: String,
    group: &DirectionGroup,
    connections: Vec<Connection>,
) -> RouteDisplay {
    RouteDisplay {
        mode: group.mode,
        line: group.line.clone(),
        destination,
        departures: group.departures.clone(),
        connections,
    }
}

/// Assemble the board.
///
/// The southbound route carries the inbound connections, the northbound one
/// the outbound connections. When the southbound route runs on a night
/// line its connections are dropped. In night mode the list is reversed.
pub fn assemble(
    groups: &DirectionGroups,
    inbound: &[Connection],
    outbound: &[Connection],
    termini: &Termini,
    lines: &LineBehaviors,
) -> BoardDisplay {
    let mut night = false;
    let mut routes = Vec::with_capacity(2);

    if let Some((destination, group)) = find_route(groups, &termini.south) {
        let connections = if lines.is_night(&group.line) {
            night = true;
            Vec::new()
        } else {
            inbound.to_vec()
        };
        routes.push(route(destination, group, connections));
    }

    if let Some((destination, group)) = find_route(groups, &termini.north) {
        if lines.is_night(&group.line) {
            night = true;
        }
        routes.push(route(destination, group, outbound.to_vec()));
    }

    if routes.is_empty() {
        night = true;
    }

    if night {
        routes.reverse();
    }

    BoardDisplay { night, routes }
}
