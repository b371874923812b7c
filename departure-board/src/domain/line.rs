//! Lines that need special treatment on the board.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Display destination used for circular lines.
pub const RING_DESTINATION: &str = "Ring";

/// How the board treats a particular line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineBehavior {
    /// Circular line. Its direction field is meaningless to riders, so
    /// connections on it show [`RING_DESTINATION`] instead.
    Ring,

    /// Night service. Seeing it on the board switches to night mode.
    Night,
}

/// Lookup table from line name to its special behavior.
///
/// Lines not in the table have no special behavior.
///
/// # Examples
///
/// ```
/// use departure_board::domain::{LineBehavior, LineBehaviors};
///
/// let lines = LineBehaviors::default();
/// assert!(lines.is_ring("S41"));
/// assert!(lines.is_night("N6"));
/// assert_eq!(lines.get("U6"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineBehaviors(HashMap<String, LineBehavior>);

impl LineBehaviors {
    /// Create an empty table.
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Add or replace the behavior for a line.
    pub fn with(mut self, line: impl Into<String>, behavior: LineBehavior) -> Self {
        self.0.insert(line.into(), behavior);
        self
    }

    /// Look up the behavior of a line.
    pub fn get(&self, line: &str) -> Option<LineBehavior> {
        self.0.get(line).copied()
    }

    pub fn is_ring(&self, line: &str) -> bool {
        self.get(line) == Some(LineBehavior::Ring)
    }

    pub fn is_night(&self, line: &str) -> bool {
        self.get(line) == Some(LineBehavior::Night)
    }
}

impl Default for LineBehaviors {
    /// The Berlin ring (S41/S42) and the U6 night replacement (N6).
    fn default() -> Self {
        Self::new()
            .with("S41", LineBehavior::Ring)
            .with("S42", LineBehavior::Ring)
            .with("N6", LineBehavior::Night)
    }
}
