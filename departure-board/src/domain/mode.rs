//! Transport mode of a line.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The transport mode of a line, as reported in HAFAS `line.product`.
///
/// Only the modes the board distinguishes get their own variant; everything
/// else (regional trains, ferries, express services) is `Other`.
///
/// # Examples
///
/// ```
/// use departure_board::domain::Mode;
///
/// assert_eq!(Mode::from_product("subway"), Mode::Subway);
/// assert_eq!(Mode::from_product("ferry"), Mode::Other);
/// assert_eq!(Mode::Bus.as_str(), "bus");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Subway,
    Bus,
    Suburban,
    Tram,
    Other,
}

impl Mode {
    /// Parse a HAFAS product string. Unknown products map to `Other`.
    pub fn from_product(product: &str) -> Self {
        match product {
            "subway" => Mode::Subway,
            "bus" => Mode::Bus,
            "suburban" => Mode::Suburban,
            "tram" => Mode::Tram,
            _ => Mode::Other,
        }
    }

    /// Returns the product string for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Subway => "subway",
            Mode::Bus => "bus",
            Mode::Suburban => "suburban",
            Mode::Tram => "tram",
            Mode::Other => "other",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
