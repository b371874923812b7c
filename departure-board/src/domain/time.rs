//! Timing labels for the board.
//!
//! The board never shows raw timestamps for imminent departures. Instants are
//! bucketed into "now", a minute countdown or a wall-clock time, and transfer
//! gaps into a [`Stopover`] class.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};

/// Label for departures within [`NOW_WINDOW_SECS`].
pub const NOW_LABEL: &str = "now";

/// Departures at most this far ahead are shown as [`NOW_LABEL`].
const NOW_WINDOW_SECS: i64 = 60;

/// Departures at most this far ahead are shown as a minute countdown.
const COUNTDOWN_WINDOW_MINS: i64 = 25;

/// Label an absolute departure instant relative to `now`.
///
/// Clock times are rendered in `tz`.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use chrono_tz::Europe::Berlin;
/// use departure_board::domain::instant_to_label;
///
/// let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
/// assert_eq!(instant_to_label(now + Duration::seconds(30), now, Berlin), "now");
/// assert_eq!(instant_to_label(now + Duration::minutes(10), now, Berlin), "10m");
/// assert_eq!(instant_to_label(now + Duration::hours(2), now, Berlin), "15:00");
/// ```
pub fn instant_to_label(t: DateTime<Utc>, now: DateTime<Utc>, tz: Tz) -> String {
    let until = t.signed_duration_since(now);

    if until <= Duration::seconds(NOW_WINDOW_SECS) {
        NOW_LABEL.to_string()
    } else if until <= Duration::minutes(COUNTDOWN_WINDOW_MINS) {
        format!("{}m", until.num_minutes())
    } else {
        t.with_timezone(&tz).format("%H:%M").to_string()
    }
}

/// Class of the waiting time between two rides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stopover {
    /// Under about 90 seconds: you have to hurry.
    Tight,

    /// Whole minutes, under an hour.
    Minutes(i64),

    /// Hours and minutes, under a day.
    HoursMinutes { hours: i64, minutes: i64 },

    /// A day or more, or a departure well before the arrival. Not a usable
    /// connection.
    Unbounded,
}

impl Stopover {
    /// Classify the gap between arriving at a station and departing from it.
    pub fn classify(delta: Duration) -> Self {
        if delta < Duration::zero() {
            // Realtime data occasionally has the next ride leaving a few
            // seconds before the arrival
            return if delta > Duration::seconds(-60) {
                Stopover::Tight
            } else {
                Stopover::Unbounded
            };
        }

        if delta.num_days() >= 1 {
            return Stopover::Unbounded;
        }

        let hours = delta.num_hours();
        let minutes = delta.num_minutes() % 60;
        let seconds = delta.num_seconds() % 60;

        if hours == 0 && (minutes == 0 || (minutes == 1 && seconds < 30)) {
            Stopover::Tight
        } else if hours == 0 {
            Stopover::Minutes(minutes)
        } else {
            Stopover::HoursMinutes { hours, minutes }
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Stopover::Unbounded)
    }
}

impl fmt::Display for Stopover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stopover::Tight => f.write_str("knapp"),
            Stopover::Minutes(minutes) => write!(f, "{minutes}m"),
            Stopover::HoursMinutes { hours, minutes } => write!(f, "{hours}h {minutes}m"),
            Stopover::Unbounded => f.write_str("ewig"),
        }
    }
}

impl Serialize for Stopover {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Label a transfer gap. See [`Stopover::classify`].
///
/// # Examples
///
/// ```
/// use chrono::Duration;
/// use departure_board::domain::delta_to_label;
///
/// assert_eq!(delta_to_label(Duration::zero()), "knapp");
/// assert_eq!(delta_to_label(Duration::minutes(7)), "7m");
/// assert_eq!(delta_to_label(Duration::minutes(75)), "1h 15m");
/// assert_eq!(delta_to_label(Duration::days(1)), "ewig");
/// ```
pub fn delta_to_label(delta: Duration) -> String {
    Stopover::classify(delta).to_string()
}
