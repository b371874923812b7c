//! Board configuration.
//!
//! Everything the aggregation engine needs to know about the deployment:
//! which stop to watch, which transfers to compute, which termini make up
//! the two routes and how often to refresh. The defaults describe the
//! board at U Afrikanische Straße in Berlin.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::LineBehaviors;
use crate::hafas::{Destination, HafasConfig, JourneyQuery, Products};

/// Error loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for a `BoardConfig`
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config is well-formed but inconsistent
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A station a transfer connection is computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferTarget {
    /// Human-readable name, for logs.
    pub name: String,

    pub destination: Destination,

    /// Products the journey may use besides subway.
    #[serde(default)]
    pub products: Products,

    /// Maximum number of transfers.
    #[serde(default = "default_transfers")]
    pub transfers: u8,
}

fn default_transfers() -> u8 {
    1
}

impl TransferTarget {
    /// A target at a HAFAS stop, with one transfer.
    pub fn stop(name: impl Into<String>, id: impl Into<String>, products: Products) -> Self {
        Self {
            name: name.into(),
            destination: Destination::Stop { id: id.into() },
            products,
            transfers: default_transfers(),
        }
    }

    /// A target at a street address, with one transfer.
    pub fn address(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        address: impl Into<String>,
        products: Products,
    ) -> Self {
        Self {
            name: name.into(),
            destination: Destination::Address {
                latitude,
                longitude,
                address: address.into(),
            },
            products,
            transfers: default_transfers(),
        }
    }

    /// The journeys query for this target from `home_stop`.
    pub fn query(&self, home_stop: &str) -> JourneyQuery {
        JourneyQuery {
            from: home_stop.to_string(),
            to: self.destination.clone(),
            transfers: self.transfers,
            products: self.products,
        }
    }
}

/// Terminus names identifying the two routes, in priority order.
///
/// Names are normalized before lookup, so "U Alt-Tegel" and "Tegel" are
/// the same terminus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Termini {
    pub south: Vec<String>,
    pub north: Vec<String>,
}

impl Default for Termini {
    fn default() -> Self {
        Self {
            south: [
                "Mariendorf",
                "Seestraße",
                "Wedding",
                "Naturkundemuseum",
                "Hallesches Tor",
                "Mehringdamm",
                "Platz der Luftbrücke",
                "Tempelhof",
            ]
            .map(String::from)
            .to_vec(),
            north: ["Tegel", "Borsigwerke", "Kurt-Schumacher-Platz"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Longest accepted refresh interval: one day.
const MAX_MIN_REFRESH_SECS: u64 = 24 * 60 * 60;

/// Longest accepted retention period: one week.
const MAX_RETENTION_SECS: u64 = 7 * 24 * 60 * 60;

/// Configuration for the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Upstream API settings.
    pub api: HafasConfig,

    /// Stop whose departure board is shown.
    pub home_stop: String,

    /// Transfers reachable on the southbound route, in display order.
    pub inbound: Vec<TransferTarget>,

    /// Transfers reachable on the northbound route, in display order.
    pub outbound: Vec<TransferTarget>,

    /// Number of inbound connection slots. Must equal `inbound.len()`.
    pub inbound_slots: usize,

    /// Number of outbound connection slots. Must equal `outbound.len()`.
    pub outbound_slots: usize,

    pub termini: Termini,

    /// Lines with special display behavior.
    pub lines: LineBehaviors,

    /// Time zone for clock-time labels.
    pub timezone: Tz,

    /// Minimum time between refresh cycles (seconds).
    pub min_refresh_secs: u64,

    /// Timeout for the departures board request (milliseconds).
    pub board_timeout_ms: u64,

    /// Timeout for each journeys request (milliseconds).
    pub journey_timeout_ms: u64,

    /// How long a successful journeys response stands in for failed
    /// requests of the same slot (seconds). 0 disables retention.
    pub retention_secs: u64,
}

impl BoardConfig {
    /// Load a config from a JSON file and validate it.
    ///
    /// Missing fields take their default values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.home_stop.is_empty() {
            return Err(ConfigError::Invalid("home_stop is empty".to_string()));
        }

        if self.inbound.len() != self.inbound_slots {
            return Err(ConfigError::Invalid(format!(
                "{} inbound targets configured for {} inbound slots",
                self.inbound.len(),
                self.inbound_slots
            )));
        }

        if self.outbound.len() != self.outbound_slots {
            return Err(ConfigError::Invalid(format!(
                "{} outbound targets configured for {} outbound slots",
                self.outbound.len(),
                self.outbound_slots
            )));
        }

        if self.termini.south.is_empty() && self.termini.north.is_empty() {
            return Err(ConfigError::Invalid("no termini configured".to_string()));
        }

        if self.board_timeout_ms == 0 || self.journey_timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeouts must be positive".to_string()));
        }

        if self.min_refresh_secs == 0 || self.min_refresh_secs > MAX_MIN_REFRESH_SECS {
            return Err(ConfigError::Invalid(format!(
                "min_refresh_secs must be between 1 and {MAX_MIN_REFRESH_SECS}"
            )));
        }

        if self.retention_secs > MAX_RETENTION_SECS {
            return Err(ConfigError::Invalid(format!(
                "retention_secs must be at most {MAX_RETENTION_SECS}"
            )));
        }

        if self.api.max_concurrent == 0 {
            return Err(ConfigError::Invalid(
                "api.max_concurrent must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Set the upstream API config.
    pub fn with_api(mut self, api: HafasConfig) -> Self {
        self.api = api;
        self
    }

    /// Set the inbound targets and the matching slot count.
    pub fn with_inbound(mut self, targets: Vec<TransferTarget>) -> Self {
        self.inbound_slots = targets.len();
        self.inbound = targets;
        self
    }

    /// Set the outbound targets and the matching slot count.
    pub fn with_outbound(mut self, targets: Vec<TransferTarget>) -> Self {
        self.outbound_slots = targets.len();
        self.outbound = targets;
        self
    }

    /// Set the minimum refresh interval.
    pub fn with_min_refresh(mut self, secs: u64) -> Self {
        self.min_refresh_secs = secs;
        self
    }

    /// Set request timeouts.
    pub fn with_timeouts(mut self, board_ms: u64, journey_ms: u64) -> Self {
        self.board_timeout_ms = board_ms;
        self.journey_timeout_ms = journey_ms;
        self
    }

    /// Set journey response retention.
    pub fn with_retention(mut self, secs: u64) -> Self {
        self.retention_secs = secs;
        self
    }

    /// Returns the minimum refresh interval.
    ///
    /// Saturates for values `validate` would reject.
    pub fn min_refresh_interval(&self) -> chrono::Duration {
        i64::try_from(self.min_refresh_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// Returns the board request timeout.
    pub fn board_timeout(&self) -> Duration {
        Duration::from_millis(self.board_timeout_ms)
    }

    /// Returns the per-journey request timeout.
    pub fn journey_timeout(&self) -> Duration {
        Duration::from_millis(self.journey_timeout_ms)
    }

    /// Returns the retention period, `None` if disabled.
    pub fn retention(&self) -> Option<Duration> {
        (self.retention_secs > 0).then(|| Duration::from_secs(self.retention_secs))
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        let inbound = vec![
            TransferTarget::stop("Hansaplatz", "900000003101", Products::none()),
            TransferTarget::address(
                "Anklamer Str.",
                52.533902,
                13.393388,
                "Anklamer Str. 60",
                Products::tram(),
            ),
            TransferTarget::stop("Stahlheimer Str.", "900000110015", Products::tram()),
            TransferTarget::stop("Frankfurter Tor", "900000120008", Products::none()),
            TransferTarget::stop("Westend", "900000026207", Products::suburban()),
            TransferTarget::stop("Prenzlauer Allee", "900000110002", Products::suburban()),
        ];
        let outbound = vec![TransferTarget::stop(
            "Bekassinenweg",
            "900000091156",
            Products::bus(),
        )];

        Self {
            api: HafasConfig::default(),
            // U Afrikanische Straße
            home_stop: "900000011102".to_string(),
            inbound_slots: inbound.len(),
            outbound_slots: outbound.len(),
            inbound,
            outbound,
            termini: Termini::default(),
            lines: LineBehaviors::default(),
            timezone: chrono_tz::Europe::Berlin,
            min_refresh_secs: 50,
            board_timeout_ms: 6100,
            journey_timeout_ms: 3100,
            retention_secs: 300,
        }
    }
}
