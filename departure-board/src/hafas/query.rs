//! Journey query parameters.

use serde::{Deserialize, Serialize};

/// Number of journey options requested per query.
const RESULTS_PER_QUERY: u8 = 2;

/// Where a journey query should end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Destination {
    /// A HAFAS stop ID, e.g. "900000003101".
    Stop { id: String },

    /// A street address, for destinations that are not a stop.
    Address {
        latitude: f64,
        longitude: f64,
        address: String,
    },
}

/// Optional products a journey may use. Subway, regional and the like are
/// fixed by the query itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Products {
    pub suburban: bool,
    pub tram: bool,
    pub bus: bool,
}

impl Products {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn suburban() -> Self {
        Self {
            suburban: true,
            ..Self::default()
        }
    }

    pub fn tram() -> Self {
        Self {
            tram: true,
            ..Self::default()
        }
    }

    pub fn bus() -> Self {
        Self {
            bus: true,
            ..Self::default()
        }
    }
}

/// A journeys query from the home stop.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyQuery {
    pub from: String,
    pub to: Destination,
    /// Maximum number of transfers.
    pub transfers: u8,
    pub products: Products,
}

impl JourneyQuery {
    /// Query string parameters for `GET /journeys`.
    ///
    /// Products are only ever switched off: the API enables everything by
    /// default.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("from", self.from.clone())];

        match &self.to {
            Destination::Stop { id } => params.push(("to", id.clone())),
            Destination::Address {
                latitude,
                longitude,
                address,
            } => {
                params.push(("to.latitude", latitude.to_string()));
                params.push(("to.longitude", longitude.to_string()));
                params.push(("to.address", address.clone()));
            }
        }

        params.extend([
            ("transfers", self.transfers.to_string()),
            ("startWithWalking", "false".to_string()),
            ("results", RESULTS_PER_QUERY.to_string()),
            ("ferry", "false".to_string()),
            ("express", "false".to_string()),
            ("regional", "false".to_string()),
        ]);

        if !self.products.suburban {
            params.push(("suburban", "false".to_string()));
        }
        if !self.products.tram {
            params.push(("tram", "false".to_string()));
        }
        if !self.products.bus {
            params.push(("bus", "false".to_string()));
        }

        params
    }
}
