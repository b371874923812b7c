//! Concurrent fetch of one refresh cycle.
//!
//! A cycle is one departure board request plus one journeys request per
//! configured transfer target. Everything runs concurrently, bounded by the
//! client's request limit. Each request fails on its own: a failure turns
//! that one slot into `None` and the rest of the cycle carries on.

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::RawDeparture;
use crate::hafas::{HafasClient, JourneysResponse};

use super::config::{BoardConfig, TransferTarget};

/// Which way a transfer target lies from the home stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    /// Reached on the southbound route.
    Inbound,
    /// Reached on the northbound route.
    Outbound,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Inbound => f.write_str("inbound"),
            Bound::Outbound => f.write_str("outbound"),
        }
    }
}

/// Raw results of one cycle.
///
/// The journey vectors always have one entry per configured slot, in
/// configuration order.
#[derive(Debug, Default)]
pub struct CycleResult {
    /// `None` if the board request failed.
    pub board: Option<Vec<RawDeparture>>,
    pub inbound: Vec<Option<JourneysResponse>>,
    pub outbound: Vec<Option<JourneysResponse>>,
}

impl CycleResult {
    /// Number of journey slots that came back.
    pub fn journeys_received(&self) -> usize {
        self.inbound
            .iter()
            .chain(&self.outbound)
            .filter(|r| r.is_some())
            .count()
    }
}

/// Runs refresh cycles against the upstream API.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: HafasClient,
    config: Arc<BoardConfig>,
}

impl Fetcher {
    pub fn new(client: HafasClient, config: Arc<BoardConfig>) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Fetch the board and all transfer journeys.
    ///
    /// Takes as long as the slowest request, which is bounded by the
    /// configured timeouts.
    pub async fn fetch_cycle(&self) -> CycleResult {
        let (board, inbound, outbound) = tokio::join!(
            self.fetch_board(),
            self.fetch_journeys(Bound::Inbound, &self.config.inbound),
            self.fetch_journeys(Bound::Outbound, &self.config.outbound),
        );

        CycleResult {
            board,
            inbound,
            outbound,
        }
    }

    async fn fetch_board(&self) -> Option<Vec<RawDeparture>> {
        match self
            .client
            .get_departures(&self.config.home_stop, self.config.board_timeout())
            .await
        {
            Ok(departures) => Some(departures),
            Err(e) => {
                warn!(
                    stop = %self.config.home_stop,
                    error = %e,
                    "Departure board request failed"
                );
                None
            }
        }
    }

    async fn fetch_journeys(
        &self,
        bound: Bound,
        targets: &[TransferTarget],
    ) -> Vec<Option<JourneysResponse>> {
        let timeout = self.config.journey_timeout();

        let futures: Vec<_> = targets
            .iter()
            .map(|target| async move {
                let query = target.query(&self.config.home_stop);
                match self.client.get_journeys(&query, timeout).await {
                    Ok(response) => Some(response),
                    Err(e) => {
                        warn!(
                            %bound,
                            target = %target.name,
                            error = %e,
                            "Journeys request failed"
                        );
                        None
                    }
                }
            })
            .collect();

        let results = join_all(futures).await;
        debug!(
            %bound,
            requested = targets.len(),
            received = results.iter().filter(|r| r.is_some()).count(),
            "Fetched journeys batch"
        );

        results
    }
}
