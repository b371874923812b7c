//! Refresh cache for the board.
//!
//! The upstream API is slow and rate limited, and the board is polled far
//! more often than departures change. [`BoardCache`] holds the result of the
//! last refresh cycle as an immutable [`BoardSnapshot`] and runs a new cycle
//! at most once per minimum interval.
//!
//! Readers never block: the current snapshot is swapped atomically once a
//! cycle is complete. Refreshes are serialized on a lock, and a caller that
//! waited for someone else's cycle reuses its result.
//!
//! Successful journeys responses are retained per slot for a while. When a
//! slot's request fails, its retained response is used instead; the transfer
//! selector skips journeys that have already left, so an old response still
//! yields a valid connection as long as it covers the future.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use moka::future::Cache as MokaCache;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::board::{
    BoardConfig, BoardDisplay, Bound, DirectionGroups, Fetcher, assemble, group_departures,
    select_transfer,
};
use crate::domain::{Connection, RawDeparture};
use crate::hafas::{HafasClient, JourneysResponse};

/// Retention key: (bound, slot index).
type SlotKey = (Bound, usize);

/// Retained journeys response.
type SlotEntry = Arc<JourneysResponse>;

/// The board state after one refresh cycle.
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    /// Start of the cycle that produced this snapshot.
    pub refreshed_at: DateTime<Utc>,

    /// Raw departure board. Carried over from the previous snapshot when
    /// the board request failed.
    pub departures: Arc<Vec<RawDeparture>>,

    pub groups: DirectionGroups,

    /// Inbound connections in slot order, failed slots removed.
    pub inbound: Vec<Connection>,

    /// Outbound connections in slot order, failed slots removed.
    pub outbound: Vec<Connection>,
}

impl BoardSnapshot {
    /// The empty snapshot used before the first refresh.
    pub fn initial() -> Self {
        Self {
            refreshed_at: DateTime::<Utc>::UNIX_EPOCH,
            departures: Arc::new(Vec::new()),
            groups: DirectionGroups::new(),
            inbound: Vec::new(),
            outbound: Vec::new(),
        }
    }

    /// Whether this snapshot can be served at `now` without refreshing.
    ///
    /// An empty board is never fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>, min_interval: chrono::Duration) -> bool {
        now.signed_duration_since(self.refreshed_at) < min_interval && !self.departures.is_empty()
    }

    /// Assemble the display for this snapshot.
    pub fn display(&self, config: &BoardConfig) -> BoardDisplay {
        assemble(
            &self.groups,
            &self.inbound,
            &self.outbound,
            &config.termini,
            &config.lines,
        )
    }
}

/// Owns the board state and refreshes it on demand.
pub struct BoardCache {
    fetcher: Fetcher,
    snapshot: ArcSwap<BoardSnapshot>,
    refresh_lock: Mutex<()>,
    /// `None` if retention is disabled.
    retained: Option<MokaCache<SlotKey, SlotEntry>>,
}

impl BoardCache {
    /// Create a cache holding the initial snapshot. Nothing is fetched
    /// until the first [`ensure_fresh`](Self::ensure_fresh).
    pub fn new(client: HafasClient, config: Arc<BoardConfig>) -> Self {
        let retained = config.retention().map(|ttl| {
            MokaCache::builder()
                .time_to_live(ttl)
                .max_capacity((config.inbound_slots + config.outbound_slots) as u64)
                .build()
        });

        Self {
            fetcher: Fetcher::new(client, config),
            snapshot: ArcSwap::from_pointee(BoardSnapshot::initial()),
            refresh_lock: Mutex::new(()),
            retained,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        self.fetcher.config()
    }

    /// The current snapshot, without refreshing.
    pub fn snapshot(&self) -> Arc<BoardSnapshot> {
        self.snapshot.load_full()
    }

    /// Return a snapshot no older than the minimum refresh interval,
    /// running a refresh cycle first if needed.
    pub async fn ensure_fresh(&self) -> Arc<BoardSnapshot> {
        self.ensure_fresh_at(Utc::now()).await
    }

    /// [`ensure_fresh`](Self::ensure_fresh) with an explicit current time.
    pub async fn ensure_fresh_at(&self, now: DateTime<Utc>) -> Arc<BoardSnapshot> {
        let min_interval = self.config().min_refresh_interval();

        let current = self.snapshot.load_full();
        if current.is_fresh(now, min_interval) {
            return current;
        }

        let _guard = self.refresh_lock.lock().await;

        // Someone else may have refreshed while we waited
        let current = self.snapshot.load_full();
        if current.is_fresh(now, min_interval) || current.refreshed_at >= now {
            return current;
        }

        let next = Arc::new(self.refresh(&current, now).await);
        self.snapshot.store(Arc::clone(&next));
        next
    }

    /// Run one refresh cycle.
    async fn refresh(&self, previous: &BoardSnapshot, now: DateTime<Utc>) -> BoardSnapshot {
        let config = self.config();
        let cycle = self.fetcher.fetch_cycle().await;
        let journeys_received = cycle.journeys_received();

        let departures = match cycle.board {
            Some(board) => Arc::new(board),
            None => {
                warn!(
                    kept = previous.departures.len(),
                    "Keeping previous departure board"
                );
                Arc::clone(&previous.departures)
            }
        };

        let groups = group_departures(&departures, now, config.timezone);
        let inbound = self.connections(Bound::Inbound, cycle.inbound, now).await;
        let outbound = self.connections(Bound::Outbound, cycle.outbound, now).await;

        info!(
            departures = departures.len(),
            directions = groups.len(),
            journeys = journeys_received,
            inbound = inbound.len(),
            outbound = outbound.len(),
            "Board refreshed"
        );

        BoardSnapshot {
            refreshed_at: now,
            departures,
            groups,
            inbound,
            outbound,
        }
    }

    /// Select connections for one bound, filling failed slots from the
    /// retained responses.
    async fn connections(
        &self,
        bound: Bound,
        responses: Vec<Option<JourneysResponse>>,
        now: DateTime<Utc>,
    ) -> Vec<Connection> {
        let lines = &self.config().lines;
        let mut connections = Vec::with_capacity(responses.len());

        for (slot, response) in responses.into_iter().enumerate() {
            let key = (bound, slot);
            let response = match (response, &self.retained) {
                (Some(response), Some(retained)) => {
                    let response = Arc::new(response);
                    retained.insert(key, Arc::clone(&response)).await;
                    Some(response)
                }
                (Some(response), None) => Some(Arc::new(response)),
                (None, Some(retained)) => {
                    let response = retained.get(&key).await;
                    if response.is_some() {
                        debug!(%bound, slot, "Using retained journeys response");
                    }
                    response
                }
                (None, None) => None,
            };

            if let Some(connection) = response.and_then(|r| select_transfer(&r, now, lines)) {
                connections.push(connection);
            }
        }

        connections
    }
}
