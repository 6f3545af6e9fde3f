/// Query cache for server-owned data
///
/// Entries are keyed by semantic tags. The cache never performs I/O itself:
/// callers ask it whether a fetch should start, run the fetch, and report
/// the result back with the ticket they were given.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Semantic cache key, e.g. `["images"]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey(&'static [&'static str]);

impl QueryKey {
    /// The gallery image list
    pub const IMAGES: QueryKey = QueryKey(&["images"]);

    pub fn tags(&self) -> &'static [&'static str] {
        self.0
    }
}

/// Proof that a fetch was started; results carrying an old ticket are discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub key: QueryKey,
    generation: u64,
}

#[derive(Debug)]
struct QueryEntry<T> {
    data: Option<T>,
    error: Option<String>,
    updated_at: Option<Instant>,
    /// Explicitly invalidated and no fetch has started since
    invalidated: bool,
    /// Generation of the fetch in flight
    in_flight: Option<u64>,
    /// An invalidation arrived while a fetch was already in flight
    refetch_queued: bool,
}

impl<T> Default for QueryEntry<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            updated_at: None,
            invalidated: false,
            in_flight: None,
            refetch_queued: false,
        }
    }
}

/// Read-only view of one cache entry for the UI
#[derive(Debug, PartialEq)]
pub struct QueryState<'a, T> {
    pub data: Option<&'a T>,
    /// No data yet and a fetch is in flight
    pub is_loading: bool,
    /// A fetch is in flight (initial or background)
    pub is_fetching: bool,
    /// The most recent fetch failed
    pub is_error: bool,
    pub error: Option<&'a str>,
}

#[derive(Debug)]
pub struct QueryCache<T> {
    entries: HashMap<QueryKey, QueryEntry<T>>,
    stale_time: Duration,
    next_generation: u64,
}

impl<T> QueryCache<T> {
    /// Create a cache whose results stay fresh for `stale_time`
    pub fn new(stale_time: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stale_time,
            next_generation: 0,
        }
    }

    /// Start a fetch for `key` unless one is already in flight
    pub fn begin_fetch(&mut self, key: QueryKey) -> Option<FetchTicket> {
        let generation = self.next_generation;
        let entry = self.entries.entry(key).or_default();
        if entry.in_flight.is_some() {
            return None;
        }

        entry.in_flight = Some(generation);
        entry.invalidated = false;
        self.next_generation += 1;
        Some(FetchTicket { key, generation })
    }

    /// Store the result of a fetch.
    ///
    /// Returns `true` when the caller should immediately start another
    /// fetch because the entry was invalidated while this one was running.
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<T, String>, now: Instant) -> bool {
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            return false;
        };
        if entry.in_flight != Some(ticket.generation) {
            tracing::debug!(key = ?ticket.key.tags(), "Discarding superseded fetch result");
            return false;
        }

        entry.in_flight = None;
        match result {
            Ok(data) => {
                entry.data = Some(data);
                entry.error = None;
                entry.updated_at = Some(now);
            }
            Err(err) => entry.error = Some(err),
        }

        if entry.refetch_queued {
            entry.refetch_queued = false;
            entry.invalidated = true;
            true
        } else {
            false
        }
    }

    /// Mark `key` stale.
    ///
    /// Returns `true` when the caller should start a fetch now. An
    /// invalidation while a fetch is in flight queues one follow-up fetch,
    /// reported by `complete`; further ones before it starts are absorbed.
    pub fn invalidate(&mut self, key: QueryKey) -> bool {
        let entry = self.entries.entry(key).or_default();
        if entry.in_flight.is_some() {
            entry.refetch_queued = true;
            return false;
        }
        if entry.invalidated {
            return false;
        }

        entry.invalidated = true;
        true
    }

    /// Invalidate the keys produced by one settled operation.
    ///
    /// Repeats of a key count once. Returns the keys that need a fetch now.
    pub fn invalidate_batch(&mut self, keys: impl IntoIterator<Item = QueryKey>) -> Vec<QueryKey> {
        let mut unique: Vec<QueryKey> = Vec::new();
        for key in keys {
            if !unique.contains(&key) {
                unique.push(key);
            }
        }

        unique.into_iter().filter(|&key| self.invalidate(key)).collect()
    }

    /// True when the entry is invalidated or older than the stale time
    pub fn is_stale(&self, key: QueryKey, now: Instant) -> bool {
        match self.entries.get(&key) {
            None => true,
            Some(entry) => {
                entry.invalidated
                    || entry
                        .updated_at
                        .map_or(true, |at| now.saturating_duration_since(at) >= self.stale_time)
            }
        }
    }

    /// True when a stale entry has no fetch in flight (e.g. on window focus)
    pub fn should_refetch(&self, key: QueryKey, now: Instant) -> bool {
        let idle = self.entries.get(&key).map_or(true, |entry| entry.in_flight.is_none());
        idle && self.is_stale(key, now)
    }

    pub fn state(&self, key: QueryKey) -> QueryState<'_, T> {
        match self.entries.get(&key) {
            None => QueryState {
                data: None,
                is_loading: false,
                is_fetching: false,
                is_error: false,
                error: None,
            },
            Some(entry) => QueryState {
                data: entry.data.as_ref(),
                is_loading: entry.data.is_none() && entry.in_flight.is_some(),
                is_fetching: entry.in_flight.is_some(),
                is_error: entry.error.is_some(),
                error: entry.error.as_deref(),
            },
        }
    }
}
