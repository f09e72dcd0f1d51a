//! Settings that control how the coordinator applies store responses.

/// How responses from overlapping fetches are applied to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchOrdering {
    /// Every fetch response is applied as it arrives, so the last response to
    /// arrive wins even if it belongs to an older fetch.
    #[default]
    LastWriterWins,
    /// Only the most recently issued fetch writes to the state. An older fetch
    /// that has not started yet is skipped, and a response from an older fetch
    /// is dropped without touching the state.
    DiscardStale,
}

/// The config for a [TransactionCoordinator](crate::TransactionCoordinator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordinatorConfig {
    /// How overlapping fetch responses are applied.
    pub fetch_ordering: FetchOrdering,
}

impl CoordinatorConfig {
    /// A config that only applies the newest fetch response.
    pub fn discard_stale_fetches() -> Self {
        Self {
            fetch_ordering: FetchOrdering::DiscardStale,
        }
    }
}
