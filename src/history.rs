//! Bounded in-process scan history.
//!
//! A most-recent-first ring of the last `HISTORY_CAPACITY` results. The
//! bound is enforced structurally (truncate after every push) rather than by
//! callers remembering to trim. Items are immutable once recorded; reads
//! never mutate.
//!
//! Also home of `ScanGuard`, the generation counter that makes the
//! single-in-flight guard authoritative: a completion from a superseded
//! request can observe that its token is stale and must not commit.

use std::collections::VecDeque;

use crate::report::{AnalysisResult, HistoryItem};

/// Maximum number of retained history items.
pub const HISTORY_CAPACITY: usize = 10;

/// Most-recent-first bounded history of analysis results.
#[derive(Debug, Default)]
pub struct ScanHistory {
    items: VecDeque<HistoryItem>,
}

impl ScanHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            items: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }

    /// Record a result at the head, evicting from the tail past capacity.
    /// Returns the recorded item (with its fresh identifier).
    pub fn record(&mut self, result: AnalysisResult) -> HistoryItem {
        let item = HistoryItem::new(result);
        self.items.push_front(item.clone());
        self.items.truncate(HISTORY_CAPACITY);
        item
    }

    /// Iterate items most-recent-first. Read-only; repeated calls without an
    /// intervening `record` observe the identical sequence.
    pub fn list(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter()
    }

    /// Most recently recorded item, if any.
    pub fn latest(&self) -> Option<&HistoryItem> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Token identifying one issued analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanToken(u64);

/// Generation counter guarding against stale completions.
///
/// Each new request takes a token; only the holder of the current token may
/// commit its result. A response arriving after a newer request was issued
/// sees `is_current == false` and is discarded instead of overwriting the
/// newer state.
#[derive(Debug, Default)]
pub struct ScanGuard {
    generation: u64,
}

impl ScanGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new request, invalidating all previously issued tokens.
    pub fn begin(&mut self) -> ScanToken {
        self.generation += 1;
        ScanToken(self.generation)
    }

    /// Whether the given token still belongs to the newest request.
    pub fn is_current(&self, token: ScanToken) -> bool {
        token.0 == self.generation
    }
}
