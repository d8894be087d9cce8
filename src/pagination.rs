//! Batch planning for progressive loading.
//!
//! Ids are handed out from two sources: ids owed by earlier batches (failed or
//! never attempted) and a sequential cursor. Owed ids always go first so a
//! skipped record is retried before new ones, which keeps ids unique in the
//! store and the ceiling reachable.

use serde::{Deserialize, Serialize};

/// How a batch reacts to a failing item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchKind {
    /// First batch of the session: skip failing ids and keep going.
    Initial,
    /// User-requested batch: stop at the first failure.
    More,
}

impl BatchKind {
    pub fn label(self) -> &'static str {
        match self {
            BatchKind::Initial => "initial",
            BatchKind::More => "more",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchPlan {
    pub kind: BatchKind,
    pub ids: Vec<u16>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaginationState {
    pub page_size: usize,
    pub ceiling: u16,
    /// How many loaded records the unfiltered grid shows.
    pub display_cap: usize,
    /// Next id never handed out yet.
    pub next_id: u32,
    /// Ids planned earlier but not fetched, ascending.
    pub owed: Vec<u16>,
    pub in_flight: bool,
    pub last_error: Option<String>,
    /// Term to re-run once the in-flight batch lands.
    pub research: Option<String>,
}

impl PaginationState {
    pub fn new(page_size: usize, ceiling: u16) -> Self {
        Self {
            page_size,
            ceiling,
            display_cap: page_size,
            next_id: 1,
            owed: Vec::new(),
            in_flight: false,
            last_error: None,
            research: None,
        }
    }

    pub fn is_complete(&self, loaded: usize) -> bool {
        loaded >= self.ceiling as usize
    }

    /// `min(page_size, ceiling - loaded)`.
    pub fn next_batch_size(&self, loaded: usize) -> usize {
        self.page_size
            .min((self.ceiling as usize).saturating_sub(loaded))
    }

    /// Hands out the ids for the next batch and marks it in flight.
    ///
    /// Returns `None` while a batch is outstanding or when nothing is left.
    pub fn plan(&mut self, kind: BatchKind, loaded: usize) -> Option<BatchPlan> {
        if self.in_flight {
            return None;
        }
        let size = self.next_batch_size(loaded);
        if size == 0 {
            return None;
        }

        let take_owed = size.min(self.owed.len());
        let mut ids: Vec<u16> = self.owed.drain(..take_owed).collect();
        while ids.len() < size && self.next_id <= u32::from(self.ceiling) {
            ids.push(self.next_id as u16);
            self.next_id += 1;
        }
        if ids.is_empty() {
            return None;
        }

        self.in_flight = true;
        self.last_error = None;
        Some(BatchPlan { kind, ids })
    }

    /// Closes the in-flight batch. Planned ids that did not arrive become owed.
    pub fn finish(&mut self, planned: &[u16], fetched: &[u16], error: Option<String>) {
        for id in planned {
            if !fetched.contains(id) && !self.owed.contains(id) {
                self.owed.push(*id);
            }
        }
        self.owed.sort_unstable();
        self.in_flight = false;
        self.last_error = error;
    }

    /// Whether the unfiltered grid should offer "load more".
    pub fn has_more(&self, loaded: usize) -> bool {
        !self.is_complete(loaded) || self.display_cap < loaded
    }
}
