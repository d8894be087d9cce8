//! Side effects declared by the reducer

use crate::pagination::BatchKind;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch `ids` sequentially with the policy of `kind`.
    LoadBatch { kind: BatchKind, ids: Vec<u16> },
    /// Settle the search input after `delay_ms` unless re-armed first.
    ScheduleSearch {
        term: String,
        generation: u64,
        delay_ms: u64,
    },
}
