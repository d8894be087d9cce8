//! Search over records that are already in the store.

use serde::{Deserialize, Serialize};

use crate::state::{Pokemon, RecordStore};

/// Predicate used to match a search term against a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum SearchStrategy {
    /// Case-insensitive prefix of the display name.
    #[default]
    Prefix,
    /// Substring of the name or any type, or the exact numeric id.
    Advanced,
}

impl SearchStrategy {
    /// `term` must already be normalized (see [`normalize_term`]).
    pub fn matches(self, record: &Pokemon, term: &str) -> bool {
        let name = record.name.to_lowercase();
        match self {
            SearchStrategy::Prefix => name.starts_with(term),
            SearchStrategy::Advanced => {
                if name.contains(term) {
                    return true;
                }
                if record
                    .types()
                    .any(|type_name| type_name.to_lowercase().contains(term))
                {
                    return true;
                }
                term.parse::<u16>().is_ok_and(|id| id == record.id)
            }
        }
    }
}

pub fn normalize_term(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Ids of matching records, in store order.
pub fn filter_ids(store: &RecordStore, term: &str, strategy: SearchStrategy) -> Vec<u16> {
    store
        .iter()
        .filter(|record| strategy.matches(record, term))
        .map(|record| record.id)
        .collect()
}

/// Generation token for the search debounce timer.
///
/// Arming returns a new generation and invalidates every earlier one, so only
/// the most recent timer can fire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceHandle {
    generation: u64,
    armed: bool,
}

impl DebounceHandle {
    pub fn arm(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.armed = true;
        self.generation
    }

    /// Consumes the timer if `generation` is the outstanding one.
    pub fn fire(&mut self, generation: u64) -> bool {
        if self.armed && generation == self.generation {
            self.armed = false;
            return true;
        }
        false
    }

    pub fn cancel(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub strategy: SearchStrategy,
    pub debounce_ms: u64,
    pub debounce: DebounceHandle,
    /// Raw text of the search field.
    pub input: String,
    pub editing: bool,
    pub active: bool,
    /// Normalized term the current matches were computed for.
    pub term: String,
    pub matches: Vec<u16>,
}

impl FilterState {
    pub fn new(strategy: SearchStrategy, debounce_ms: u64) -> Self {
        Self {
            strategy,
            debounce_ms,
            debounce: DebounceHandle::default(),
            input: String::new(),
            editing: false,
            active: false,
            term: String::new(),
            matches: Vec::new(),
        }
    }

    /// Recomputes the filtered view for `term` over the whole store.
    pub fn apply(&mut self, store: &RecordStore, term: String) {
        self.matches = filter_ids(store, &term, self.strategy);
        self.term = term;
        self.active = true;
    }

    pub fn clear(&mut self) {
        self.active = false;
        self.term.clear();
        self.matches.clear();
    }

    pub fn has_no_results(&self) -> bool {
        self.active && self.matches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures::pokemon;
    use pretty_assertions::assert_eq;

    fn store(names: &[(u16, &str)]) -> RecordStore {
        names.iter().map(|(id, name)| pokemon(*id, name)).collect()
    }

    #[test]
    fn test_prefix_keeps_store_order() {
        let store = store(&[(4, "charmander"), (6, "charizard"), (7, "squirtle")]);
        let ids = filter_ids(&store, &normalize_term("char"), SearchStrategy::Prefix);
        assert_eq!(ids, vec![4, 6]);
    }

    #[test]
    fn test_prefix_is_not_substring() {
        let store = store(&[(25, "pikachu"), (26, "raichu")]);
        assert_eq!(filter_ids(&store, "chu", SearchStrategy::Prefix), Vec::<u16>::new());
        assert_eq!(filter_ids(&store, "rai", SearchStrategy::Prefix), vec![26]);
    }

    #[test]
    fn test_prefix_law_over_mixed_case_names() {
        let store = store(&[(1, "Bulbasaur"), (2, "ivysaur"), (3, "BULKY"), (4, "abul")]);
        for raw in ["b", "BU", "  bul ", "ivy", "x", ""] {
            let term = normalize_term(raw);
            let expected: Vec<u16> = store
                .iter()
                .filter(|record| record.name.to_lowercase().starts_with(&term))
                .map(|record| record.id)
                .collect();
            assert_eq!(filter_ids(&store, &term, SearchStrategy::Prefix), expected);
        }
    }

    #[test]
    fn test_advanced_matches_type_and_exact_id() {
        let mut records = vec![pokemon(6, "charizard"), pokemon(16, "pidgey")];
        records[0].primary_type = "fire".into();
        records[0].secondary_type = Some("flying".into());
        records[1].secondary_type = Some("flying".into());
        let store: RecordStore = records.into_iter().collect();

        assert_eq!(filter_ids(&store, "fly", SearchStrategy::Advanced), vec![6, 16]);
        assert_eq!(filter_ids(&store, "6", SearchStrategy::Advanced), vec![6]);
        assert_eq!(filter_ids(&store, "zard", SearchStrategy::Advanced), vec![6]);
    }

    #[test]
    fn test_debounce_only_latest_generation_fires() {
        let mut handle = DebounceHandle::default();
        let first = handle.arm();
        let second = handle.arm();
        assert!(!handle.fire(first));
        assert!(handle.fire(second));
        assert!(!handle.fire(second));
    }

    #[test]
    fn test_cancelled_debounce_never_fires() {
        let mut handle = DebounceHandle::default();
        let generation = handle.arm();
        handle.cancel();
        assert!(!handle.is_armed());
        assert!(!handle.fire(generation));
    }
}
