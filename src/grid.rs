//! Pure projection of the store into what the grid shows.

use serde::{Deserialize, Serialize};

use crate::filter::FilterState;
use crate::state::{AppState, Pokemon, RecordStore};

/// Ids the grid materializes: the whole filtered view when a filter is
/// active, otherwise the store truncated to `display_cap`.
pub fn rendered_set(store: &RecordStore, filter: &FilterState, display_cap: usize) -> Vec<u16> {
    if filter.active {
        return filter.matches.clone();
    }
    store.iter().take(display_cap).map(|record| record.id).collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridCard {
    pub id: u16,
    pub name: String,
    pub primary_type: String,
    pub secondary_type: Option<String>,
    pub image_url: Option<String>,
    /// Type that picks the card palette.
    pub theme: String,
}

impl From<&Pokemon> for GridCard {
    fn from(record: &Pokemon) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            primary_type: record.primary_type.clone(),
            secondary_type: record.secondary_type.clone(),
            image_url: record.image_url.clone(),
            theme: record.primary_type.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadMoreState {
    Hidden,
    Ready { loaded: usize, ceiling: u16 },
    Loading { loaded: usize, ceiling: u16 },
    Retry { error: String },
    AllLoaded,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSummary {
    pub found: usize,
    pub loaded: usize,
    pub ceiling: u16,
}

impl SearchSummary {
    pub fn line(&self) -> String {
        if self.loaded < self.ceiling as usize {
            format!("{} Pokémon found (of {} loaded)", self.found, self.loaded)
        } else {
            format!("{} Pokémon found", self.found)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GridBody {
    Cards(Vec<GridCard>),
    NoResults { term: String, can_load_more: bool },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridView {
    pub body: GridBody,
    pub load_more: LoadMoreState,
    pub summary: Option<SearchSummary>,
}

pub fn load_more_state(state: &AppState) -> LoadMoreState {
    let pagination = &state.pagination;
    let loaded = state.loaded_count();
    if state.filter.active {
        return LoadMoreState::Hidden;
    }
    if pagination.in_flight {
        return LoadMoreState::Loading {
            loaded,
            ceiling: pagination.ceiling,
        };
    }
    if let Some(error) = &pagination.last_error {
        return LoadMoreState::Retry {
            error: error.clone(),
        };
    }
    if pagination.has_more(loaded) {
        return LoadMoreState::Ready {
            loaded,
            ceiling: pagination.ceiling,
        };
    }
    LoadMoreState::AllLoaded
}

pub fn project(state: &AppState) -> GridView {
    let loaded = state.loaded_count();
    let ceiling = state.pagination.ceiling;

    let body = if state.filter.has_no_results() {
        GridBody::NoResults {
            term: state.filter.term.clone(),
            can_load_more: loaded < ceiling as usize,
        }
    } else {
        GridBody::Cards(
            state
                .rendered
                .iter()
                .filter_map(|id| state.store.get(*id))
                .map(GridCard::from)
                .collect(),
        )
    };

    let summary = state.filter.active.then(|| SearchSummary {
        found: state.filter.matches.len(),
        loaded,
        ceiling,
    });

    GridView {
        body,
        load_more: load_more_state(state),
        summary,
    }
}
