use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::config::BrowserConfig;
use crate::filter::FilterState;
use crate::grid;
use crate::overlay::OverlayState;
use crate::pagination::PaginationState;

/// One catalog entry as decoded from `/pokemon/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u16,
    pub name: String,
    pub primary_type: String,
    pub secondary_type: Option<String>,
    pub image_url: Option<String>,
    pub height: u16,
    pub weight: u16,
    pub abilities: Vec<String>,
    pub stats: BaseStats,
}

impl Pokemon {
    pub fn types(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_type.as_str()).chain(self.secondary_type.as_deref())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

impl BaseStats {
    pub const LABELS: [&'static str; 6] = ["HP", "Attack", "Defense", "Sp. Atk", "Sp. Def", "Speed"];

    /// Positional order used by the API: hp, attack, defense, sp. atk, sp. def, speed.
    pub fn from_positional(values: [u16; 6]) -> Self {
        let [hp, attack, defense, special_attack, special_defense, speed] = values;
        Self {
            hp,
            attack,
            defense,
            special_attack,
            special_defense,
            speed,
        }
    }

    pub fn values(&self) -> [u16; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.special_attack,
            self.special_defense,
            self.speed,
        ]
    }

    pub fn total(&self) -> u32 {
        self.values().iter().map(|value| *value as u32).sum()
    }
}

/// Append-only, fetch-ordered record list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordStore {
    records: Vec<Pokemon>,
}

impl RecordStore {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pokemon> {
        self.records.iter()
    }

    pub fn get(&self, id: u16) -> Option<&Pokemon> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn contains(&self, id: u16) -> bool {
        self.get(id).is_some()
    }

    /// Appends in order, skipping ids already present. Returns how many were added.
    pub fn append(&mut self, batch: impl IntoIterator<Item = Pokemon>) -> usize {
        let before = self.records.len();
        for record in batch {
            if self.contains(record.id) {
                tracing::warn!(id = record.id, "duplicate record ignored");
                continue;
            }
            self.records.push(record);
        }
        self.records.len() - before
    }
}

impl FromIterator<Pokemon> for RecordStore {
    fn from_iter<T: IntoIterator<Item = Pokemon>>(iter: T) -> Self {
        let mut store = RecordStore::default();
        store.append(iter);
        store
    }
}

/// Lifecycle of the first batch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum BootState {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub boot: BootState,
    pub store: RecordStore,
    pub pagination: PaginationState,
    pub filter: FilterState,
    /// Ids currently materialized in the grid, in display order.
    pub rendered: Vec<u16>,
    pub cursor: usize,
    pub overlay: OverlayState,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(BrowserConfig::default())
    }
}

impl AppState {
    pub fn new(config: BrowserConfig) -> Self {
        let config = config.normalized();
        Self {
            terminal_size: (80, 24),
            boot: BootState::Loading,
            store: RecordStore::default(),
            pagination: PaginationState::new(config.page_size, config.ceiling),
            filter: FilterState::new(config.search_strategy, config.debounce_ms),
            rendered: Vec::new(),
            cursor: 0,
            overlay: OverlayState::default(),
        }
    }

    pub fn loaded_count(&self) -> usize {
        self.store.len()
    }

    /// Recomputes the rendered set from the current source and keeps the cursor in range.
    pub fn redraw_grid(&mut self) {
        self.rendered = grid::rendered_set(&self.store, &self.filter, self.pagination.display_cap);
        if self.cursor >= self.rendered.len() {
            self.cursor = self.rendered.len().saturating_sub(1);
        }
    }

    pub fn selected_id(&self) -> Option<u16> {
        self.rendered.get(self.cursor).copied()
    }

    pub fn rendered_position(&self, id: u16) -> Option<usize> {
        self.rendered.iter().position(|rendered| *rendered == id)
    }

    pub fn overlay_record(&self) -> Option<&Pokemon> {
        self.overlay.open.and_then(|id| self.store.get(id))
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Store")
                .entry("loaded", ron_string(&self.store.len()))
                .entry("rendered", ron_string(&self.rendered.len()))
                .entry("cursor", ron_string(&self.cursor))
                .entry("boot", ron_string(&self.boot)),
            DebugSection::new("Pagination")
                .entry("display_cap", ron_string(&self.pagination.display_cap))
                .entry("next_id", ron_string(&self.pagination.next_id))
                .entry("owed", ron_string(&self.pagination.owed))
                .entry("in_flight", ron_string(&self.pagination.in_flight))
                .entry("last_error", ron_string(&self.pagination.last_error)),
            DebugSection::new("Filter")
                .entry("input", ron_string(&self.filter.input))
                .entry("editing", ron_string(&self.filter.editing))
                .entry("active", ron_string(&self.filter.active))
                .entry("term", ron_string(&self.filter.term))
                .entry("matches", ron_string(&self.filter.matches.len()))
                .entry("strategy", ron_string(&self.filter.strategy)),
            DebugSection::new("Overlay")
                .entry("open", ron_string(&self.overlay.open))
                .entry("tab", ron_string(&self.overlay.tab)),
        ]
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn pokemon(id: u16, name: &str) -> Pokemon {
        Pokemon {
            id,
            name: name.to_string(),
            primary_type: "normal".to_string(),
            secondary_type: None,
            image_url: Some(format!("https://img.example/{id}.png")),
            height: 7,
            weight: 69,
            abilities: vec!["overgrow".to_string()],
            stats: BaseStats::from_positional([45, 49, 49, 65, 65, 45]),
        }
    }

    pub fn ready_state(records: Vec<Pokemon>) -> AppState {
        let mut state = AppState::default();
        state.pagination.next_id = records.iter().map(|r| u32::from(r.id)).max().unwrap_or(0) + 1;
        state.store = records.into_iter().collect();
        state.boot = BootState::Ready;
        state.redraw_grid();
        state
    }
}
