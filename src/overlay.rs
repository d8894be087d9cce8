//! Detail overlay state and its view-model.

use serde::{Deserialize, Serialize};

use crate::state::{AppState, BaseStats, Pokemon};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailTab {
    #[default]
    About,
    Stats,
}

impl DetailTab {
    pub const ALL: [DetailTab; 2] = [DetailTab::About, DetailTab::Stats];

    pub fn toggle(self) -> Self {
        match self {
            DetailTab::About => DetailTab::Stats,
            DetailTab::Stats => DetailTab::About,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DetailTab::About => "About",
            DetailTab::Stats => "Stats",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayState {
    pub open: Option<u16>,
    /// Remembered while open, reset on close.
    pub tab: DetailTab,
}

impl OverlayState {
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Next,
    Prev,
}

/// Wrap-around neighbor of `current` in `rendered`.
///
/// `None` when `current` is not rendered, which disables navigation.
pub fn neighbor(rendered: &[u16], current: u16, step: Step) -> Option<u16> {
    let len = rendered.len();
    let index = rendered.iter().position(|id| *id == current)?;
    let target = match step {
        Step::Next => (index + 1) % len,
        Step::Prev => (index + len - 1) % len,
    };
    rendered.get(target).copied()
}

/// "a", "a, b" or "a, b and c". Abilities past the third are left out.
pub fn abilities_line(abilities: &[String]) -> String {
    let mut line = String::new();
    for (index, ability) in abilities.iter().take(3).enumerate() {
        match index {
            0 => {}
            1 => line.push_str(", "),
            _ => line.push_str(" and "),
        }
        line.push_str(ability);
    }
    line
}

pub fn species_line(record: &Pokemon) -> String {
    match &record.secondary_type {
        Some(secondary) => format!("{} and {}", record.primary_type, secondary),
        None => record.primary_type.clone(),
    }
}

/// Height arrives in decimeters.
pub fn format_height(decimeters: u16) -> String {
    format!("{} cm", u32::from(decimeters) * 10)
}

/// Weight arrives in hectograms.
pub fn format_weight(hectograms: u16) -> String {
    format!("{}.{} kg", hectograms / 10, hectograms % 10)
}

/// Highest base stat a bar is scaled against.
pub const STAT_BAR_MAX: u16 = 255;

pub fn stat_bar_width(value: u16, max_cells: u16) -> u16 {
    let value = value.min(STAT_BAR_MAX) as u32;
    ((value * max_cells as u32 + STAT_BAR_MAX as u32 / 2) / STAT_BAR_MAX as u32) as u16
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatRow {
    pub label: &'static str,
    pub value: u16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailView {
    pub id: u16,
    pub name: String,
    pub primary_type: String,
    pub species: String,
    pub image_url: Option<String>,
    pub height: u16,
    pub weight: u16,
    pub abilities: String,
    pub stats: Vec<StatRow>,
    pub total: u32,
    pub tab: DetailTab,
    /// False when the record is not in the rendered set.
    pub can_navigate: bool,
}

fn stat_rows(stats: &BaseStats) -> Vec<StatRow> {
    BaseStats::LABELS
        .into_iter()
        .zip(stats.values())
        .map(|(label, value)| StatRow { label, value })
        .collect()
}

pub fn detail_view(state: &AppState) -> Option<DetailView> {
    let record = state.overlay_record()?;
    Some(DetailView {
        id: record.id,
        name: record.name.clone(),
        primary_type: record.primary_type.clone(),
        species: species_line(record),
        image_url: record.image_url.clone(),
        height: record.height,
        weight: record.weight,
        abilities: abilities_line(&record.abilities),
        stats: stat_rows(&record.stats),
        total: record.stats.total(),
        tab: state.overlay.tab,
        can_navigate: state.rendered_position(record.id).is_some(),
    })
}
