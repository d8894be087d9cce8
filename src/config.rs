//! Session configuration assembled from command-line flags.

use serde::{Deserialize, Serialize};

use crate::filter::SearchStrategy;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_PAGE_SIZE: usize = 30;
pub const DEFAULT_CEILING: u16 = 1025;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Tunables for one browsing session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub api_base: String,
    pub page_size: usize,
    pub ceiling: u16,
    pub debounce_ms: u64,
    pub search_strategy: SearchStrategy,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            ceiling: DEFAULT_CEILING,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            search_strategy: SearchStrategy::default(),
        }
    }
}

impl BrowserConfig {
    /// Clamp values that would stall pagination.
    pub fn normalized(mut self) -> Self {
        self.page_size = self.page_size.max(1);
        self.ceiling = self.ceiling.max(1);
        self.api_base = self.api_base.trim_end_matches('/').to_string();
        self
    }
}
