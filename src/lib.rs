//! Pokemon card browser for the terminal.
//!
//! Records are fetched from the PokeAPI in batches, shown as a card grid,
//! searched locally and inspected in a detail overlay.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod filter;
pub mod grid;
pub mod logging;
pub mod overlay;
pub mod pagination;
pub mod reducer;
pub mod state;
