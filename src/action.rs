use serde::{Deserialize, Serialize};

use crate::api::BatchOutcome;
use crate::overlay::DetailTab;
use crate::pagination::BatchKind;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,
    BootRetry,

    BatchDidLoad {
        kind: BatchKind,
        requested: Vec<u16>,
        outcome: BatchOutcome,
    },

    LoadMore,
    /// Fetch one more batch, then re-run the current search term.
    LoadMoreAndSearch,

    SearchStart,
    SearchInput(char),
    SearchBackspace,
    SearchCancel,
    SearchSubmit,
    SearchDidSettle { term: String, generation: u64 },

    /// Move the grid cursor by a signed number of cards.
    GridCursorMove(i16),
    GridOpenSelected,

    OverlayOpen(u16),
    OverlayNext,
    OverlayPrev,
    OverlaySelectTab(DetailTab),
    OverlayToggleTab,
    OverlayClose,

    UiTerminalResize(u16, u16),
    Quit,
}
