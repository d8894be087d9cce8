//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::api::BatchOutcome;
use crate::effect::Effect;
use crate::filter::normalize_term;
use crate::overlay::{neighbor, DetailTab, Step};
use crate::pagination::BatchKind;
use crate::state::{AppState, BootState};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => start_initial_batch(state),

        Action::BootRetry => {
            if !matches!(state.boot, BootState::Failed(_)) {
                return DispatchResult::unchanged();
            }
            start_initial_batch(state)
        }

        Action::BatchDidLoad {
            kind,
            requested,
            outcome,
        } => batch_did_load(state, kind, &requested, outcome),

        // ===== Pagination =====
        Action::LoadMore => {
            if state.boot != BootState::Ready || state.filter.active {
                return DispatchResult::unchanged();
            }
            load_more(state)
        }

        Action::LoadMoreAndSearch => {
            if !state.filter.active || state.pagination.is_complete(state.loaded_count()) {
                return DispatchResult::unchanged();
            }
            state.pagination.research = Some(state.filter.term.clone());
            if state.pagination.in_flight {
                return DispatchResult::changed();
            }
            match state.pagination.plan(BatchKind::More, state.loaded_count()) {
                Some(plan) => DispatchResult::changed_with(Effect::LoadBatch {
                    kind: plan.kind,
                    ids: plan.ids,
                }),
                None => {
                    state.pagination.research = None;
                    DispatchResult::unchanged()
                }
            }
        }

        // ===== Search =====
        Action::SearchStart => {
            if state.boot != BootState::Ready || state.filter.editing {
                return DispatchResult::unchanged();
            }
            state.filter.editing = true;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            if !state.filter.editing {
                return DispatchResult::unchanged();
            }
            state.filter.input.push(ch);
            schedule_search(state)
        }

        Action::SearchBackspace => {
            if !state.filter.editing || state.filter.input.pop().is_none() {
                return DispatchResult::unchanged();
            }
            schedule_search(state)
        }

        Action::SearchCancel => {
            if !state.filter.editing && state.filter.input.is_empty() && !state.filter.active {
                return DispatchResult::unchanged();
            }
            state.filter.editing = false;
            state.filter.input.clear();
            schedule_search(state)
        }

        Action::SearchSubmit => {
            if !state.filter.editing {
                return DispatchResult::unchanged();
            }
            state.filter.editing = false;
            if state.filter.debounce.is_armed() {
                // Enter applies the typed term now instead of waiting for the timer.
                state.filter.debounce.cancel();
                let term = state.filter.input.clone();
                apply_term(state, &term);
            }
            DispatchResult::changed()
        }

        Action::SearchDidSettle { term, generation } => {
            if !state.filter.debounce.fire(generation) {
                tracing::debug!(generation, "stale search timer ignored");
                return DispatchResult::unchanged();
            }
            apply_term(state, &term)
        }

        // ===== Grid =====
        Action::GridCursorMove(delta) => {
            let len = state.rendered.len();
            if len == 0 {
                return DispatchResult::unchanged();
            }
            let target = (state.cursor as i64 + delta as i64).clamp(0, len as i64 - 1) as usize;
            if target == state.cursor {
                return DispatchResult::unchanged();
            }
            state.cursor = target;
            DispatchResult::changed()
        }

        Action::GridOpenSelected => match state.selected_id() {
            Some(id) => open_overlay(state, id),
            None => DispatchResult::unchanged(),
        },

        // ===== Overlay =====
        Action::OverlayOpen(id) => open_overlay(state, id),

        Action::OverlayNext => navigate(state, Step::Next),

        Action::OverlayPrev => navigate(state, Step::Prev),

        Action::OverlaySelectTab(tab) => {
            if !state.overlay.is_open() || state.overlay.tab == tab {
                return DispatchResult::unchanged();
            }
            state.overlay.tab = tab;
            DispatchResult::changed()
        }

        Action::OverlayToggleTab => {
            if !state.overlay.is_open() {
                return DispatchResult::unchanged();
            }
            state.overlay.tab = state.overlay.tab.toggle();
            DispatchResult::changed()
        }

        Action::OverlayClose => {
            if !state.overlay.is_open() {
                return DispatchResult::unchanged();
            }
            state.overlay.open = None;
            state.overlay.tab = DetailTab::About;
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn start_initial_batch(state: &mut AppState) -> DispatchResult<Effect> {
    match state.pagination.plan(BatchKind::Initial, state.loaded_count()) {
        Some(plan) => {
            state.boot = BootState::Loading;
            DispatchResult::changed_with(Effect::LoadBatch {
                kind: plan.kind,
                ids: plan.ids,
            })
        }
        None => DispatchResult::unchanged(),
    }
}

fn batch_did_load(
    state: &mut AppState,
    kind: BatchKind,
    requested: &[u16],
    outcome: BatchOutcome,
) -> DispatchResult<Effect> {
    let fetched = outcome.fetched_ids();
    let error = match kind {
        BatchKind::Initial => None,
        BatchKind::More => outcome.error(),
    };
    let first_failure = outcome.error();
    let added = state.store.append(outcome.records);
    state.pagination.finish(requested, &fetched, error);

    let loaded = state.loaded_count();
    tracing::info!(batch = kind.label(), added, loaded, "batch applied");

    if kind == BatchKind::Initial {
        state.boot = if loaded == 0 {
            let message = first_failure.unwrap_or_else(|| "no records received".to_string());
            tracing::error!(%message, "initial load failed");
            BootState::Failed(message)
        } else {
            BootState::Ready
        };
    }

    if !state.filter.active {
        state.pagination.display_cap = state.pagination.display_cap.max(loaded);
    }
    if state.pagination.research.take().is_some() && state.filter.active {
        let term = state.filter.term.clone();
        state.filter.apply(&state.store, term);
    }
    state.redraw_grid();
    DispatchResult::changed()
}

fn load_more(state: &mut AppState) -> DispatchResult<Effect> {
    if state.pagination.in_flight {
        return DispatchResult::unchanged();
    }
    let loaded = state.loaded_count();
    if state.pagination.is_complete(loaded) {
        if state.pagination.display_cap < loaded {
            state.pagination.display_cap = loaded;
            state.redraw_grid();
            return DispatchResult::changed();
        }
        return DispatchResult::unchanged();
    }
    match state.pagination.plan(BatchKind::More, loaded) {
        Some(plan) => DispatchResult::changed_with(Effect::LoadBatch {
            kind: plan.kind,
            ids: plan.ids,
        }),
        None => DispatchResult::unchanged(),
    }
}

fn schedule_search(state: &mut AppState) -> DispatchResult<Effect> {
    let generation = state.filter.debounce.arm();
    DispatchResult::changed_with(Effect::ScheduleSearch {
        term: state.filter.input.clone(),
        generation,
        delay_ms: state.filter.debounce_ms,
    })
}

fn apply_term(state: &mut AppState, raw: &str) -> DispatchResult<Effect> {
    let term = normalize_term(raw);
    if term.is_empty() {
        if !state.filter.active {
            return DispatchResult::unchanged();
        }
        state.filter.clear();
        state.pagination.display_cap = state
            .pagination
            .display_cap
            .max(state.pagination.page_size);
    } else {
        state.filter.apply(&state.store, term);
    }
    state.cursor = 0;
    state.redraw_grid();
    DispatchResult::changed()
}

fn open_overlay(state: &mut AppState, id: u16) -> DispatchResult<Effect> {
    if !state.store.contains(id) {
        tracing::error!(id, "pokemon not found in store");
        return DispatchResult::unchanged();
    }
    state.overlay.open = Some(id);
    if let Some(position) = state.rendered_position(id) {
        state.cursor = position;
    }
    DispatchResult::changed()
}

fn navigate(state: &mut AppState, step: Step) -> DispatchResult<Effect> {
    let Some(current) = state.overlay.open else {
        return DispatchResult::unchanged();
    };
    match neighbor(&state.rendered, current, step) {
        Some(target) => open_overlay(state, target),
        None => DispatchResult::unchanged(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchFailure;
    use crate::state::fixtures::{pokemon, ready_state};
    use pretty_assertions::assert_eq;

    fn outcome(ids: &[u16]) -> BatchOutcome {
        BatchOutcome {
            records: ids.iter().map(|id| pokemon(*id, &format!("mon{id}"))).collect(),
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_init_plans_first_page() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Init);
        assert!(result.changed);
        assert_eq!(
            result.effects,
            vec![Effect::LoadBatch {
                kind: BatchKind::Initial,
                ids: (1..=30).collect()
            }]
        );
        assert_eq!(state.boot, BootState::Loading);
    }

    #[test]
    fn test_initial_batch_skips_failures() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        let mut result = outcome(&(1..=30).filter(|id| *id != 3).collect::<Vec<_>>());
        result.failures.push(FetchFailure {
            id: 3,
            error: "HTTP 500".into(),
        });

        reducer(
            &mut state,
            Action::BatchDidLoad {
                kind: BatchKind::Initial,
                requested: (1..=30).collect(),
                outcome: result,
            },
        );

        assert_eq!(state.boot, BootState::Ready);
        assert_eq!(state.loaded_count(), 29);
        assert_eq!(state.pagination.owed, vec![3]);
        assert_eq!(state.pagination.last_error, None);
        assert!(!state.pagination.in_flight);
    }

    #[test]
    fn test_initial_batch_with_nothing_fails_boot() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        let failures = BatchOutcome {
            records: Vec::new(),
            failures: vec![FetchFailure {
                id: 1,
                error: "offline".into(),
            }],
        };
        reducer(
            &mut state,
            Action::BatchDidLoad {
                kind: BatchKind::Initial,
                requested: (1..=30).collect(),
                outcome: failures,
            },
        );
        assert_eq!(state.boot, BootState::Failed("#1: offline".into()));

        let retry = reducer(&mut state, Action::BootRetry);
        assert_eq!(retry.effects.len(), 1);
        assert_eq!(state.boot, BootState::Loading);
    }

    #[test]
    fn test_double_load_more_yields_one_batch() {
        let mut state = ready_state((1..=30).map(|id| pokemon(id, "mon")).collect());
        let first = reducer(&mut state, Action::LoadMore);
        let second = reducer(&mut state, Action::LoadMore);
        assert_eq!(first.effects.len(), 1);
        assert!(!second.changed);
        assert!(second.effects.is_empty());
    }

    #[test]
    fn test_aborted_more_batch_shows_retry_and_updates_cap() {
        let mut state = ready_state((1..=30).map(|id| pokemon(id, "mon")).collect());
        reducer(&mut state, Action::LoadMore);
        let mut partial = outcome(&[31, 32]);
        partial.failures.push(FetchFailure {
            id: 33,
            error: "HTTP 503".into(),
        });
        reducer(
            &mut state,
            Action::BatchDidLoad {
                kind: BatchKind::More,
                requested: (31..=60).collect(),
                outcome: partial,
            },
        );

        assert_eq!(state.loaded_count(), 32);
        assert_eq!(state.pagination.display_cap, 32);
        assert_eq!(state.pagination.last_error.as_deref(), Some("#33: HTTP 503"));
        assert_eq!(state.pagination.owed.first(), Some(&33));

        let retry = reducer(&mut state, Action::LoadMore);
        let Effect::LoadBatch { ids, .. } = &retry.effects[0] else {
            panic!("expected a batch");
        };
        assert_eq!(ids.len(), 30);
        assert_eq!(ids[0], 33);
        assert_eq!(ids.last(), Some(&62));
    }

    #[test]
    fn test_load_more_at_ceiling_reveals_capped_records() {
        let mut state = ready_state((1..=40).map(|id| pokemon(id, "mon")).collect());
        state.pagination.ceiling = 40;
        assert_eq!(state.rendered.len(), 30);

        let result = reducer(&mut state, Action::LoadMore);
        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.rendered.len(), 40);

        let again = reducer(&mut state, Action::LoadMore);
        assert!(!again.changed);
    }

    #[test]
    fn test_search_edit_schedules_latest_generation_only() {
        let mut state = ready_state(vec![pokemon(4, "charmander"), pokemon(7, "squirtle")]);
        reducer(&mut state, Action::SearchStart);
        let first = reducer(&mut state, Action::SearchInput('c'));
        let second = reducer(&mut state, Action::SearchInput('h'));

        let generation = |effects: &[Effect]| match &effects[0] {
            Effect::ScheduleSearch { generation, .. } => *generation,
            other => panic!("unexpected effect {other:?}"),
        };
        let stale = generation(&first.effects);
        let latest = generation(&second.effects);

        let ignored = reducer(
            &mut state,
            Action::SearchDidSettle {
                term: "c".into(),
                generation: stale,
            },
        );
        assert!(!ignored.changed);
        assert!(!state.filter.active);

        reducer(
            &mut state,
            Action::SearchDidSettle {
                term: "ch".into(),
                generation: latest,
            },
        );
        assert_eq!(state.rendered, vec![4]);
    }

    #[test]
    fn test_clearing_search_restores_cap() {
        let mut state = ready_state((1..=45).map(|id| pokemon(id, "mon")).collect());
        state.filter.apply(&state.store, "mon".into());
        state.pagination.display_cap = 5;
        state.redraw_grid();

        let cancel = reducer(&mut state, Action::SearchCancel);
        let generation = match &cancel.effects[0] {
            Effect::ScheduleSearch { term, generation, .. } => {
                assert_eq!(term, "");
                *generation
            }
            other => panic!("unexpected effect {other:?}"),
        };
        reducer(
            &mut state,
            Action::SearchDidSettle {
                term: String::new(),
                generation,
            },
        );

        assert!(!state.filter.active);
        assert_eq!(state.pagination.display_cap, 30);
        assert_eq!(state.rendered.len(), 30);
    }

    #[test]
    fn test_load_more_and_search_reruns_term() {
        let mut state = ready_state(vec![pokemon(1, "bulbasaur")]);
        state.filter.apply(&state.store, "mew".into());
        state.redraw_grid();

        let result = reducer(&mut state, Action::LoadMoreAndSearch);
        assert_eq!(result.effects.len(), 1);

        let mut batch = outcome(&[2]);
        batch.records[0].name = "mew".into();
        reducer(
            &mut state,
            Action::BatchDidLoad {
                kind: BatchKind::More,
                requested: (2..=31).collect(),
                outcome: batch,
            },
        );
        assert_eq!(state.rendered, vec![2]);
        assert_eq!(state.pagination.display_cap, 30);
        assert_eq!(state.pagination.research, None);
    }

    #[test]
    fn test_research_uses_term_current_when_batch_lands() {
        let mut state = ready_state(vec![pokemon(1, "bulbasaur")]);
        state.filter.apply(&state.store, "mew".into());
        state.redraw_grid();
        reducer(&mut state, Action::LoadMoreAndSearch);

        reducer(&mut state, Action::SearchStart);
        let cancel = reducer(&mut state, Action::SearchCancel);
        assert_eq!(cancel.effects.len(), 1);
        reducer(&mut state, Action::SearchStart);
        reducer(&mut state, Action::SearchInput('p'));
        let typed = reducer(&mut state, Action::SearchInput('i'));
        let generation = match &typed.effects[0] {
            Effect::ScheduleSearch { generation, .. } => *generation,
            other => panic!("unexpected effect {other:?}"),
        };
        reducer(
            &mut state,
            Action::SearchDidSettle {
                term: "pi".into(),
                generation,
            },
        );

        let mut batch = outcome(&[2, 3]);
        batch.records[0].name = "mew".into();
        batch.records[1].name = "pikachu".into();
        reducer(
            &mut state,
            Action::BatchDidLoad {
                kind: BatchKind::More,
                requested: (2..=31).collect(),
                outcome: batch,
            },
        );

        assert_eq!(state.filter.term, "pi");
        assert_eq!(state.rendered, vec![3]);
    }

    #[test]
    fn test_settling_same_term_recomputes_matches() {
        let mut state = ready_state(vec![pokemon(1, "bulbasaur")]);
        state.filter.apply(&state.store, "mew".into());
        state.redraw_grid();
        // A batch started before the search lands without a re-search.
        state.store.append([pokemon(151, "mew")]);

        reducer(&mut state, Action::SearchStart);
        let generation = state.filter.debounce.arm();
        let result = reducer(
            &mut state,
            Action::SearchDidSettle {
                term: "mew".into(),
                generation,
            },
        );

        assert!(result.changed);
        assert_eq!(state.filter.matches, vec![151]);
        assert_eq!(state.rendered, vec![151]);
    }

    #[test]
    fn test_submit_applies_pending_term_immediately() {
        let mut state = ready_state(vec![pokemon(4, "charmander"), pokemon(7, "squirtle")]);
        reducer(&mut state, Action::SearchStart);
        let typed = reducer(&mut state, Action::SearchInput('s'));
        let generation = match &typed.effects[0] {
            Effect::ScheduleSearch { generation, .. } => *generation,
            other => panic!("unexpected effect {other:?}"),
        };

        reducer(&mut state, Action::SearchSubmit);
        assert!(!state.filter.editing);
        assert!(!state.filter.debounce.is_armed());
        assert_eq!(state.rendered, vec![7]);

        let late = reducer(
            &mut state,
            Action::SearchDidSettle {
                term: "s".into(),
                generation,
            },
        );
        assert!(!late.changed);
    }

    #[test]
    fn test_open_missing_record_is_ignored() {
        let mut state = ready_state(vec![pokemon(1, "bulbasaur")]);
        let result = reducer(&mut state, Action::OverlayOpen(99));
        assert!(!result.changed);
        assert_eq!(state.overlay.open, None);
    }

    #[test]
    fn test_navigation_disabled_when_record_filtered_out() {
        let mut state = ready_state(vec![pokemon(4, "charmander"), pokemon(7, "squirtle")]);
        reducer(&mut state, Action::OverlayOpen(7));
        state.filter.apply(&state.store, "char".into());
        state.redraw_grid();

        let result = reducer(&mut state, Action::OverlayNext);
        assert!(!result.changed);
        assert_eq!(state.overlay.open, Some(7));
    }

    #[test]
    fn test_cursor_follows_overlay_navigation() {
        let mut state = ready_state(vec![pokemon(4, "a"), pokemon(7, "b"), pokemon(9, "c")]);
        reducer(&mut state, Action::OverlayOpen(7));
        assert_eq!(state.cursor, 1);
        reducer(&mut state, Action::OverlayNext);
        assert_eq!(state.cursor, 2);
        reducer(&mut state, Action::OverlayClose);
        assert_eq!(state.selected_id(), Some(9));
    }

    #[test]
    fn test_cursor_is_clamped() {
        let mut state = ready_state(vec![pokemon(1, "a"), pokemon(2, "b")]);
        assert!(!reducer(&mut state, Action::GridCursorMove(-3)).changed);
        reducer(&mut state, Action::GridCursorMove(10));
        assert_eq!(state.cursor, 1);
    }
}
