use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::{Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::grid::SearchSummary;

pub struct SearchBarProps<'a> {
    pub input: &'a str,
    pub editing: bool,
    pub summary: Option<&'a SearchSummary>,
    pub is_focused: bool,
}

/// Title row with the search field and the match summary.
#[derive(Default)]
pub struct SearchBar;

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || !props.editing {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        match key.code {
            KeyCode::Esc => Some(Action::SearchCancel),
            KeyCode::Enter => Some(Action::SearchSubmit),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::SearchInput(ch))
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let border = if props.editing { ACCENT_TEAL } else { TEXT_DIM };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                " POKEGRID ",
                Style::default()
                    .fg(ACCENT_TEAL)
                    .add_modifier(Modifier::BOLD),
            ))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::horizontal([Constraint::Min(10), Constraint::Length(36)]).split(inner);

        let field = if props.editing {
            Line::from(vec![
                Span::styled("/", Style::default().fg(ACCENT_TEAL)),
                Span::raw(props.input.to_string()),
                Span::styled("_", Style::default().fg(ACCENT_TEAL)),
            ])
        } else if props.input.is_empty() {
            Line::from(Span::styled(
                "Press / to search by name",
                Style::default().fg(TEXT_DIM),
            ))
        } else {
            Line::from(vec![
                Span::styled("/", Style::default().fg(TEXT_DIM)),
                Span::raw(props.input.to_string()),
            ])
        };
        frame.render_widget(Paragraph::new(field), chunks[0]);

        if let Some(summary) = props.summary {
            let line = Line::from(Span::styled(summary.line(), Style::default().fg(ACCENT_GOLD)))
                .right_aligned();
            frame.render_widget(Paragraph::new(line), chunks[1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use tui_dispatch::testing::*;

    fn press(code: KeyCode) -> EventKind {
        EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn props(editing: bool) -> SearchBarProps<'static> {
        SearchBarProps {
            input: "char",
            editing,
            summary: None,
            is_focused: true,
        }
    }

    #[test]
    fn test_typing_emits_input() {
        let mut bar = SearchBar;
        let actions: Vec<_> = bar
            .handle_event(&EventKind::Key(key("m")), props(true))
            .into_iter()
            .collect();
        actions.assert_count(1);
        actions.assert_first(Action::SearchInput('m'));
    }

    #[test]
    fn test_esc_cancels_and_enter_submits() {
        let mut bar = SearchBar;
        let esc: Vec<_> = bar
            .handle_event(&press(KeyCode::Esc), props(true))
            .into_iter()
            .collect();
        esc.assert_first(Action::SearchCancel);

        let enter: Vec<_> = bar
            .handle_event(&press(KeyCode::Enter), props(true))
            .into_iter()
            .collect();
        enter.assert_first(Action::SearchSubmit);
    }

    #[test]
    fn test_ignores_keys_when_not_editing() {
        let mut bar = SearchBar;
        let actions: Vec<_> = bar
            .handle_event(&EventKind::Key(key("m")), props(false))
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_render_shows_summary() {
        let mut render = RenderHarness::new(80, 3);
        let summary = SearchSummary {
            found: 2,
            loaded: 30,
            ceiling: 1025,
        };
        let output = render.render_to_string_plain(|frame| {
            let mut bar = SearchBar;
            bar.render(
                frame,
                frame.area(),
                SearchBarProps {
                    input: "char",
                    editing: false,
                    summary: Some(&summary),
                    is_focused: false,
                },
            );
        });
        assert!(output.contains("/char"));
        assert!(output.contains("2 Pokémon found (of 30 loaded)"));
    }
}
