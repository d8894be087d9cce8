use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;

use super::{Component, ACCENT_GOLD, ACCENT_RED, ACCENT_TEAL, TEXT_DIM};
use crate::action::Action;
use crate::state::BootState;

pub struct BootScreenProps<'a> {
    pub boot: &'a BootState,
    pub page_size: usize,
    pub is_focused: bool,
}

/// Full-screen status shown until the first batch lands.
#[derive(Default)]
pub struct BootScreen;

impl Component<Action> for BootScreen {
    type Props<'a> = BootScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || !matches!(props.boot, BootState::Failed(_)) {
            return None;
        }
        match event {
            EventKind::Key(key) if key.code == KeyCode::Char('r') => Some(Action::BootRetry),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let lines = match props.boot {
            BootState::Failed(error) => vec![
                Line::from(Span::styled(
                    "Could not load Pokémon",
                    Style::default()
                        .fg(ACCENT_RED)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(error.clone(), Style::default().fg(TEXT_DIM))),
                Line::default(),
                Line::from(vec![
                    Span::styled("Press ", Style::default().fg(TEXT_DIM)),
                    Span::styled(
                        "r",
                        Style::default()
                            .fg(ACCENT_TEAL)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(" to try again", Style::default().fg(TEXT_DIM)),
                ]),
            ],
            _ => vec![
                Line::from(Span::styled(
                    "Loading Pokémon...",
                    Style::default()
                        .fg(ACCENT_GOLD)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("Fetching the first {} entries", props.page_size),
                    Style::default().fg(TEXT_DIM),
                )),
            ],
        };
        let lines: Vec<Line> = lines.into_iter().map(Line::centered).collect();
        let [middle] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(Paragraph::new(lines), middle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    #[test]
    fn test_retry_only_after_failure() {
        let mut screen = BootScreen;
        let failed = BootState::Failed("offline".into());
        let actions: Vec<_> = screen
            .handle_event(
                &EventKind::Key(key("r")),
                BootScreenProps {
                    boot: &failed,
                    page_size: 30,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::BootRetry);

        let actions: Vec<_> = screen
            .handle_event(
                &EventKind::Key(key("r")),
                BootScreenProps {
                    boot: &BootState::Loading,
                    page_size: 30,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_render_failure_message() {
        let mut render = RenderHarness::new(60, 10);
        let failed = BootState::Failed("#1: request failed".into());
        let output = render.render_to_string_plain(|frame| {
            let mut screen = BootScreen;
            screen.render(
                frame,
                frame.area(),
                BootScreenProps {
                    boot: &failed,
                    page_size: 30,
                    is_focused: true,
                },
            );
        });
        assert!(output.contains("Could not load Pokémon"));
        assert!(output.contains("#1: request failed"));
        assert!(output.contains("to try again"));
    }
}
