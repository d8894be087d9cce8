use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::{
    display_name, type_color, Component, ACCENT_GOLD, ACCENT_TEAL, BG_HIGHLIGHT, BG_PANEL,
    TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::grid::{GridBody, GridCard};
use crate::state::AppState;

pub const CARD_WIDTH: u16 = 22;
pub const CARD_HEIGHT: u16 = 5;

pub fn columns_for_width(width: u16) -> usize {
    (width / CARD_WIDTH).max(1) as usize
}

/// Columns the grid is laid out with; the grid spans the full terminal width.
pub fn grid_columns(state: &AppState) -> usize {
    columns_for_width(state.terminal_size.0)
}

pub struct CardGridProps<'a> {
    pub body: &'a GridBody,
    pub cursor: usize,
    pub columns: usize,
    pub is_focused: bool,
}

#[derive(Default)]
pub struct CardGrid;

impl Component<Action> for CardGrid {
    type Props<'a> = CardGridProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let row = props.columns.max(1) as i16;
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Left | KeyCode::Char('h') => Some(Action::GridCursorMove(-1)),
                KeyCode::Right | KeyCode::Char('l') => Some(Action::GridCursorMove(1)),
                KeyCode::Up | KeyCode::Char('k') => Some(Action::GridCursorMove(-row)),
                KeyCode::Down | KeyCode::Char('j') => Some(Action::GridCursorMove(row)),
                KeyCode::Enter => Some(Action::GridOpenSelected),
                KeyCode::Char('m') => match props.body {
                    GridBody::NoResults {
                        can_load_more: true,
                        ..
                    } => Some(Action::LoadMoreAndSearch),
                    GridBody::NoResults { .. } => None,
                    GridBody::Cards(_) => Some(Action::LoadMore),
                },
                _ => None,
            },
            EventKind::Scroll { delta, .. } => {
                Some(Action::GridCursorMove((*delta as i16).saturating_mul(row)))
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        match props.body {
            GridBody::Cards(cards) if cards.is_empty() => {
                render_message(frame, area, vec![dim_line("No Pokémon to show yet.")]);
            }
            GridBody::Cards(cards) => {
                render_cards(frame, area, cards, props.cursor, props.columns.max(1))
            }
            GridBody::NoResults {
                term,
                can_load_more,
            } => {
                let mut lines = vec![
                    Line::from(Span::styled(
                        "No Pokémon found",
                        Style::default()
                            .fg(ACCENT_GOLD)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .centered(),
                    dim_line(&format!("Nothing loaded so far starts with \"{term}\".")),
                ];
                if *can_load_more {
                    lines.push(Line::default());
                    lines.push(
                        Line::from(vec![
                            Span::styled("Press ", Style::default().fg(TEXT_DIM)),
                            Span::styled(
                                "m",
                                Style::default()
                                    .fg(ACCENT_TEAL)
                                    .add_modifier(Modifier::BOLD),
                            ),
                            Span::styled(
                                " to load more and search again",
                                Style::default().fg(TEXT_DIM),
                            ),
                        ])
                        .centered(),
                    );
                }
                render_message(frame, area, lines);
            }
        }
    }
}

fn dim_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), Style::default().fg(TEXT_DIM))).centered()
}

fn render_message(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let height = lines.len() as u16;
    let [middle] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), middle);
}

fn render_cards(frame: &mut Frame, area: Rect, cards: &[GridCard], cursor: usize, columns: usize) {
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let cursor_row = cursor / columns;
    let first_row = cursor_row.saturating_sub(visible_rows - 1);

    for (index, card) in cards.iter().enumerate().skip(first_row * columns) {
        let row = index / columns - first_row;
        if row >= visible_rows {
            break;
        }
        let col = index % columns;
        let x = area.x + col as u16 * CARD_WIDTH;
        let y = area.y + row as u16 * CARD_HEIGHT;
        let card_area = Rect {
            x,
            y,
            width: CARD_WIDTH.min(area.right().saturating_sub(x)),
            height: CARD_HEIGHT.min(area.bottom().saturating_sub(y)),
        };
        render_card(frame, card_area, card, index == cursor);
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &GridCard, selected: bool) {
    let theme = type_color(&card.theme);
    let bg = if selected { BG_HIGHLIGHT } else { BG_PANEL };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme))
        .title(Span::styled(
            format!(" #{:03} ", card.id),
            Style::default().fg(theme).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg).fg(TEXT_MAIN));

    let mut types = vec![Span::styled(
        card.primary_type.clone(),
        Style::default().fg(theme),
    )];
    if let Some(secondary) = &card.secondary_type {
        types.push(Span::styled(" / ", Style::default().fg(TEXT_DIM)));
        types.push(Span::styled(
            secondary.clone(),
            Style::default().fg(type_color(secondary)),
        ));
    }
    let artwork = card
        .image_url
        .as_deref()
        .and_then(|url| url.rsplit('/').next())
        .unwrap_or("no artwork");

    let lines = vec![
        Line::from(Span::styled(
            display_name(&card.name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(types),
        Line::from(Span::styled(artwork.to_string(), Style::default().fg(TEXT_DIM))),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
