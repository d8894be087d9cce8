use crossterm::event::{KeyCode, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Borders, Paragraph, Tabs},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    centered_rect, BaseStyle, BorderStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::{
    display_name, type_color, Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::overlay::{format_height, format_weight, stat_bar_width, DetailTab, DetailView};

const LABEL_WIDTH: usize = 10;

pub fn overlay_area(area: Rect) -> Rect {
    centered_rect(64, 18, area)
}

pub struct DetailOverlayProps<'a> {
    pub view: &'a DetailView,
    /// Full screen area; the modal is centered inside it.
    pub area: Rect,
    pub is_focused: bool,
}

pub struct DetailOverlay {
    modal: Modal,
}

impl Default for DetailOverlay {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self::default()
    }
}

fn overlay_close() -> Action {
    Action::OverlayClose
}

fn modal_style(theme: &str) -> ModalStyle {
    ModalStyle {
        dim_factor: 0.6,
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(type_color(theme))),
            }),
            padding: Padding::all(1),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
    }
}

fn modal_behavior() -> ModalBehavior {
    ModalBehavior {
        close_on_esc: true,
        close_on_backdrop: true,
    }
}

impl Component<Action> for DetailOverlay {
    type Props<'a> = DetailOverlayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        // Only presses count as backdrop clicks; motion and release are ignored.
        if let EventKind::Mouse(mouse) = event {
            if !matches!(mouse.kind, MouseEventKind::Down(_)) {
                return Vec::new();
            }
        }

        let mut noop_render = |_frame: &mut Frame, _area: Rect| {};
        let modal_props = ModalProps {
            is_open: true,
            is_focused: true,
            area: overlay_area(props.area),
            style: modal_style(&props.view.primary_type),
            behavior: modal_behavior(),
            on_close: overlay_close,
            render_content: &mut noop_render,
        };
        let modal_actions: Vec<_> = self
            .modal
            .handle_event(event, modal_props)
            .into_iter()
            .collect();
        if !modal_actions.is_empty() {
            return modal_actions;
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        let navigate = props.view.can_navigate;
        match key.code {
            KeyCode::Left | KeyCode::Char('h') if navigate => vec![Action::OverlayPrev],
            KeyCode::Right | KeyCode::Char('l') if navigate => vec![Action::OverlayNext],
            KeyCode::Tab | KeyCode::BackTab => vec![Action::OverlayToggleTab],
            KeyCode::Char('1') | KeyCode::Char('a') => {
                vec![Action::OverlaySelectTab(DetailTab::About)]
            }
            KeyCode::Char('2') | KeyCode::Char('s') => {
                vec![Action::OverlaySelectTab(DetailTab::Stats)]
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let view = props.view;
        let mut render_content = |frame: &mut Frame, inner: Rect| {
            render_detail(frame, inner, view);
        };
        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: overlay_area(area),
                style: modal_style(&view.primary_type),
                behavior: modal_behavior(),
                on_close: overlay_close,
                render_content: &mut render_content,
            },
        );
    }
}

fn render_detail(frame: &mut Frame, area: Rect, view: &DetailView) {
    let [title, tabs, _, body, nav] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let theme = type_color(&view.primary_type);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("#{:03} ", view.id), Style::default().fg(TEXT_DIM)),
            Span::styled(
                display_name(&view.name),
                Style::default().fg(theme).add_modifier(Modifier::BOLD),
            ),
        ])),
        title,
    );

    let selected = DetailTab::ALL
        .iter()
        .position(|tab| *tab == view.tab)
        .unwrap_or(0);
    frame.render_widget(
        Tabs::new(DetailTab::ALL.map(DetailTab::label))
            .select(selected)
            .style(Style::default().fg(TEXT_DIM))
            .highlight_style(
                Style::default()
                    .fg(ACCENT_TEAL)
                    .add_modifier(Modifier::BOLD),
            ),
        tabs,
    );

    let lines = match view.tab {
        DetailTab::About => about_lines(view),
        DetailTab::Stats => stat_lines(view, body.width),
    };
    frame.render_widget(Paragraph::new(lines), body);

    let nav_line = if view.can_navigate {
        "←/→ browse   Tab switch   Esc close"
    } else {
        "Not in the current grid   Tab switch   Esc close"
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(nav_line, Style::default().fg(TEXT_DIM))).centered()),
        nav,
    );
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<width$}", label, width = LABEL_WIDTH),
            Style::default().fg(TEXT_DIM),
        ),
        Span::raw(value),
    ])
}

fn about_lines(view: &DetailView) -> Vec<Line<'static>> {
    vec![
        field("Species", view.species.clone()),
        field("Height", format_height(view.height)),
        field("Weight", format_weight(view.weight)),
        field("Abilities", view.abilities.clone()),
        field(
            "Artwork",
            view.image_url.clone().unwrap_or_else(|| "none".to_string()),
        ),
    ]
}

fn stat_lines(view: &DetailView, width: u16) -> Vec<Line<'static>> {
    let bar_cells = width.saturating_sub(LABEL_WIDTH as u16 + 5);
    let theme = type_color(&view.primary_type);
    let mut lines: Vec<Line> = view
        .stats
        .iter()
        .map(|row| {
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}", row.label, width = LABEL_WIDTH),
                    Style::default().fg(TEXT_DIM),
                ),
                Span::raw(format!("{:>3} ", row.value)),
                Span::styled(
                    "█".repeat(stat_bar_width(row.value, bar_cells) as usize),
                    Style::default().fg(theme),
                ),
            ])
        })
        .collect();
    lines.push(Line::from(vec![
        Span::styled(
            format!("{:<width$}", "Total", width = LABEL_WIDTH),
            Style::default().fg(TEXT_DIM),
        ),
        Span::styled(
            format!("{:>3}", view.total),
            Style::default()
                .fg(ACCENT_GOLD)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines
}
