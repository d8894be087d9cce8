use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{Component, ACCENT_GOLD, ACCENT_RED, ACCENT_TEAL, TEXT_DIM};
use crate::action::Action;
use crate::grid::LoadMoreState;

pub struct FooterProps<'a> {
    pub load_more: &'a LoadMoreState,
    pub editing: bool,
}

/// Load-more affordance plus key hints.
pub struct Footer {
    status_bar: StatusBar,
}

impl Footer {
    pub fn new() -> Self {
        Self {
            status_bar: StatusBar::new(),
        }
    }
}

pub fn load_more_line(state: &LoadMoreState) -> Line<'static> {
    let key_style = Style::default()
        .fg(ACCENT_TEAL)
        .add_modifier(Modifier::BOLD);
    match state {
        LoadMoreState::Hidden => Line::default(),
        LoadMoreState::Ready { loaded, ceiling } => Line::from(vec![
            Span::styled("[m]", key_style),
            Span::raw(" Load more Pokémon"),
            Span::styled(format!("  ({loaded}/{ceiling})"), Style::default().fg(TEXT_DIM)),
        ]),
        LoadMoreState::Loading { loaded, ceiling } => Line::from(Span::styled(
            format!("Loading... ({loaded}/{ceiling})"),
            Style::default().fg(ACCENT_GOLD),
        )),
        LoadMoreState::Retry { error } => Line::from(vec![
            Span::styled(
                format!("Loading failed: {error}  "),
                Style::default().fg(ACCENT_RED),
            ),
            Span::styled("[m]", key_style),
            Span::raw(" Retry"),
        ]),
        LoadMoreState::AllLoaded => Line::from(Span::styled(
            "All Pokémon loaded!",
            Style::default().fg(ACCENT_GOLD),
        )),
    }
    .centered()
}

fn hints(editing: bool) -> Vec<StatusBarHint<'static>> {
    if editing {
        return vec![
            StatusBarHint::new("Enter", "keep"),
            StatusBarHint::new("Esc", "clear"),
            StatusBarHint::new("Bksp", "delete"),
        ];
    }
    vec![
        StatusBarHint::new("←↑↓→", "move"),
        StatusBarHint::new("Enter", "details"),
        StatusBarHint::new("/", "search"),
        StatusBarHint::new("m", "more"),
        StatusBarHint::new("q", "quit"),
    ]
}

impl Component<Action> for Footer {
    type Props<'a> = FooterProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let [status, bar] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

        frame.render_widget(Paragraph::new(load_more_line(props.load_more)), status);

        let hints = hints(props.editing);
        <StatusBar as Component<Action>>::render(
            &mut self.status_bar,
            frame,
            bar,
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&hints),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}
