use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokegrid::action::Action;
use pokegrid::api;
use pokegrid::components::{
    grid_columns, overlay_area, BootScreen, BootScreenProps, CardGrid, CardGridProps,
    Component, DetailOverlay, DetailOverlayProps, Footer, FooterProps, SearchBar, SearchBarProps,
    BG_BASE,
};
use pokegrid::config::{
    BrowserConfig, DEFAULT_API_BASE, DEFAULT_CEILING, DEFAULT_DEBOUNCE_MS, DEFAULT_PAGE_SIZE,
};
use pokegrid::effect::Effect;
use pokegrid::filter::SearchStrategy;
use pokegrid::grid;
use pokegrid::logging;
use pokegrid::overlay;
use pokegrid::reducer::reducer;
use pokegrid::state::{AppState, BootState};

#[derive(Parser, Debug)]
#[command(name = "pokegrid")]
#[command(about = "Browse Pokémon cards from the PokeAPI")]
struct Args {
    /// PokeAPI base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Records fetched per batch
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Highest id that will be fetched
    #[arg(long, default_value_t = DEFAULT_CEILING)]
    ceiling: u16,

    /// Quiet period before a search term is applied
    #[arg(long, default_value_t = DEFAULT_DEBOUNCE_MS)]
    debounce_ms: u64,

    #[arg(long, value_enum, default_value_t = SearchStrategy::Prefix)]
    search_strategy: SearchStrategy,

    /// Append tracing output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

impl Args {
    fn browser_config(&self) -> BrowserConfig {
        BrowserConfig {
            api_base: self.api_base.clone(),
            page_size: self.page_size,
            ceiling: self.ceiling,
            debounce_ms: self.debounce_ms,
            search_strategy: self.search_strategy,
        }
        .normalized()
    }
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum DexComponentId {
    Boot,
    Search,
    Grid,
    Overlay,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum DexContext {
    Boot,
    Search,
    Grid,
    Overlay,
}

impl EventRoutingState<DexComponentId, DexContext> for AppState {
    fn focused(&self) -> Option<DexComponentId> {
        if self.boot != BootState::Ready {
            return Some(DexComponentId::Boot);
        }
        if self.overlay.is_open() {
            return Some(DexComponentId::Overlay);
        }
        if self.filter.editing {
            return Some(DexComponentId::Search);
        }
        Some(DexComponentId::Grid)
    }

    fn modal(&self) -> Option<DexComponentId> {
        if self.overlay.is_open() {
            Some(DexComponentId::Overlay)
        } else if self.filter.editing {
            Some(DexComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: DexComponentId) -> DexContext {
        match id {
            DexComponentId::Boot => DexContext::Boot,
            DexComponentId::Search => DexContext::Search,
            DexComponentId::Grid => DexContext::Grid,
            DexComponentId::Overlay => DexContext::Overlay,
        }
    }

    fn default_context(&self) -> DexContext {
        DexContext::Grid
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref())?;
    let config = args.browser_config();
    api::configure(&config.api_base);
    tracing::info!(?config, "starting pokegrid");

    let debug = DebugSession::new(args.debug);

    let mut state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(config))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // No resize event arrives at startup, so layout and hit-testing start from the real size.
    let size = terminal.size()?;
    state.terminal_size = (size.width, size.height);

    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

struct DexUi {
    boot: BootScreen,
    search: SearchBar,
    grid: CardGrid,
    footer: Footer,
    overlay: DetailOverlay,
}

impl DexUi {
    fn new() -> Self {
        Self {
            boot: BootScreen,
            search: SearchBar,
            grid: CardGrid,
            footer: Footer::new(),
            overlay: DetailOverlay::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<DexComponentId>,
    ) {
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        if state.boot != BootState::Ready {
            event_ctx.set_component_area(DexComponentId::Boot, area);
            self.boot.render(
                frame,
                area,
                BootScreenProps {
                    boot: &state.boot,
                    page_size: state.pagination.page_size,
                    is_focused: render_ctx.is_focused(),
                },
            );
            return;
        }
        event_ctx.component_areas.remove(&DexComponentId::Boot);

        let [header, body, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .areas(area);
        let view = grid::project(state);

        event_ctx.set_component_area(DexComponentId::Search, header);
        self.search.render(
            frame,
            header,
            SearchBarProps {
                input: &state.filter.input,
                editing: state.filter.editing,
                summary: view.summary.as_ref(),
                is_focused: state.filter.editing,
            },
        );

        event_ctx.set_component_area(DexComponentId::Grid, body);
        self.grid.render(
            frame,
            body,
            CardGridProps {
                body: &view.body,
                cursor: state.cursor,
                columns: grid_columns(state),
                is_focused: !state.filter.editing && !state.overlay.is_open(),
            },
        );

        self.footer.render(
            frame,
            footer,
            FooterProps {
                load_more: &view.load_more,
                editing: state.filter.editing,
            },
        );

        match overlay::detail_view(state) {
            Some(detail) => {
                event_ctx.set_component_area(DexComponentId::Overlay, overlay_area(area));
                self.overlay.render(
                    frame,
                    area,
                    DetailOverlayProps {
                        view: &detail,
                        area,
                        is_focused: render_ctx.is_focused(),
                    },
                );
            }
            None => {
                event_ctx.component_areas.remove(&DexComponentId::Overlay);
            }
        }
    }

    fn handle_boot_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = BootScreenProps {
            boot: &state.boot,
            page_size: state.pagination.page_size,
            is_focused: true,
        };
        handler_response(self.boot.handle_event(event, props).into_iter().collect())
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = SearchBarProps {
            input: &state.filter.input,
            editing: state.filter.editing,
            summary: None,
            is_focused: true,
        };
        let actions: Vec<_> = self.search.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: state.filter.editing,
            needs_render: false,
        }
    }

    fn handle_grid_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let view = grid::project(state);
        let props = CardGridProps {
            body: &view.body,
            cursor: state.cursor,
            columns: grid_columns(state),
            is_focused: true,
        };
        handler_response(self.grid.handle_event(event, props).into_iter().collect())
    }

    fn handle_overlay_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(detail) = overlay::detail_view(state) else {
            return HandlerResponse::ignored();
        };
        let (width, height) = state.terminal_size;
        let props = DetailOverlayProps {
            view: &detail,
            area: Rect::new(0, 0, width, height),
            is_focused: true,
        };
        let actions: Vec<_> = self.overlay.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(DexUi::new()));
    let mut bus: EventBus<AppState, Action, DexComponentId, DexContext> = EventBus::new();
    let keybindings: Keybindings<DexContext> = Keybindings::new();

    let ui_boot = Rc::clone(&ui);
    bus.register(DexComponentId::Boot, move |event, state| {
        ui_boot.borrow_mut().handle_boot_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(DexComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_grid = Rc::clone(&ui);
    bus.register(DexComponentId::Grid, move |event, state| {
        ui_grid.borrow_mut().handle_grid_event(&event.kind, state)
    });

    let ui_overlay = Rc::clone(&ui);
    bus.register(DexComponentId::Overlay, move |event, state| {
        ui_overlay
            .borrow_mut()
            .handle_overlay_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) if !state.filter.editing => match key.code {
            KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            KeyCode::Char('/')
                if state.boot == BootState::Ready && !state.overlay.is_open() =>
            {
                HandlerResponse::action(Action::SearchStart)
            }
            KeyCode::Esc if state.filter.active && !state.overlay.is_open() => {
                HandlerResponse::action(Action::SearchCancel)
            }
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadBatch { kind, ids } => {
            ctx.tasks().spawn(TaskKey::new("batch"), async move {
                let requested = ids.clone();
                let outcome = api::fetch_batch(ids, kind).await;
                Action::BatchDidLoad {
                    kind,
                    requested,
                    outcome,
                }
            });
        }
        Effect::ScheduleSearch {
            term,
            generation,
            delay_ms,
        } => {
            ctx.tasks()
                .debounce("search", Duration::from_millis(delay_ms), async move {
                    Action::SearchDidSettle { term, generation }
                });
        }
    }
}
