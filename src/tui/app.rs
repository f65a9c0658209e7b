//! Main TUI application logic.

use super::events::{self, Command, EventHandler};
use super::state::ViewState;
use super::{charts, guide, signals, Route, Theme};
use crate::services::export::export_rows;
use crate::AppState;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};
use std::{io, path::Path, time::Duration};
use tracing::info;

/// Work the event loop runs between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    /// Recompute the board; `refresh` clears cached market data first.
    Reload { refresh: bool },
    Export,
}

/// Main TUI application.
pub struct App {
    /// Current route/view.
    current_route: Route,
    /// Application state.
    app_state: AppState,
    view: ViewState,
    theme: Theme,
    should_quit: bool,
    pending: Option<Task>,
}

impl App {
    /// Create a new TUI application. The first frame triggers a load.
    pub fn new(app_state: AppState) -> Self {
        let view = ViewState::new(&app_state.config);
        Self {
            current_route: Route::Signals,
            app_state,
            view,
            theme: Theme::default(),
            should_quit: false,
            pending: Some(Task::Reload { refresh: false }),
        }
    }

    /// Handle an event.
    pub fn handle_event(&mut self, event: events::Event) {
        if let events::Event::Key(key) = event {
            if let Some(command) = events::command_for(&key) {
                self.apply(command);
            }
        }
    }

    fn apply(&mut self, command: Command) {
        let config = self.app_state.config.clone();

        match command {
            Command::Quit => self.should_quit = true,
            Command::Show(route) => self.current_route = route,
            Command::Up | Command::Down => {
                let delta = if command == Command::Up { -1 } else { 1 };
                match self.current_route {
                    Route::Charts => self.view.move_chart_focus(delta),
                    _ => self.view.move_cursor(delta, &config),
                }
            }
            Command::ToggleCoin => {
                if self.current_route == Route::Signals && self.view.toggle_at_cursor(&config) {
                    self.schedule(Task::Reload { refresh: false });
                }
            }
            Command::ToggleBeginner => {
                self.view.toggle_beginner(&config);
                self.schedule(Task::Reload { refresh: false });
            }
            Command::WiderWindow | Command::NarrowerWindow => {
                if self.view.adjust_days(command == Command::WiderWindow) {
                    self.schedule(Task::Reload { refresh: false });
                }
            }
            Command::ToggleRsi => self.view.show_rsi = !self.view.show_rsi,
            Command::ToggleMacd => self.view.show_macd = !self.view.show_macd,
            Command::Refresh => self.schedule(Task::Reload { refresh: true }),
            Command::Export => self.schedule(Task::Export),
        }
    }

    fn schedule(&mut self, task: Task) {
        // a pending refresh must not be downgraded to a plain reload
        if self.pending != Some(Task::Reload { refresh: true }) {
            self.pending = Some(task);
        }
        if let Task::Reload { .. } = task {
            self.view.status = Some("Loading market data...".to_string());
        }
    }

    /// Check if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Whether work is queued for the next loop iteration.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Run queued work, if any.
    pub async fn run_pending(&mut self) {
        match self.pending.take() {
            Some(Task::Reload { refresh }) => self.reload(refresh).await,
            Some(Task::Export) => self.export(),
            None => {}
        }
    }

    async fn reload(&mut self, refresh: bool) {
        let config = self.app_state.config.clone();
        if refresh {
            self.app_state.signals.clear_cache();
        }

        let coins = self.view.selected_coins(&config);
        if coins.is_empty() {
            self.view.board = None;
            self.view.status = None;
            return;
        }

        let board = self
            .app_state
            .signals
            .dashboard(&coins, self.view.days, &config.vs_currency)
            .await;

        self.view.status = Some(format!(
            "Updated {} coins at {}",
            board.rows.len(),
            board.generated_at.format("%H:%M:%S UTC")
        ));
        self.view.set_board(board);
    }

    fn export(&mut self) {
        let Some(board) = &self.view.board else {
            self.view.status = Some("Nothing to export yet".to_string());
            return;
        };

        self.view.status = Some(match export_rows(&board.rows, Path::new(".")) {
            Ok((csv, json)) => {
                info!("Dashboard export written");
                format!("Exported {} and {}", csv.display(), json.display())
            }
            Err(e) => format!("Export failed: {}", e),
        });
    }

    /// Render the TUI.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.size();

        // Create main layout: tabs at top, content below, status bar at bottom
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        self.render_tabs(frame, chunks[0]);

        let config = &self.app_state.config;
        match self.current_route {
            Route::Signals => signals::render(frame, chunks[1], config, &self.view, &self.theme),
            Route::Charts => charts::render(frame, chunks[1], &self.view, &self.theme),
            Route::Guide => guide::render(frame, chunks[1], &self.view, &self.theme),
        }

        self.render_status_bar(frame, chunks[2]);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let routes = Route::all();
        let titles: Vec<Line> = routes
            .iter()
            .map(|r| {
                Line::from(vec![
                    Span::styled(format!("[{}] ", r.key()), self.theme.muted()),
                    Span::raw(r.name()),
                ])
            })
            .collect();

        let selected = routes
            .iter()
            .position(|r| *r == self.current_route)
            .unwrap_or(0);

        let mode = if self.view.beginner { "beginner" } else { "all coins" };
        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Omen - Daily Crypto Signals ({}, {} days)", mode, self.view.days)),
            )
            .select(selected)
            .style(self.theme.tab_inactive())
            .highlight_style(self.theme.tab_active());

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled("Omen", self.theme.title()), Span::raw(" | ")];
        match &self.view.status {
            Some(status) if status.starts_with("Export failed") => {
                spans.push(Span::styled(status.clone(), self.theme.error()))
            }
            Some(status) => spans.push(Span::raw(status.clone())),
            None => spans.push(Span::styled("No data loaded", self.theme.muted())),
        }
        spans.extend([
            Span::raw(" | "),
            Span::styled("r", self.theme.muted()),
            Span::raw(" refresh "),
            Span::styled("e", self.theme.muted()),
            Span::raw(" export "),
            Span::styled("q", self.theme.muted()),
            Span::raw(" quit"),
        ]);

        let bar = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.border()),
        );

        frame.render_widget(bar, area);
    }
}

/// Run the TUI application.
pub async fn run_tui(app_state: AppState) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, App::new(app_state)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    let mut event_handler = EventHandler::new(Duration::from_millis(250));

    loop {
        terminal.draw(|f| app.render(f))?;

        if app.has_pending() {
            app.run_pending().await;
            continue;
        }

        if let Some(event) = event_handler.next().await {
            app.handle_event(event);
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
