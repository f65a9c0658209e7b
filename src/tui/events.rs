//! Event handling for the TUI.

use super::Route;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// Terminal event (keyboard input).
    Key(KeyEvent),
    /// Tick event for periodic redraws.
    Tick,
    /// Resize event.
    Resize(u16, u16),
}

/// User intent decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Show(Route),
    Up,
    Down,
    ToggleCoin,
    ToggleBeginner,
    WiderWindow,
    NarrowerWindow,
    ToggleRsi,
    ToggleMacd,
    Refresh,
    Export,
}

/// Event handler that sends events over a channel.
pub struct EventHandler {
    _tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        // crossterm polling blocks, keep it off the async workers
        tokio::task::spawn_blocking(move || loop {
            let event = if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => Event::Key(key),
                    Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                    _ => continue,
                }
            } else {
                Event::Tick
            };

            if event_tx.send(event).is_err() {
                break;
            }
        });

        Self { _tx: tx, rx }
    }

    /// Receive the next event.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Map a key press to a command, if it has one.
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return (key.code == KeyCode::Char('c')).then_some(Command::Quit);
    }

    let command = match key.code {
        KeyCode::Char('q') => Command::Quit,
        KeyCode::Up | KeyCode::Char('k') => Command::Up,
        KeyCode::Down | KeyCode::Char('j') => Command::Down,
        KeyCode::Char(' ') => Command::ToggleCoin,
        KeyCode::Char('b') => Command::ToggleBeginner,
        KeyCode::Char('+') | KeyCode::Char('=') => Command::WiderWindow,
        KeyCode::Char('-') => Command::NarrowerWindow,
        KeyCode::Char('i') => Command::ToggleRsi,
        KeyCode::Char('m') => Command::ToggleMacd,
        KeyCode::Char('r') => Command::Refresh,
        KeyCode::Char('e') => Command::Export,
        KeyCode::Char(c) => return Route::all().into_iter().find(|r| r.key() == c).map(Command::Show),
        _ => return None,
    };
    Some(command)
}
