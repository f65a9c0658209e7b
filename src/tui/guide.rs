//! Guide view - beginner quick-start, glossary and key bindings.

use super::state::{ViewState, DAYS_STEP, MAX_DAYS, MIN_DAYS};
use super::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const QUICK_START: &[&str] = &[
    "BUY = indicators suggest a possible opportunity. Not a guarantee.",
    "HOLD = neutral.",
    "SELL = risk may be higher right now.",
    "Beginners may prefer larger, more liquid coins (BTC/ETH).",
    "Avoid tiny coins with low volume; they are easier to manipulate.",
    "Only risk what you can afford to lose; crypto is very volatile.",
];

const GLOSSARY: &[(&str, &str)] = &[
    ("RSI", "momentum from 0-100. Below 30 is often called oversold; above 70 overbought."),
    ("SMA", "average price. SMA20 > SMA50 suggests a short-term uptrend bias."),
    ("MACD", "momentum crossover; MACD below its signal line often means weakening momentum."),
    ("Risk", "Low, Medium or High from market cap and 24h volume; Unknown without market data."),
];

const MISTAKES: &[&str] = &[
    "Buying because of hype or shills.",
    "Treating indicators as guarantees.",
    "Ignoring small-cap / low-volume risk.",
    "Going all-in instead of small, staged entries.",
];

/// Render the guide view.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let mut lines = Vec::new();
    if state.beginner {
        lines.push(Line::from(Span::styled("Beginner quick-start", theme.header())));
        lines.extend(QUICK_START.iter().map(|s| Line::from(format!("  - {}", s))));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled("Glossary", theme.header())));
    for (term, meaning) in GLOSSARY {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}", term), theme.title()),
            Span::raw(format!(" - {}", meaning)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Common mistakes", theme.header())));
    lines.extend(MISTAKES.iter().map(|s| Line::from(format!("  - {}", s))));

    let guide = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Guide (educational only, not financial advice)")
            .border_style(theme.border()),
    );
    frame.render_widget(guide, chunks[0]);

    let keys = [
        ("1-3", "switch views".to_string()),
        ("up/down", "move cursor / switch chart".to_string()),
        ("space", "select or deselect coin".to_string()),
        ("b", "toggle beginner mode".to_string()),
        (
            "+ / -",
            format!("history window by {} days ({}-{})", DAYS_STEP, MIN_DAYS, MAX_DAYS),
        ),
        ("i / m", "toggle RSI / MACD panels".to_string()),
        ("r", "refresh market data".to_string()),
        ("e", "export signals_today.csv / .json".to_string()),
        ("q", "quit".to_string()),
    ];

    let key_lines: Vec<Line> = keys
        .into_iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{:>8}  ", key), theme.title()),
                Span::raw(action),
            ])
        })
        .collect();

    let help = Paragraph::new(key_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Keys")
            .border_style(theme.border()),
    );
    frame.render_widget(help, chunks[1]);
}
