//! Signals view - coin picker and today's signal table.

use super::state::ViewState;
use super::Theme;
use crate::config::Config;
use crate::types::BoardRow;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};

const HEADERS: [&str; 12] = [
    "Symbol", "Coin ID", "Signal", "Reason", "Price", "RSI(14)", "SMA20", "SMA50", "Risk",
    "Mkt Cap", "24h Vol", "Updated",
];

/// Render the signals view.
pub fn render(frame: &mut Frame, area: Rect, config: &Config, state: &ViewState, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(0)])
        .split(area);

    render_picker(frame, chunks[0], config, state, theme);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(chunks[1]);

    render_summary(frame, right[0], config, state, theme);
    render_table(frame, right[1], config, state, theme);
}

fn render_picker(frame: &mut Frame, area: Rect, config: &Config, state: &ViewState, theme: &Theme) {
    let items: Vec<ListItem> = state
        .universe(config)
        .iter()
        .enumerate()
        .map(|(i, coin)| {
            let mark = if state.is_selected(&coin.id) { "[x] " } else { "[ ] " };
            let style = if i == state.cursor {
                theme.selected()
            } else {
                Default::default()
            };
            ListItem::new(Line::from(vec![Span::raw(mark), Span::raw(coin.label())])).style(style)
        })
        .collect();

    let title = if state.beginner { "Coins (beginner)" } else { "Coins" };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(theme.border()),
    );

    frame.render_widget(list, area);
}

fn render_summary(frame: &mut Frame, area: Rect, config: &Config, state: &ViewState, theme: &Theme) {
    let mut lines = vec![Line::from(vec![
        Span::styled("Window: ", theme.muted()),
        Span::raw(format!("{} days", state.days)),
        Span::styled("  Quote: ", theme.muted()),
        Span::raw(config.vs_currency.to_uppercase()),
        Span::styled("  Educational only, not financial advice.", theme.muted()),
    ])];

    if let Some(warning) = state.board.as_ref().and_then(|b| b.warning.as_ref()) {
        lines.push(Line::from(Span::styled(warning.clone(), theme.warning())));
    }

    let summary = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Today's Signals")
                .border_style(theme.border()),
        );

    frame.render_widget(summary, area);
}

fn render_table(frame: &mut Frame, area: Rect, config: &Config, state: &ViewState, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border());

    if state.selected_coins(config).is_empty() {
        let hint = Paragraph::new("Select at least one coin with space to begin.")
            .style(theme.muted())
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let Some(board) = &state.board else {
        frame.render_widget(Paragraph::new("Loading...").style(theme.muted()).block(block), area);
        return;
    };

    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h))).style(theme.header());
    let rows: Vec<Row> = board.rows.iter().map(|row| table_row(row, theme)).collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Min(24),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(8),
        Constraint::Length(18),
        Constraint::Length(16),
        Constraint::Length(20),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn table_row<'a>(row: &'a BoardRow, theme: &Theme) -> Row<'a> {
    Row::new(vec![
        Cell::from(row.symbol.as_str()),
        Cell::from(row.coin_id.as_str()),
        Cell::from(row.signal.as_str()).style(theme.signal(&row.signal)),
        Cell::from(row.reason.as_str()),
        Cell::from(number(row.price, 4)),
        Cell::from(number(row.rsi14, 2)),
        Cell::from(number(row.sma20, 2)),
        Cell::from(number(row.sma50, 2)),
        Cell::from(row.risk.as_str()).style(theme.risk(row.risk)),
        Cell::from(row.market_cap.clone().unwrap_or_default()),
        Cell::from(row.volume_24h.clone().unwrap_or_default()),
        Cell::from(row.updated.as_str()),
    ])
}

fn number(value: Option<f64>, places: usize) -> String {
    value
        .map(|v| format!("{:.*}", places, v))
        .unwrap_or_else(|| "-".to_string())
}
