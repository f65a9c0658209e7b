//! Charts view - price with moving averages, oscillators and historical context.

use super::state::ViewState;
use super::Theme;
use crate::services::CoinDetail;
use crate::services::signals::classifier::{OVERBOUGHT, OVERSOLD};
use crate::types::{AnnotatedSeries, HistoricalExample, Snapshot};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};

type Points = Vec<(f64, f64)>;

/// Render the charts view for the focused coin.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, theme: &Theme) {
    let Some(detail) = state.focused_detail() else {
        let empty = Paragraph::new("No chart data yet. Select coins in the Signals view.")
            .style(theme.muted())
            .block(Block::default().borders(Borders::ALL).border_style(theme.border()));
        frame.render_widget(empty, area);
        return;
    };

    let mut constraints = vec![Constraint::Min(12)];
    if state.show_rsi {
        constraints.push(Constraint::Length(8));
    }
    if state.show_macd {
        constraints.push(Constraint::Length(8));
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(rows[0]);

    let position = format!("{}/{}", state.chart_focus + 1, state.chart_details().len());
    render_price(frame, top[0], detail, &position, theme);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(0)])
        .split(top[1]);
    render_snapshot(frame, side[0], &detail.coin.symbol, &detail.snapshot, theme);
    render_example(frame, side[1], detail.example.as_ref(), theme);

    let mut next = 1;
    if state.show_rsi {
        render_rsi(frame, rows[next], &detail.annotated, theme);
        next += 1;
    }
    if state.show_macd {
        render_macd(frame, rows[next], &detail.annotated, theme);
    }
}

fn render_price(frame: &mut Frame, area: Rect, detail: &CoinDetail, position: &str, theme: &Theme) {
    let series = &detail.annotated;
    let price: Points = series
        .bars
        .iter()
        .enumerate()
        .map(|(i, bar)| (i as f64, bar.price))
        .collect();
    let sma20 = points(&series.sma20);
    let sma50 = points(&series.sma50);

    let datasets = vec![
        line("Price", &price, theme.primary),
        line("SMA20", &sma20, theme.fast_average),
        line("SMA50", &sma50, theme.slow_average),
    ];

    let title = format!("{} - Price & SMA ({})", detail.coin.symbol, position);
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(theme.border()),
        )
        .x_axis(time_axis(series, theme))
        .y_axis(value_axis(bounds(&[&price, &sma20, &sma50]), 2, theme));

    frame.render_widget(chart, area);
}

fn render_rsi(frame: &mut Frame, area: Rect, series: &AnnotatedSeries, theme: &Theme) {
    let rsi = points(&series.rsi14);
    let end = series.len().saturating_sub(1) as f64;
    let oversold: Points = vec![(0.0, OVERSOLD), (end, OVERSOLD)];
    let overbought: Points = vec![(0.0, OVERBOUGHT), (end, OVERBOUGHT)];

    let datasets = vec![
        line("RSI(14)", &rsi, theme.primary),
        line("30", &oversold, theme.success),
        line("70", &overbought, theme.danger),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("RSI(14)")
                .border_style(theme.border()),
        )
        .x_axis(time_axis(series, theme))
        .y_axis(value_axis([0.0, 100.0], 0, theme));

    frame.render_widget(chart, area);
}

fn render_macd(frame: &mut Frame, area: Rect, series: &AnnotatedSeries, theme: &Theme) {
    let macd = points(&series.macd);
    let signal = points(&series.macd_signal);
    let hist = points(&series.macd_hist);

    let datasets = vec![
        line("MACD", &macd, theme.primary),
        line("Signal", &signal, theme.fast_average),
        Dataset::default()
            .name("Hist")
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(theme.muted())
            .data(&hist),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("MACD(12, 26, 9)")
                .border_style(theme.border()),
        )
        .x_axis(time_axis(series, theme))
        .y_axis(value_axis(bounds(&[&macd, &signal, &hist]), 2, theme));

    frame.render_widget(chart, area);
}

fn render_snapshot(frame: &mut Frame, area: Rect, symbol: &str, snapshot: &Snapshot, theme: &Theme) {
    let signal = snapshot.signal.as_str();
    let lines = vec![
        Line::from(vec![
            Span::styled("Signal: ", theme.muted()),
            Span::styled(signal, theme.signal(signal)),
        ]),
        Line::from(vec![
            Span::styled("Price (USD): ", theme.muted()),
            Span::raw(format!("{:.2}", snapshot.price)),
        ]),
        Line::from(vec![
            Span::styled("RSI(14): ", theme.muted()),
            Span::raw(fixed(snapshot.rsi14, 1)),
        ]),
        Line::from(vec![
            Span::styled("SMA20 vs SMA50: ", theme.muted()),
            Span::raw(trend_label(snapshot.sma20, snapshot.sma50)),
        ]),
        Line::from(vec![
            Span::styled("MACD / Signal: ", theme.muted()),
            Span::raw(format!(
                "{} / {}",
                fixed(snapshot.macd, 4),
                fixed(snapshot.macd_signal, 4)
            )),
        ]),
        Line::from(""),
        Line::from(Span::styled(format!("Reason: {}", snapshot.reason), theme.muted())),
    ];

    let panel = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} - Snapshot", symbol))
            .border_style(theme.border()),
    );

    frame.render_widget(panel, area);
}

fn render_example(frame: &mut Frame, area: Rect, example: Option<&HistoricalExample>, theme: &Theme) {
    let lines = match example {
        None => vec![Line::from("No recent BUY-like setup found.")],
        Some(ex) => vec![
            Line::from(format!(
                "Signal date: {}",
                ex.signal_time.format("%Y-%m-%d %H:%M UTC")
            )),
            Line::from(format!("Entry: ${:.2}", ex.entry_price)),
            Line::from(format!(
                "Forward 7d: {}%  |  30d: {}%",
                fixed(ex.forward_return_7d, 2),
                fixed(ex.forward_return_30d, 2)
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Past performance does not predict future results.",
                theme.muted(),
            )),
        ],
    };

    let panel = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Historical example (last BUY-like setup)")
            .border_style(theme.border()),
    );

    frame.render_widget(panel, area);
}

fn line<'a>(name: &'a str, data: &'a [(f64, f64)], color: Color) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(data)
}

fn time_axis<'a>(series: &AnnotatedSeries, theme: &Theme) -> Axis<'a> {
    let end = series.len().saturating_sub(1).max(1) as f64;
    let label = |i: usize| {
        series
            .bars
            .get(i)
            .map(|b| b.timestamp.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };

    Axis::default()
        .style(theme.muted())
        .bounds([0.0, end])
        .labels(vec![
            Span::raw(label(0)),
            Span::raw(label(series.len().saturating_sub(1))),
        ])
}

fn value_axis<'a>(bounds: [f64; 2], places: usize, theme: &Theme) -> Axis<'a> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    Axis::default()
        .style(theme.muted())
        .bounds(bounds)
        .labels(
            [bounds[0], mid, bounds[1]]
                .iter()
                .map(|v| Span::raw(format!("{:.*}", places, v)))
                .collect(),
        )
}

/// Defined values of a column as chart points.
fn points(column: &[Option<f64>]) -> Points {
    column
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
        .collect()
}

/// Y range covering every point with 5% headroom.
fn bounds(sets: &[&Points]) -> [f64; 2] {
    let (lo, hi) = sets
        .iter()
        .flat_map(|s| s.iter().map(|(_, y)| *y))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));

    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if lo == hi {
        return [lo - 1.0, hi + 1.0];
    }
    let pad = (hi - lo) * 0.05;
    [lo - pad, hi + pad]
}

fn fixed(value: Option<f64>, places: usize) -> String {
    value
        .map(|v| format!("{:.*}", places, v))
        .unwrap_or_else(|| "n/a".to_string())
}

fn trend_label(sma20: Option<f64>, sma50: Option<f64>) -> &'static str {
    match (sma20, sma50) {
        (Some(fast), Some(slow)) if fast >= slow => "Above",
        (Some(_), Some(_)) => "Below",
        _ => "n/a",
    }
}
