//! TUI rendering.
//!
//! ┌──────────────────────────────────────────────────────────────┐
//! │  hwdash   rig 10.0.0.5:5000                     ok 41  err 0 │
//! ├──────────────┬──────────────┬──────────────┬─────────────────┤
//! │ CPU Usage 42%│ RAM Usage 61%│ GPU Usage 0% │ Disk Usage 44%  │
//! │ ████▌        │ ██████▏      │              │ 410GB / 931GB   │
//! ├──────────────┴───┬──────────┴──────────────┴─────────────────┤
//! │  Temperatures    │  Processes                                │
//! │  CPU   55°C      │  Process name   CPU    RAM   GPU          │
//! │  GPU   41°C      │  python.exe     12.1%  2.4%  0%           │
//! │  SSD   —         │                                           │
//! ├──────────────────┴───────────────────────────────────────────┤
//! │  r: refresh now   q: quit                                    │
//! └──────────────────────────────────────────────────────────────┘

use hwdash_core::{BannerStyle, EMPTY_MARKER, Gauge as GaugeKind, GaugeView, TableView};
use ratatui::{prelude::*, widgets::*};

use super::app::App;
use crate::dashboard::DashboardState;

pub fn draw(f: &mut Frame, app: &App, state: &DashboardState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // banner
            Constraint::Length(3), // gauges
            Constraint::Min(6),    // tables
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_banner(f, rows[0], app, state);
    draw_gauges(f, rows[1], state);
    draw_tables(f, rows[2], state);
    draw_keys(f, rows[3], app);
}

fn banner_color(style: Option<BannerStyle>) -> Color {
    match style {
        Some(BannerStyle::Connected) => Color::LightBlue,
        Some(BannerStyle::Error) => Color::Red,
        None => Color::DarkGray,
    }
}

fn draw_banner(f: &mut Frame, area: Rect, app: &App, state: &DashboardState) {
    let banner = state.banner();
    let color = banner_color(banner.map(|b| b.style));
    let text = match banner {
        Some(b) => b.text.clone(),
        None => format!("connecting to {} ...", app.endpoint()),
    };

    let stats = app.stats();
    let age = match state.since_update() {
        Some(age) => format!("  {:.1}s ago", age.as_secs_f64()),
        None => String::new(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Line::from(vec![
            Span::styled(" hwdash ", Style::default().bold().fg(color)),
            Span::styled(
                format!(" ok {}  err {}{age} ", stats.succeeded(), stats.failed()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

    let p = Paragraph::new(text)
        .style(Style::default().bold().fg(color))
        .block(block);
    f.render_widget(p, area);
}

fn draw_gauges(f: &mut Frame, area: Rect, state: &DashboardState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (gauge, col) in GaugeKind::ALL.into_iter().zip(cols.iter()) {
        let label = match gauge {
            GaugeKind::Disk => state.contents.disk_usage_label.clone(),
            _ => None,
        };
        f.render_widget(gauge_widget(gauge, state.contents.gauge(gauge), label), *col);
    }
}

fn gauge_widget(
    kind: GaugeKind,
    view: Option<&GaugeView>,
    label: Option<String>,
) -> Gauge<'static> {
    let (title, ratio) = match view {
        Some(v) => (v.title.clone(), gauge_ratio(v.percent)),
        None => (format!("{} Usage {EMPTY_MARKER}", kind.label()), 0.0),
    };
    let label = label.unwrap_or_else(|| match view {
        Some(v) => format!("{:.0}%", v.percent),
        None => EMPTY_MARKER.to_string(),
    });

    Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(" {title} ")))
        .gauge_style(Style::default().fg(gauge_color(ratio)))
        .ratio(ratio)
        .label(label)
}

/// `Gauge::ratio` panics outside `[0, 1]`.
fn gauge_ratio(percent: f64) -> f64 {
    if percent.is_finite() {
        (percent / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn gauge_color(ratio: f64) -> Color {
    if ratio >= 0.9 {
        Color::Red
    } else if ratio >= 0.7 {
        Color::Yellow
    } else {
        Color::Green
    }
}

fn draw_tables(f: &mut Frame, area: Rect, state: &DashboardState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    draw_table(
        f,
        cols[0],
        " Temperatures ",
        state.contents.temperature_table.as_ref(),
        &[Constraint::Length(5), Constraint::Min(6)],
    );
    draw_table(
        f,
        cols[1],
        " Processes ",
        state.contents.process_table.as_ref(),
        &[
            Constraint::Min(16),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    );
}

fn draw_table(
    f: &mut Frame,
    area: Rect,
    title: &str,
    table: Option<&TableView>,
    widths: &[Constraint],
) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let Some(table) = table else {
        let p = Paragraph::new(EMPTY_MARKER)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(p, area);
        return;
    };

    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|cells| Row::new(cells.clone()))
        .collect();
    let mut widget = Table::new(rows, widths.to_vec()).block(block);
    if !table.header.is_empty() {
        widget = widget.header(
            Row::new(table.header.clone()).style(Style::default().bold().fg(Color::Cyan)),
        );
    }
    f.render_widget(widget, area);
}

fn draw_keys(f: &mut Frame, area: Rect, app: &App) {
    let bar = Paragraph::new(format!(
        " r: refresh now   q: quit   every {} ms",
        app.interval().as_millis()
    ))
    .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}
