use itertools::{Itertools, MinMaxResult};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::editor::format_metric;
use crate::session::Session;
use crate::util::format_time;

use super::{bold, highlight, legend_style, truncate_to_width, HORIZONTAL_MARGIN, VERTICAL_MARGIN};

const NAME_COLUMN: u16 = 28;

/// `min–max` of the speeds in a session, or a single value when flat
pub fn speed_range(session: &Session) -> String {
    match session.segments.iter().map(|s| s.speed).minmax() {
        MinMaxResult::NoElements => "-".to_string(),
        MinMaxResult::OneElement(v) => format_metric(v),
        MinMaxResult::MinMax(lo, hi) if lo == hi => format_metric(lo),
        MinMaxResult::MinMax(lo, hi) => {
            format!("{}–{}", format_metric(lo), format_metric(hi))
        }
    }
}

pub fn render(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(3),    // sessions
            Constraint::Length(1), // notice
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    let title = Paragraph::new(Span::styled(
        "Treadmill Sessions",
        bold().fg(Color::Cyan),
    ))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let header = Row::new(vec![
        Cell::from("Session"),
        Cell::from("Segments"),
        Cell::from("Total"),
        Cell::from("Speed km/h"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .sessions
        .iter()
        .enumerate()
        .map(|(idx, session)| {
            let row = Row::new(vec![
                Cell::from(truncate_to_width(&session.name, NAME_COLUMN as usize)),
                Cell::from(session.segment_count().to_string()),
                Cell::from(format_time(session.total_duration())),
                Cell::from(speed_range(session)),
            ]);
            if idx == app.selected {
                row.style(highlight())
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        &[
            Constraint::Length(NAME_COLUMN),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("My Sessions"));
    f.render_widget(table, chunks[1]);

    if let Some(notice) = app.notice.as_deref() {
        let notice = Paragraph::new(Span::styled(
            notice,
            Style::default().fg(Color::Yellow),
        ))
        .alignment(Alignment::Center);
        f.render_widget(notice, chunks[2]);
    }

    let legend = Paragraph::new(Span::styled(
        "↑/↓ select / (enter) edit & run / (n)ew session / (q)uit",
        legend_style(),
    ));
    f.render_widget(legend, chunks[3]);
}
