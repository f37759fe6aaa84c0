use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::summary::Summary;

use super::{bold, dim, legend_style, HORIZONTAL_MARGIN, VERTICAL_MARGIN};

pub fn render(summary: &Summary, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(9),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let body = Paragraph::new(vec![
        Line::from(Span::styled("Completed!", bold().fg(Color::Green))),
        Line::from(Span::styled(summary.session_name.clone(), bold())),
        Line::default(),
        Line::from(vec![
            Span::styled("Total time  ", dim()),
            Span::styled(summary.total_time_label(), bold().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("Segments    ", dim()),
            Span::styled(summary.segment_count.to_string(), bold()),
        ]),
        Line::from(Span::styled(
            summary.completed_at.format("%Y-%m-%d %H:%M").to_string(),
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    f.render_widget(body, chunks[1]);

    f.render_widget(
        Paragraph::new(Span::styled("(enter) back to sessions", legend_style()))
            .alignment(Alignment::Center),
        chunks[3],
    );
}
