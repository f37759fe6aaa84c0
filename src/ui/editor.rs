use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::editor::{Editor, Field};
use crate::session::{MAX_INCLINE, MAX_SPEED};
use crate::util::format_time;

use super::{bold, dim, highlight, legend_style, HORIZONTAL_MARGIN, VERTICAL_MARGIN};

fn cell_text(text: &str, placeholder: &str) -> String {
    if text.is_empty() {
        placeholder.to_string()
    } else {
        text.to_string()
    }
}

pub fn render(editor: &Editor, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3), // name
            Constraint::Min(3),    // segments
            Constraint::Length(1), // total / error
            Constraint::Length(2), // legend
        ])
        .split(f.area());

    let draft = editor.draft();
    let name_style = if editor.is_renaming() {
        bold().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED)
    } else {
        bold()
    };
    let name = Paragraph::new(Line::from(vec![
        Span::styled(draft.name.clone(), name_style),
        Span::styled(
            if editor.is_renaming() { "▏" } else { "" },
            Style::default().fg(Color::Cyan),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Session"));
    f.render_widget(name, chunks[0]);

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("min"),
        Cell::from("sec"),
        Cell::from(format!("speed (0-{MAX_SPEED})")),
        Cell::from(format!("incline % (0-{MAX_INCLINE})")),
        Cell::from("time"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    // keep the focused row on screen
    let visible = chunks[1].height.saturating_sub(3).max(1) as usize;
    let skip = (editor.row() + 1).saturating_sub(visible);

    let rows: Vec<Row> = editor
        .forms()
        .iter()
        .zip(draft.segments.iter())
        .enumerate()
        .skip(skip)
        .take(visible)
        .map(|(idx, (form, segment))| {
            let focused = idx == editor.row() && !editor.is_renaming();
            let field_cell = |field: Field| {
                let cell = Cell::from(cell_text(form.text(field), "0"));
                if focused && editor.field() == field {
                    cell.style(highlight())
                } else {
                    cell
                }
            };
            let row = Row::new(vec![
                Cell::from(format!("{}", idx + 1)),
                field_cell(Field::Minutes),
                field_cell(Field::Seconds),
                field_cell(Field::Speed),
                field_cell(Field::Incline),
                Cell::from(format_time(u64::from(segment.duration))).style(dim()),
            ]);
            if focused {
                row.style(bold())
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        &[
            Constraint::Length(4),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(16),
            Constraint::Length(20),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Segments ({})", draft.segment_count())),
    );
    f.render_widget(table, chunks[1]);

    let status = match editor.error() {
        Some(err) => Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(
            format!("Total {}", format_time(draft.total_duration())),
            bold(),
        ),
    };
    f.render_widget(
        Paragraph::new(status).alignment(Alignment::Center),
        chunks[2],
    );

    let legend = Paragraph::new(vec![
        Line::from(Span::styled(
            "↑/↓ segment / ←/→ tab field / type digits / +/- nudge",
            legend_style(),
        )),
        Line::from(Span::styled(
            "(a)dd / (d)elete / (r)ename / (enter) start / (esc) cancel",
            legend_style(),
        )),
    ]);
    f.render_widget(legend, chunks[3]);
}
