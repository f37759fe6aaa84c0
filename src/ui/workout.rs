use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph},
    Frame,
};

use crate::app::Workout;
use crate::editor::format_metric;
use crate::engine::PlaybackState;
use crate::util::format_time;

use super::charting::{compute_chart_params, format_label, position_marker, profile_series};
use super::{bold, dim, legend_style, HORIZONTAL_MARGIN};

fn metric_panel(label: &str, value: String, unit: &str, color: Color) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(Span::styled(
            label.to_uppercase(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(unit.to_string(), dim())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    )
}

fn status_label(playback: &PlaybackState) -> Span<'static> {
    if playback.is_active() {
        Span::styled("RUNNING", bold().fg(Color::Green))
    } else {
        Span::styled(
            "PAUSED",
            bold().fg(Color::Yellow).add_modifier(Modifier::SLOW_BLINK),
        )
    }
}

fn render_profile(playback: &PlaybackState, f: &mut Frame, area: Rect) {
    let segments = playback.segments();
    let (speed, incline) = profile_series(segments);
    let (duration, y_max) = compute_chart_params(segments);
    let marker = position_marker(playback.timeline_position(), y_max);

    let datasets = vec![
        Dataset::default()
            .name("speed")
            .marker(Marker::Braille)
            .style(Style::default().fg(Color::LightRed))
            .graph_type(GraphType::Line)
            .data(&speed),
        Dataset::default()
            .name("incline")
            .marker(Marker::Braille)
            .style(Style::default().fg(Color::Green))
            .graph_type(GraphType::Line)
            .data(&incline),
        Dataset::default()
            .marker(Marker::Braille)
            .style(Style::default().fg(Color::White))
            .graph_type(GraphType::Line)
            .data(&marker),
    ];

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title("Profile"))
        .x_axis(
            Axis::default()
                .bounds([0.0, duration])
                .labels(vec![
                    Span::styled("00:00", bold()),
                    Span::styled(format_time(duration as u64), bold()),
                ]),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::styled("0", bold()),
                    Span::styled(format_label(y_max), bold()),
                ]),
        );
    f.render_widget(chart, area);
}

pub fn render(workout: &Workout, f: &mut Frame) {
    let playback = &workout.playback;
    let segment = playback.current_segment();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(1), // alarm banner
            Constraint::Length(3), // segment countdown
            Constraint::Length(1), // segment gauge
            Constraint::Length(5), // speed / incline
            Constraint::Length(2), // total remaining
            Constraint::Length(1), // total gauge
            Constraint::Min(0),    // profile chart
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    let header = Paragraph::new(vec![
        Line::from(Span::styled(workout.session.name.clone(), bold())),
        Line::from(vec![
            Span::styled(
                format!(
                    "Segment {} of {}   ",
                    playback.current_index() + 1,
                    playback.segment_count()
                ),
                dim(),
            ),
            status_label(playback),
        ]),
    ])
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, chunks[0]);

    if playback.is_alarm_active() {
        let banner = Paragraph::new(Span::styled(
            format!("CHANGE IMMINENT! {}s", playback.segment_remaining()),
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(Color::Red))
        .alignment(Alignment::Center);
        f.render_widget(banner, chunks[1]);
    }

    let countdown_style = if playback.is_alarm_active() {
        bold().fg(Color::Red)
    } else {
        bold()
    };
    let countdown = Paragraph::new(vec![
        Line::from(Span::styled("NEXT CHANGE IN", Style::default().fg(Color::Blue))),
        Line::from(Span::styled(
            format_time(u64::from(playback.segment_remaining())),
            countdown_style,
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(countdown, chunks[2]);

    let segment_gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Blue).bg(Color::DarkGray))
        .ratio(playback.segment_progress())
        .label(format!("{:.0}%", playback.segment_progress() * 100.0));
    f.render_widget(segment_gauge, chunks[3]);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[4]);
    f.render_widget(
        metric_panel("Speed", format_metric(segment.speed), "km/h", Color::LightRed),
        panels[0],
    );
    f.render_widget(
        metric_panel(
            "Incline",
            format!("{}%", format_metric(segment.incline)),
            "grade",
            Color::Green,
        ),
        panels[1],
    );

    let total = Paragraph::new(vec![
        Line::from(Span::styled("TOTAL TIME REMAINING", dim())),
        Line::from(Span::styled(format_time(playback.total_remaining()), bold())),
    ])
    .alignment(Alignment::Center);
    f.render_widget(total, chunks[5]);

    let total_gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Gray).bg(Color::DarkGray))
        .ratio(playback.total_progress())
        .label(format!(
            "{} / {}",
            format_time(playback.total_elapsed()),
            format_time(playback.total_duration())
        ));
    f.render_widget(total_gauge, chunks[6]);

    if chunks[7].height >= 5 {
        render_profile(playback, f, chunks[7]);
    }

    let mut legend = String::new();
    if playback.can_skip_backward() {
        legend.push_str("← prev / ");
    }
    legend.push_str(if playback.is_active() {
        "(space) pause / "
    } else {
        "(space) resume / "
    });
    if playback.can_skip_forward() {
        legend.push_str("→ next / ");
    }
    legend.push_str("(esc) cancel");
    f.render_widget(
        Paragraph::new(Span::styled(legend, legend_style())),
        chunks[8],
    );
}
