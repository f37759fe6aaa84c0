pub mod charting;
pub mod editor;
pub mod list;
pub mod screen;
pub mod summary;
pub mod workout;

use ratatui::{
    style::{Color, Modifier, Style},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::app::App;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
}

fn legend_style() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC)
}

fn highlight() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Cut `text` to at most `max_width` terminal columns, marking the cut with `…`
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let full: usize = text.chars().filter_map(|c| c.width()).sum();
    if full <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Render whichever screen matches the current app state
pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(&app.state).render(app, f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(app: &App) -> String {
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn truncate_to_width_handles_wide_and_short_text() {
        assert_eq!(truncate_to_width("Basic Walk", 20), "Basic Walk");
        assert_eq!(truncate_to_width("HIIT GONZALO", 6), "HIIT …");
        assert_eq!(truncate_to_width("走走走走", 5), "走走…");
    }

    #[test]
    fn draws_every_state() {
        let mut app = App::default();
        assert!(rendered(&app).contains("HIIT GONZALO"));

        app.edit_selected();
        assert_eq!(app.state, AppState::Edit);
        assert!(rendered(&app).contains("05:00"));

        app.start_from_editor().unwrap();
        assert_eq!(app.state, AppState::Workout);
        assert!(rendered(&app).contains("PAUSED"));

        app.cancel_workout();
        app.new_session();
        app.start_from_editor().unwrap();
        app.workout = None;
        app.summary = Some(crate::summary::Summary::from_session(&app.sessions[2]));
        app.state = AppState::Summary;
        assert!(rendered(&app).contains("25:00"));
    }

    #[test]
    fn draws_and_runs_sessions_longer_than_u32_seconds() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
        let press = |app: &mut App, code| {
            app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
        };

        let mut app = App::default();
        app.new_session();
        for _ in 0..2 {
            for _ in 0..4 {
                press(&mut app, KeyCode::Backspace);
            }
            for _ in 0..8 {
                press(&mut app, KeyCode::Char('9'));
            }
            press(&mut app, KeyCode::Down);
        }
        let text = rendered(&app);
        assert!(text.contains("Total 143165591:30"));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Workout);
        let total = app.workout.as_ref().unwrap().playback.total_remaining();
        assert_eq!(total, 2 * u64::from(u32::MAX) + 3 * 300);
        assert!(rendered(&app).contains("PAUSED"));
    }

    #[test]
    fn draws_in_tiny_terminal() {
        let mut app = App::default();
        app.edit_selected();
        app.start_from_editor().unwrap();
        let backend = TestBackend::new(20, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(&app, f)).unwrap();
    }
}
