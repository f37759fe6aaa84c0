use ratatui::Frame;

use crate::app::{App, AppState};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Session browser
pub struct ListScreen;

impl Screen for ListScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        super::list::render(app, f);
    }
}

/// Segment form for the current draft
pub struct EditScreen;

impl Screen for EditScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        if let Some(editor) = app.editor.as_ref() {
            super::editor::render(editor, f);
        }
    }
}

/// Live countdown
pub struct WorkoutScreen;

impl Screen for WorkoutScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        if let Some(workout) = app.workout.as_ref() {
            super::workout::render(workout, f);
        }
    }
}

pub struct SummaryScreen;

impl Screen for SummaryScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        if let Some(summary) = app.summary.as_ref() {
            super::summary::render(summary, f);
        }
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::List => Box::new(ListScreen),
        AppState::Edit => Box::new(EditScreen),
        AppState::Workout => Box::new(WorkoutScreen),
        AppState::Summary => Box::new(SummaryScreen),
    }
}
