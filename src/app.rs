use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::editor::Editor;
use crate::engine::{Command, PlaybackEvent, PlaybackState};
use crate::error::SessionError;
use crate::seed::predefined_sessions;
use crate::session::Session;
use crate::summary::Summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum AppState {
    List,
    Edit,
    Workout,
    Summary,
}

/// What the event loop has to do after a key was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    /// The countdown just (re)started; restart the tick cadence.
    RearmTicker,
    Quit,
}

/// A session being run together with its playback state
#[derive(Debug)]
pub struct Workout {
    pub session: Session,
    pub playback: PlaybackState,
}

#[derive(Debug)]
pub struct App {
    pub sessions: Vec<Session>,
    pub selected: usize,
    pub state: AppState,
    pub editor: Option<Editor>,
    pub workout: Option<Workout>,
    pub summary: Option<Summary>,
    pub notice: Option<String>,
    pub auto_start: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new(predefined_sessions(), false)
    }
}

impl App {
    pub fn new(sessions: Vec<Session>, auto_start: bool) -> Self {
        Self {
            sessions,
            selected: 0,
            state: AppState::List,
            editor: None,
            workout: None,
            summary: None,
            notice: None,
            auto_start,
        }
    }

    pub fn selected_session(&self) -> Option<&Session> {
        self.sessions.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.sessions.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Open the editor on a fresh default session.
    pub fn new_session(&mut self) {
        self.open_editor(&Session::new_default());
    }

    /// Open the editor on a copy of the highlighted session.
    pub fn edit_selected(&mut self) {
        if let Some(session) = self.selected_session().cloned() {
            self.open_editor(&session);
        }
    }

    fn open_editor(&mut self, session: &Session) {
        tracing::debug!(session = %session.name, "editing session");
        self.editor = Some(Editor::new(session));
        self.notice = None;
        self.state = AppState::Edit;
    }

    /// Leave the editor without keeping the draft.
    pub fn discard_draft(&mut self) {
        self.editor = None;
        self.state = AppState::List;
    }

    /// Validate the draft, keep it in the session list and start running it.
    /// A rejected draft leaves the app in the editor.
    pub fn start_from_editor(&mut self) -> Result<(), SessionError> {
        let Some(editor) = self.editor.as_mut() else {
            return Ok(());
        };
        let session = editor.finish()?;
        let playback = PlaybackState::start(&session)?;

        self.commit(session.clone());
        self.editor = None;
        self.workout = Some(Workout { session, playback });
        self.state = AppState::Workout;
        if self.auto_start {
            self.drive(Command::Toggle);
        }
        Ok(())
    }

    /// Sessions only live in memory; a committed draft replaces its original or is appended.
    fn commit(&mut self, session: Session) {
        match self.sessions.iter().position(|s| s.id == session.id) {
            Some(idx) => {
                self.sessions[idx] = session;
                self.selected = idx;
            }
            None => {
                self.sessions.push(session);
                self.selected = self.sessions.len() - 1;
            }
        }
    }

    /// Feed a command to the running workout and react to its events.
    pub fn drive(&mut self, command: Command) -> Option<PlaybackEvent> {
        let workout = self.workout.as_mut()?;
        let event = workout.playback.apply(command);
        if event == Some(PlaybackEvent::Finished) {
            self.finish_workout();
        }
        event
    }

    /// One second elapsed. Returns true when the screen needs redrawing.
    pub fn on_tick(&mut self) -> bool {
        let active = self
            .workout
            .as_ref()
            .is_some_and(|w| w.playback.is_active());
        if !active {
            return false;
        }
        self.drive(Command::Tick);
        true
    }

    fn finish_workout(&mut self) {
        if let Some(workout) = self.workout.take() {
            self.summary = Some(Summary::from_session(&workout.session));
            self.state = AppState::Summary;
        }
    }

    /// Abandon the running workout; nothing is reported beyond a notice.
    pub fn cancel_workout(&mut self) {
        if let Some(workout) = self.workout.take() {
            if let PlaybackEvent::Cancelled { index } = workout.playback.cancel() {
                self.notice = Some(format!(
                    "Cancelled {} at segment {}",
                    workout.session.name,
                    index + 1
                ));
            }
        }
        self.state = AppState::List;
    }

    pub fn acknowledge_summary(&mut self) {
        self.summary = None;
        self.state = AppState::List;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }

        match self.state {
            AppState::List => self.on_list_key(key),
            AppState::Edit => self.on_edit_key(key),
            AppState::Workout => self.on_workout_key(key),
            AppState::Summary => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                    self.acknowledge_summary();
                }
                KeyOutcome::Continue
            }
        }
    }

    fn on_list_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Enter => self.edit_selected(),
            KeyCode::Char('n') => self.new_session(),
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn on_edit_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let Some(editor) = self.editor.as_mut() else {
            self.state = AppState::List;
            return KeyOutcome::Continue;
        };

        if editor.is_renaming() {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => editor.stop_rename(),
                KeyCode::Backspace => editor.backspace(),
                KeyCode::Char(c) => editor.input_char(c),
                _ => {}
            }
            return KeyOutcome::Continue;
        }

        match key.code {
            KeyCode::Esc => self.discard_draft(),
            KeyCode::Enter => {
                let started = self.start_from_editor().is_ok()
                    && self
                        .workout
                        .as_ref()
                        .is_some_and(|w| w.playback.is_active());
                if started {
                    return KeyOutcome::RearmTicker;
                }
            }
            KeyCode::Up => editor.select_prev_row(),
            KeyCode::Down => editor.select_next_row(),
            KeyCode::Tab | KeyCode::Right => editor.next_field(),
            KeyCode::BackTab | KeyCode::Left => editor.prev_field(),
            KeyCode::Backspace => editor.backspace(),
            KeyCode::Delete | KeyCode::Char('d') => editor.remove_selected(),
            KeyCode::Char('a') => editor.add_segment(),
            KeyCode::Char('r') => editor.start_rename(),
            KeyCode::Char('+') | KeyCode::Char('=') => editor.increment(),
            KeyCode::Char('-') => editor.decrement(),
            KeyCode::Char(c) => editor.input_char(c),
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn on_workout_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Char('p') => {
                self.drive(Command::Toggle);
                let resumed = self
                    .workout
                    .as_ref()
                    .is_some_and(|w| w.playback.is_active());
                if resumed {
                    return KeyOutcome::RearmTicker;
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.drive(Command::SkipForward);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.drive(Command::SkipBackward);
            }
            KeyCode::Esc | KeyCode::Char('x') => self.cancel_workout(),
            _ => {}
        }
        KeyOutcome::Continue
    }
}
