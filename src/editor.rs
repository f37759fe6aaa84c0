//! Form state for editing a session draft.
//!
//! Each segment row has four text fields. Every edit re-parses the field,
//! coerces it into range and pushes the result into the draft segment, so the
//! draft is always a valid session even while the user is mid-keystroke.

use crate::error::SessionError;
use crate::session::{clamp_metric, coerce_metric, Segment, Session, MAX_INCLINE, MAX_SPEED};
use crate::util::{minutes_of, parse_time, seconds_of};

const MAX_SECONDS_FIELD: u32 = 59;
const SPEED_STEP: f64 = 0.1;
const INCLINE_STEP: f64 = 0.5;
const MAX_NAME_LEN: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Field {
    Minutes,
    Seconds,
    Speed,
    Incline,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Minutes, Field::Seconds, Field::Speed, Field::Incline];

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Text shown in the four inputs of one segment row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentForm {
    pub minutes: String,
    pub seconds: String,
    pub speed: String,
    pub incline: String,
}

impl SegmentForm {
    pub fn from_segment(segment: &Segment) -> Self {
        Self {
            minutes: minutes_of(segment.duration),
            seconds: seconds_of(segment.duration),
            speed: format_metric(segment.speed),
            incline: format_metric(segment.incline),
        }
    }

    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Minutes => &self.minutes,
            Field::Seconds => &self.seconds,
            Field::Speed => &self.speed,
            Field::Incline => &self.incline,
        }
    }

    fn text_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Minutes => &mut self.minutes,
            Field::Seconds => &mut self.seconds,
            Field::Speed => &mut self.speed,
            Field::Incline => &mut self.incline,
        }
    }

    pub fn duration(&self) -> u32 {
        parse_time(&self.minutes, &self.seconds)
    }
}

/// Display a speed/incline without float noise: `5`, `4.5`, `3.1`
pub fn format_metric(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    format!("{rounded}")
}

#[derive(Debug, Clone)]
pub struct Editor {
    draft: Session,
    forms: Vec<SegmentForm>,
    row: usize,
    field: Field,
    renaming: bool,
    error: Option<SessionError>,
}

impl Editor {
    /// Edit a deep copy of `session`.
    pub fn new(session: &Session) -> Self {
        let draft = session.clone();
        let forms = draft.segments.iter().map(SegmentForm::from_segment).collect();
        Self {
            draft,
            forms,
            row: 0,
            field: Field::Minutes,
            renaming: false,
            error: None,
        }
    }

    pub fn draft(&self) -> &Session {
        &self.draft
    }

    pub fn forms(&self) -> &[SegmentForm] {
        &self.forms
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn is_renaming(&self) -> bool {
        self.renaming
    }

    /// Message from the last rejected start, cleared by the next edit
    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    pub fn select_next_row(&mut self) {
        if self.row + 1 < self.forms.len() {
            self.row += 1;
        }
    }

    pub fn select_prev_row(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn prev_field(&mut self) {
        self.field = self.field.prev();
    }

    pub fn add_segment(&mut self) {
        self.draft.add_segment();
        if let Some(added) = self.draft.segments.last() {
            if self.forms.len() < self.draft.segments.len() {
                self.forms.push(SegmentForm::from_segment(added));
            }
        }
        self.row = self.forms.len().saturating_sub(1);
        self.error = None;
    }

    pub fn remove_selected(&mut self) {
        let before = self.draft.segment_count();
        self.draft.remove_segment_at(self.row);
        if self.draft.segment_count() < before {
            self.forms.remove(self.row);
            self.row = self.row.min(self.forms.len().saturating_sub(1));
        }
        self.error = None;
    }

    pub fn start_rename(&mut self) {
        self.renaming = true;
    }

    pub fn stop_rename(&mut self) {
        self.renaming = false;
    }

    /// Route a typed character to the session name or the focused field.
    pub fn input_char(&mut self, c: char) {
        self.error = None;
        if self.renaming {
            if !c.is_control() && self.draft.name.chars().count() < MAX_NAME_LEN {
                self.draft.name.push(c);
            }
            return;
        }

        let field = self.field;
        let Some(form) = self.forms.get_mut(self.row) else {
            return;
        };
        let text = form.text_mut(field);
        match field {
            Field::Minutes | Field::Seconds => {
                if !c.is_ascii_digit() {
                    return;
                }
                let mut candidate = text.clone();
                candidate.push(c);
                // refuse digits that would overflow the counter
                if candidate.parse::<u32>().is_err() {
                    return;
                }
                *text = candidate;
            }
            Field::Speed | Field::Incline => {
                if !(c.is_ascii_digit() || (c == '.' && !text.contains('.'))) {
                    return;
                }
                text.push(c);
            }
        }
        self.sync_row();
    }

    pub fn backspace(&mut self) {
        self.error = None;
        if self.renaming {
            self.draft.name.pop();
            return;
        }
        let field = self.field;
        if let Some(form) = self.forms.get_mut(self.row) {
            form.text_mut(field).pop();
        }
        self.sync_row();
    }

    pub fn increment(&mut self) {
        self.nudge(1.0);
    }

    pub fn decrement(&mut self) {
        self.nudge(-1.0);
    }

    fn nudge(&mut self, direction: f64) {
        self.error = None;
        let field = self.field;
        let Some(form) = self.forms.get_mut(self.row) else {
            return;
        };
        let text = form.text_mut(field);
        *text = match field {
            Field::Minutes | Field::Seconds => {
                let current = text.parse::<u32>().unwrap_or(0);
                let next = if direction > 0.0 {
                    current.saturating_add(1)
                } else {
                    current.saturating_sub(1)
                };
                next.to_string()
            }
            Field::Speed => {
                let current = coerce_metric(text, MAX_SPEED);
                format_metric(clamp_metric(current + direction * SPEED_STEP, MAX_SPEED))
            }
            Field::Incline => {
                let current = coerce_metric(text, MAX_INCLINE);
                format_metric(clamp_metric(
                    current + direction * INCLINE_STEP,
                    MAX_INCLINE,
                ))
            }
        };
        self.sync_row();
    }

    /// Re-coerce the focused row and push its values into the draft segment.
    fn sync_row(&mut self) {
        let Some(form) = self.forms.get_mut(self.row) else {
            return;
        };
        let Some(current) = self.draft.segments.get_mut(self.row) else {
            return;
        };

        if form.seconds.parse::<u32>().is_ok_and(|s| s > MAX_SECONDS_FIELD) {
            form.seconds = MAX_SECONDS_FIELD.to_string();
        }
        let speed = coerce_text_field(&mut form.speed, MAX_SPEED);
        let incline = coerce_text_field(&mut form.incline, MAX_INCLINE);

        // by position; rows and segments share indices
        current.duration = form.duration();
        current.speed = speed;
        current.incline = incline;
    }

    /// Apply the start gate. On failure the error is kept for display and the
    /// editor stays as it is.
    pub fn finish(&mut self) -> Result<Session, SessionError> {
        self.renaming = false;
        match self.draft.validate_for_run() {
            Ok(()) => {
                self.error = None;
                Ok(self.draft.clone())
            }
            Err(e) => {
                tracing::warn!(session = %self.draft.name, "start rejected: {e}");
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }
}

/// Coerce a speed/incline buffer, rewriting it when the typed text was out of
/// range so the field shows the value actually applied.
fn coerce_text_field(text: &mut String, max: f64) -> f64 {
    let value = coerce_metric(text, max);
    match text.trim().parse::<f64>() {
        Ok(typed) if typed == value => {}
        // nothing typed yet, or a decimal point still waiting for its digits
        Err(_) if text.is_empty() || text == "." => {}
        _ => *text = format_metric(value),
    }
    value
}
