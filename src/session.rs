use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::SessionError;
use crate::util::generate_id;

pub const MAX_SPEED: f64 = 15.0;
pub const MAX_INCLINE: f64 = 15.0;

pub const DEFAULT_SESSION_NAME: &str = "New Session";
const DEFAULT_SEGMENT_COUNT: usize = 5;
const DEFAULT_SEGMENT_SECS: u32 = 300;
const DEFAULT_SPEED: f64 = 5.0;

/// One timed interval of a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    /// seconds
    pub duration: u32,
    /// km/h, within `[0, MAX_SPEED]`
    pub speed: f64,
    /// percent grade, within `[0, MAX_INCLINE]`
    pub incline: f64,
}

impl Segment {
    pub fn new(duration: u32, speed: f64, incline: f64) -> Self {
        Self {
            id: generate_id(),
            duration,
            speed: clamp_metric(speed, MAX_SPEED),
            incline: clamp_metric(incline, MAX_INCLINE),
        }
    }

    /// Same settings under a fresh id
    pub fn duplicate(&self) -> Self {
        Self {
            id: generate_id(),
            ..self.clone()
        }
    }
}

/// An ordered set of segments representing one workout.
///
/// `Clone` is a deep copy: the editor works on its own copy so the stored
/// session only changes when a draft is committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub segments: Vec<Segment>,
}

impl Session {
    /// Five 5-minute segments at speed 5, flat.
    pub fn new_default() -> Self {
        Self {
            id: generate_id(),
            name: DEFAULT_SESSION_NAME.to_string(),
            segments: (0..DEFAULT_SEGMENT_COUNT)
                .map(|_| Segment::new(DEFAULT_SEGMENT_SECS, DEFAULT_SPEED, 0.0))
                .collect(),
        }
    }

    pub fn total_duration(&self) -> u64 {
        sum_durations(&self.segments)
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Append a copy of the last segment so its speed and incline carry over.
    pub fn add_segment(&mut self) {
        if let Some(last) = self.segments.last() {
            let next = last.duplicate();
            self.segments.push(next);
        }
    }

    pub fn update_segment(&mut self, updated: Segment) {
        if let Some(slot) = self.segments.iter_mut().find(|s| s.id == updated.id) {
            *slot = updated;
        }
    }

    /// Removing the only remaining segment is refused.
    pub fn remove_segment(&mut self, id: &str) {
        if let Some(index) = self.segments.iter().position(|s| s.id == id) {
            self.remove_segment_at(index);
        }
    }

    pub fn remove_segment_at(&mut self, index: usize) {
        if self.segments.len() <= 1 || index >= self.segments.len() {
            return;
        }
        self.segments.remove(index);
    }

    /// Gate applied before a run starts.
    pub fn validate_for_run(&self) -> Result<(), SessionError> {
        if self.total_duration() == 0 {
            return Err(SessionError::EmptyDuration);
        }
        Ok(())
    }

    /// Bring data from an untrusted source back within bounds.
    pub fn sanitized(mut self) -> Result<Self, SessionError> {
        if self.segments.is_empty() {
            return Err(SessionError::NoSegments { name: self.name });
        }
        let mut seen = HashSet::new();
        for segment in &mut self.segments {
            segment.speed = clamp_metric(segment.speed, MAX_SPEED);
            segment.incline = clamp_metric(segment.incline, MAX_INCLINE);
            if segment.id.trim().is_empty() || !seen.insert(segment.id.clone()) {
                segment.id = generate_id();
                seen.insert(segment.id.clone());
            }
        }
        Ok(self)
    }
}

/// Sum of segment durations. Widened so that any number of `u32` segments fits.
pub fn sum_durations(segments: &[Segment]) -> u64 {
    segments.iter().map(|s| u64::from(s.duration)).sum()
}

/// Clamp into `[0, max]`; NaN becomes 0.
pub fn clamp_metric(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max)
}

/// Parse user text for a speed/incline field. Anything non-numeric is 0.
pub fn coerce_metric(text: &str, max: f64) -> f64 {
    clamp_metric(text.trim().parse::<f64>().unwrap_or(0.0), max)
}

pub fn coerce_speed(text: &str) -> f64 {
    coerce_metric(text, MAX_SPEED)
}

pub fn coerce_incline(text: &str) -> f64 {
    coerce_metric(text, MAX_INCLINE)
}
