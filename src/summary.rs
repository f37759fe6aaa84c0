use chrono::{DateTime, Local};

use crate::session::Session;
use crate::util::format_time;

/// End-of-run report. Built from the planned session, not from what playback
/// actually consumed, so skips and rewinds do not change it.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub session_name: String,
    pub total_duration: u64,
    pub segment_count: usize,
    pub completed_at: DateTime<Local>,
}

impl Summary {
    pub fn from_session(session: &Session) -> Self {
        Self {
            session_name: session.name.clone(),
            total_duration: session.total_duration(),
            segment_count: session.segment_count(),
            completed_at: Local::now(),
        }
    }

    pub fn total_time_label(&self) -> String {
        format_time(self.total_duration)
    }
}
