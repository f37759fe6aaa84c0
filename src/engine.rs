//! Playback state machine for a running session.
//!
//! A run has no state until [`PlaybackState::start`] accepts a session, so the
//! idle phase is simply the absence of a `PlaybackState`. From there the run is
//! `Paused` until the first toggle, flips between `Running` and `Paused`, and
//! ends in `Finished` once the last segment counts down to zero. Cancelling
//! consumes the state.
//!
//! Transitions are pure: [`PlaybackState::step`] takes the state by value and
//! returns the next state together with any event the caller must react to.
//! Throughout a run `total_remaining` equals `segment_remaining` plus the
//! durations of every segment after the current one.

use crate::error::SessionError;
use crate::session::{sum_durations, Segment, Session};
use crate::util::ratio;

/// Seconds at the end of a segment during which the change warning is shown
pub const ALARM_WINDOW_SECS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum PlaybackStatus {
    Paused,
    Running,
    Finished,
}

/// Inputs accepted by a run. `Tick` is the one-second heartbeat; the rest are user intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Command {
    Tick,
    Toggle,
    SkipForward,
    SkipBackward,
}

/// Signals the caller has to observe after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The run moved onto another segment (tick rollover or manual skip).
    SegmentChanged { index: usize },
    /// Every segment has been consumed. Emitted once per run.
    Finished,
    /// The caller abandoned the run at `index`.
    Cancelled { index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    segments: Vec<Segment>,
    current_index: usize,
    segment_remaining: u32,
    total_remaining: u64,
    status: PlaybackStatus,
}

impl PlaybackState {
    /// Begin a run over a snapshot of `session`. The run starts paused.
    ///
    /// Zero-length segments at the front are stepped over so the first tick
    /// always counts down real time.
    pub fn start(session: &Session) -> Result<Self, SessionError> {
        session.validate_for_run()?;

        let segments = session.segments.clone();
        let mut state = Self {
            segment_remaining: segments[0].duration,
            total_remaining: session.total_duration(),
            current_index: 0,
            status: PlaybackStatus::Paused,
            segments,
        };
        // no event: callers read the starting segment through `current_index`
        let _ = state.settle();

        tracing::info!(
            session = %session.name,
            segments = state.segments.len(),
            total_secs = state.total_remaining,
            "playback started"
        );
        Ok(state)
    }

    /// Apply `command` and hand back the resulting state.
    #[must_use]
    pub fn step(mut self, command: Command) -> (Self, Option<PlaybackEvent>) {
        let event = self.apply(command);
        (self, event)
    }

    /// In-place form of [`step`](Self::step), for callers that own the state mutably.
    pub fn apply(&mut self, command: Command) -> Option<PlaybackEvent> {
        let event = match command {
            Command::Tick => self.on_tick(),
            Command::Toggle => {
                self.toggle();
                None
            }
            Command::SkipForward => self.skip_forward(),
            Command::SkipBackward => self.skip_backward(),
        };

        if let Some(event) = event {
            tracing::debug!(
                %command,
                ?event,
                segment_remaining = self.segment_remaining,
                total_remaining = self.total_remaining,
                "playback transition"
            );
        }
        if event == Some(PlaybackEvent::Finished) {
            tracing::info!("playback finished");
        }
        event
    }

    /// End the run early. Consuming `self` guarantees nothing mutates it afterwards.
    pub fn cancel(self) -> PlaybackEvent {
        tracing::info!(
            index = self.current_index,
            total_remaining = self.total_remaining,
            "playback cancelled"
        );
        PlaybackEvent::Cancelled {
            index: self.current_index,
        }
    }

    fn on_tick(&mut self) -> Option<PlaybackEvent> {
        if self.status != PlaybackStatus::Running {
            return None;
        }
        self.segment_remaining = self.segment_remaining.saturating_sub(1);
        self.total_remaining = self.total_remaining.saturating_sub(1);
        self.settle()
    }

    fn toggle(&mut self) {
        self.status = match self.status {
            PlaybackStatus::Paused => PlaybackStatus::Running,
            PlaybackStatus::Running => PlaybackStatus::Paused,
            PlaybackStatus::Finished => return,
        };
        tracing::info!(status = %self.status, "playback toggled");
    }

    fn skip_forward(&mut self) -> Option<PlaybackEvent> {
        if !self.can_skip_forward() {
            return None;
        }
        // leftover time of the skipped segment is dropped, not refunded
        self.total_remaining = self
            .total_remaining
            .saturating_sub(u64::from(self.segment_remaining));
        self.current_index += 1;
        self.segment_remaining = self.segments[self.current_index].duration;
        self.settle().or(Some(PlaybackEvent::SegmentChanged {
            index: self.current_index,
        }))
    }

    fn skip_backward(&mut self) -> Option<PlaybackEvent> {
        if !self.can_skip_backward() {
            return None;
        }
        // both the previous segment and the elapsed part of this one get replayed
        let elapsed = self.segment_elapsed();
        let previous = self.segments[self.current_index - 1].duration;
        self.total_remaining = self
            .total_remaining
            .saturating_add(u64::from(previous))
            .saturating_add(u64::from(elapsed));
        self.current_index -= 1;
        self.segment_remaining = previous;
        self.settle().or(Some(PlaybackEvent::SegmentChanged {
            index: self.current_index,
        }))
    }

    /// Resolve a segment that has no time left: move on to the next segment
    /// with time on it, or finish if the last one is spent.
    fn settle(&mut self) -> Option<PlaybackEvent> {
        if self.segment_remaining > 0 || self.status == PlaybackStatus::Finished {
            return None;
        }
        while self.segment_remaining == 0 {
            if self.is_last_segment() {
                self.status = PlaybackStatus::Finished;
                return Some(PlaybackEvent::Finished);
            }
            self.current_index += 1;
            self.segment_remaining = self.segments[self.current_index].duration;
        }
        Some(PlaybackEvent::SegmentChanged {
            index: self.current_index,
        })
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Whether the countdown is ticking
    pub fn is_active(&self) -> bool {
        self.status == PlaybackStatus::Running
    }

    pub fn is_finished(&self) -> bool {
        self.status == PlaybackStatus::Finished
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_segment(&self) -> &Segment {
        &self.segments[self.current_index]
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segment_remaining(&self) -> u32 {
        self.segment_remaining
    }

    pub fn total_remaining(&self) -> u64 {
        self.total_remaining
    }

    /// Planned length of the whole run
    pub fn total_duration(&self) -> u64 {
        sum_durations(&self.segments)
    }

    pub fn segment_elapsed(&self) -> u32 {
        self.current_segment()
            .duration
            .saturating_sub(self.segment_remaining)
    }

    pub fn total_elapsed(&self) -> u64 {
        self.total_duration().saturating_sub(self.total_remaining)
    }

    /// Seconds into the planned timeline where playback currently sits.
    pub fn timeline_position(&self) -> u64 {
        sum_durations(&self.segments[..self.current_index]) + u64::from(self.segment_elapsed())
    }

    pub fn segment_progress(&self) -> f64 {
        ratio(
            u64::from(self.segment_elapsed()),
            u64::from(self.current_segment().duration),
        )
    }

    pub fn total_progress(&self) -> f64 {
        ratio(self.total_elapsed(), self.total_duration())
    }

    /// The last few seconds of a segment, used to cue the upcoming change.
    pub fn is_alarm_active(&self) -> bool {
        self.segment_remaining > 0 && self.segment_remaining <= ALARM_WINDOW_SECS
    }

    pub fn is_last_segment(&self) -> bool {
        self.current_index + 1 >= self.segments.len()
    }

    pub fn can_skip_forward(&self) -> bool {
        !self.is_finished() && !self.is_last_segment()
    }

    pub fn can_skip_backward(&self) -> bool {
        !self.is_finished() && self.current_index > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn session(durations: &[u32]) -> Session {
        Session {
            id: "test".into(),
            name: "test".into(),
            segments: durations
                .iter()
                .enumerate()
                .map(|(i, &d)| Segment::new(d, 3.0 + i as f64, i as f64))
                .collect(),
        }
    }

    fn running(durations: &[u32]) -> PlaybackState {
        let (state, _) = PlaybackState::start(&session(durations))
            .unwrap()
            .step(Command::Toggle);
        state
    }

    fn tick_n(mut state: PlaybackState, n: usize) -> (PlaybackState, Vec<PlaybackEvent>) {
        let mut events = vec![];
        for _ in 0..n {
            let (next, event) = state.step(Command::Tick);
            state = next;
            events.extend(event);
        }
        (state, events)
    }

    #[test]
    fn start_initial_state() {
        let state = PlaybackState::start(&session(&[10, 5])).unwrap();
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.segment_remaining(), 10);
        assert_eq!(state.total_remaining(), 15);
        assert!(!state.is_active());
        assert_eq!(state.status(), PlaybackStatus::Paused);
    }

    #[test]
    fn start_rejects_zero_total() {
        assert_matches!(
            PlaybackState::start(&session(&[0, 0])),
            Err(SessionError::EmptyDuration)
        );
    }

    #[test]
    fn start_steps_over_leading_empty_segments() {
        let state = PlaybackState::start(&session(&[0, 0, 8])).unwrap();
        assert_eq!(state.current_index(), 2);
        assert_eq!(state.segment_remaining(), 8);
        assert_eq!(state.total_remaining(), 8);
    }

    #[test]
    fn start_does_not_touch_session() {
        let original = session(&[10, 5]);
        let before = original.clone();
        let state = running(&[10, 5]);
        let _ = tick_n(state, 3);
        let _ = PlaybackState::start(&original).unwrap();
        assert_eq!(original, before);
    }

    #[test]
    fn paused_ticks_do_nothing() {
        let state = PlaybackState::start(&session(&[10])).unwrap();
        let (state, events) = tick_n(state, 4);
        assert!(events.is_empty());
        assert_eq!(state.segment_remaining(), 10);
        assert_eq!(state.total_remaining(), 10);
    }

    #[test]
    fn tick_decrements_both_counters() {
        let (state, event) = running(&[10, 5]).step(Command::Tick);
        assert_eq!(event, None);
        assert_eq!(state.segment_remaining(), 9);
        assert_eq!(state.total_remaining(), 14);
    }

    #[test]
    fn toggle_does_not_change_counters() {
        let state = running(&[10, 5]);
        let (state, _) = tick_n(state, 3);
        let (paused, event) = state.clone().step(Command::Toggle);
        assert_eq!(event, None);
        assert!(!paused.is_active());
        assert_eq!(paused.segment_remaining(), state.segment_remaining());
        assert_eq!(paused.total_remaining(), state.total_remaining());

        let (resumed, _) = paused.step(Command::Toggle);
        assert!(resumed.is_active());
    }

    #[test]
    fn two_segment_scenario_advances_then_finishes() {
        let state = running(&[10, 5]);

        let (state, events) = tick_n(state, 10);
        assert_eq!(events, vec![PlaybackEvent::SegmentChanged { index: 1 }]);
        assert_eq!(state.current_index(), 1);
        assert_eq!(state.segment_remaining(), 5);
        assert_eq!(state.total_remaining(), 5);

        let (state, events) = tick_n(state, 5);
        assert_eq!(events, vec![PlaybackEvent::Finished]);
        assert!(state.is_finished());
        assert!(!state.is_active());
        assert_eq!(state.total_remaining(), 0);
        assert_eq!(state.segment_remaining(), 0);
        assert_eq!(state.current_index(), 1);
    }

    #[test]
    fn finish_fires_once_and_ticking_stops() {
        let durations = [3, 4, 2];
        let mut state = running(&durations);
        let mut ticks_until_finish = 0;
        let mut finished = 0;
        for _ in 0..50 {
            let (next, event) = state.step(Command::Tick);
            state = next;
            if finished == 0 {
                ticks_until_finish += 1;
            }
            if event == Some(PlaybackEvent::Finished) {
                finished += 1;
            }
        }
        assert_eq!(finished, 1);
        assert_eq!(ticks_until_finish, 9);
        assert_eq!(state.total_remaining(), 0);
        assert_eq!(state.current_index(), durations.len() - 1);
    }

    #[test]
    fn toggle_after_finish_is_noop() {
        let (state, _) = tick_n(running(&[2]), 2);
        let (state, event) = state.step(Command::Toggle);
        assert_eq!(event, None);
        assert_eq!(state.status(), PlaybackStatus::Finished);
    }

    #[test]
    fn skip_forward_drops_leftover_time() {
        let (state, _) = tick_n(running(&[10, 5]), 3);
        assert_eq!(state.segment_remaining(), 7);
        let before = state.total_remaining();

        let (state, event) = state.step(Command::SkipForward);
        assert_eq!(event, Some(PlaybackEvent::SegmentChanged { index: 1 }));
        assert_eq!(state.current_index(), 1);
        assert_eq!(state.segment_remaining(), 5);
        assert_eq!(state.total_remaining(), before - 7);
    }

    #[test]
    fn skip_forward_at_last_segment_is_noop() {
        let (state, _) = tick_n(running(&[2, 5]), 2);
        assert!(state.is_last_segment());
        let (after, event) = state.clone().step(Command::SkipForward);
        assert_eq!(event, None);
        assert_eq!(after, state);
    }

    #[test]
    fn skip_forward_onto_empty_last_segment_finishes() {
        let (state, event) = running(&[10, 0]).step(Command::SkipForward);
        assert_eq!(event, Some(PlaybackEvent::Finished));
        assert!(state.is_finished());
        assert_eq!(state.total_remaining(), 0);
    }

    #[test]
    fn skip_backward_restores_previous_and_elapsed() {
        let (state, _) = tick_n(running(&[10, 5]), 10);
        assert_eq!(state.current_index(), 1);
        let before = state.total_remaining();

        let (state, event) = state.step(Command::SkipBackward);
        assert_eq!(event, Some(PlaybackEvent::SegmentChanged { index: 0 }));
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.segment_remaining(), 10);
        assert_eq!(state.total_remaining(), before + 10);
    }

    #[test]
    fn skip_backward_counts_partial_progress() {
        let (state, _) = tick_n(running(&[10, 5]), 12);
        assert_eq!(state.segment_remaining(), 3);
        let before = state.total_remaining();

        let (state, _) = state.step(Command::SkipBackward);
        assert_eq!(state.total_remaining(), before + 10 + 2);
        assert_eq!(state.total_remaining(), 15);
    }

    #[test]
    fn skip_backward_at_first_segment_is_noop() {
        let (state, _) = tick_n(running(&[10, 5]), 4);
        let (after, event) = state.clone().step(Command::SkipBackward);
        assert_eq!(event, None);
        assert_eq!(after, state);
    }

    #[test]
    fn skips_work_while_paused() {
        let state = PlaybackState::start(&session(&[10, 5, 8])).unwrap();
        let (state, _) = state.step(Command::SkipForward);
        assert_eq!(state.current_index(), 1);
        assert!(!state.is_active());
        assert_eq!(state.total_remaining(), 13);
    }

    #[test]
    fn skips_after_finish_are_noops() {
        let (state, _) = tick_n(running(&[1, 1]), 2);
        assert!(state.is_finished());
        let (state, event) = state.step(Command::SkipBackward);
        assert_eq!(event, None);
        assert!(state.is_finished());
    }

    #[test]
    fn alarm_window() {
        let state = running(&[7]);
        assert!(!state.is_alarm_active());
        let (state, _) = tick_n(state, 1);
        assert_eq!(state.segment_remaining(), 6);
        assert!(!state.is_alarm_active());
        let (state, _) = tick_n(state, 1);
        assert_eq!(state.segment_remaining(), 5);
        assert!(state.is_alarm_active());
        let (state, _) = tick_n(state, 4);
        assert_eq!(state.segment_remaining(), 1);
        assert!(state.is_alarm_active());
        let (state, _) = tick_n(state, 1);
        assert_eq!(state.segment_remaining(), 0);
        assert!(!state.is_alarm_active());
    }

    #[test]
    fn progress_ratios() {
        let (state, _) = tick_n(running(&[10, 10]), 5);
        assert_eq!(state.segment_progress(), 0.5);
        assert_eq!(state.total_progress(), 0.25);
        assert_eq!(state.timeline_position(), 5);

        let (state, _) = tick_n(state, 15);
        assert!(state.is_finished());
        assert_eq!(state.total_progress(), 1.0);
        assert!(!state.segment_progress().is_nan());
    }

    #[test]
    fn empty_segment_mid_session_is_passed_through() {
        let (state, events) = tick_n(running(&[2, 0, 3]), 2);
        assert_eq!(events, vec![PlaybackEvent::SegmentChanged { index: 2 }]);
        assert_eq!(state.segment_remaining(), 3);
        assert_eq!(state.total_remaining(), 3);
    }

    #[test]
    fn very_long_segments_keep_exact_totals() {
        let max = u64::from(u32::MAX);
        let (state, _) = tick_n(running(&[u32::MAX, u32::MAX, 7]), 3);
        assert_eq!(state.total_duration(), 2 * max + 7);
        assert_eq!(state.total_remaining(), 2 * max + 4);
        assert_eq!(state.timeline_position(), 3);

        let (state, _) = state.step(Command::SkipForward);
        assert_eq!(state.total_remaining(), max + 7);
        assert_eq!(state.timeline_position(), max);

        let (state, _) = state.step(Command::SkipBackward);
        assert_eq!(state.total_remaining(), 2 * max + 7);
        assert!((0.0..=1.0).contains(&state.total_progress()));
    }

    #[test]
    fn cancel_reports_position() {
        let (state, _) = tick_n(running(&[2, 5]), 3);
        assert_matches!(state.cancel(), PlaybackEvent::Cancelled { index: 1 });
    }
}
