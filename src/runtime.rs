use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Cadence of the workout countdown
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum StrideEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<StrideEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<StrideEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // key release/repeat events would double every press on some terminals
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => StrideEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => StrideEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    tracing::error!("terminal event stream closed: {e}");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<StrideEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<StrideEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<StrideEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<StrideEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time.
///
/// Ticks are scheduled against a deadline, so a stream of key presses does
/// not push the next tick further out.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Instant,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_tick = Instant::now() + ticker.interval();
        Self {
            event_source,
            ticker,
            next_tick,
        }
    }

    /// Restart the cadence so the next tick is a full interval away.
    /// Called when a countdown resumes.
    pub fn rearm(&mut self) {
        self.next_tick = Instant::now() + self.ticker.interval();
    }

    /// Blocks until the next event arrives or the tick deadline passes
    pub fn step(&mut self) -> StrideEvent {
        let wait = self.next_tick.saturating_duration_since(Instant::now());
        match self.event_source.recv_timeout(wait) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => self.fire_tick(),
            Err(RecvTimeoutError::Disconnected) => {
                // no more input; keep the cadence instead of spinning
                std::thread::sleep(self.next_tick.saturating_duration_since(Instant::now()));
                self.fire_tick()
            }
        }
    }

    fn fire_tick(&mut self) -> StrideEvent {
        let now = Instant::now();
        self.next_tick += self.ticker.interval();
        if self.next_tick <= now {
            // fell behind; drop the backlog rather than bursting ticks
            self.next_tick = now + self.ticker.interval();
        }
        StrideEvent::Tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let mut runner = Runner::new(es, ticker);

        assert_matches!(runner.step(), StrideEvent::Tick);
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(StrideEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(10));
        let mut runner = Runner::new(es, ticker);

        assert_matches!(runner.step(), StrideEvent::Resize);
    }

    #[test]
    fn key_traffic_does_not_delay_ticks() {
        let (tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(30));
        let mut runner = Runner::new(es, ticker);

        for _ in 0..5 {
            tx.send(StrideEvent::Key(KeyEvent::new(
                KeyCode::Char('x'),
                KeyModifiers::NONE,
            )))
            .unwrap();
        }

        let started = Instant::now();
        let mut keys = 0;
        loop {
            match runner.step() {
                StrideEvent::Key(_) => keys += 1,
                StrideEvent::Tick => break,
                StrideEvent::Resize => {}
            }
        }
        assert_eq!(keys, 5);
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn disconnected_source_still_paces_ticks() {
        let (tx, rx) = mpsc::channel::<StrideEvent>();
        drop(tx);
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(20));
        let mut runner = Runner::new(es, ticker);

        let started = Instant::now();
        assert_matches!(runner.step(), StrideEvent::Tick);
        assert_matches!(runner.step(), StrideEvent::Tick);
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn rearm_pushes_deadline_out() {
        let (tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(40));
        let mut runner = Runner::new(es, ticker);

        std::thread::sleep(Duration::from_millis(30));
        runner.rearm();
        tx.send(StrideEvent::Resize).unwrap();
        assert_matches!(runner.step(), StrideEvent::Resize);

        let started = Instant::now();
        assert_matches!(runner.step(), StrideEvent::Tick);
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn default_ticker_is_one_second() {
        assert_eq!(FixedTicker::default().interval(), Duration::from_secs(1));
    }
}
