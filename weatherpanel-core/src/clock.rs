//! Local wall clock for a fixed UTC offset.
//!
//! The simulator owns at most one ticking task. Starting it again replaces
//! the running task, and dropping the simulator stops it.

use chrono::{DateTime, Duration as TimeDelta, Utc};
use std::{fmt::Debug, sync::Arc, time::Duration};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

pub const TICK: Duration = Duration::from_secs(1);

const LONG_FORMAT: &str = "%A, %B %-d, %Y, %I:%M:%S %p";

/// Formats `now` shifted by `offset_secs`, e.g. `Monday, January 1, 2024, 12:00:00 PM`.
pub fn format_local_time(now: DateTime<Utc>, offset_secs: i32) -> String {
    let local = now.naive_utc() + TimeDelta::seconds(i64::from(offset_secs));
    local.format(LONG_FORMAT).to_string()
}

/// Where ticks read the current instant from.
pub trait TimeSource: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug)]
struct Running {
    offset_secs: i32,
    task: JoinHandle<()>,
}

#[derive(Debug)]
pub struct ClockSimulator {
    source: Arc<dyn TimeSource>,
    state: Arc<watch::Sender<String>>,
    running: Option<Running>,
    restarts: u64,
}

impl Default for ClockSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSimulator {
    pub fn new() -> Self {
        Self::with_source(Arc::new(SystemClock))
    }

    pub fn with_source(source: Arc<dyn TimeSource>) -> Self {
        let (state, _) = watch::channel(String::new());
        Self {
            source,
            state: Arc::new(state),
            running: None,
            restarts: 0,
        }
    }

    /// Receiver for the formatted local time; empty until the first tick.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.state.subscribe()
    }

    /// Last published local time.
    pub fn current(&self) -> String {
        self.state.borrow().clone()
    }

    /// Offset of the running clock, `None` while idle.
    pub fn offset(&self) -> Option<i32> {
        self.running.as_ref().map(|r| r.offset_secs)
    }

    /// How many times the clock has been started.
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Cancels any running clock, then ticks once per second with `offset_secs`.
    /// The first tick lands one period after the call. Must be called within a
    /// tokio runtime.
    pub fn start(&mut self, offset_secs: i32) {
        self.cancel();

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let first = Instant::now() + TICK;

        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(first, TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                state.send_replace(format_local_time(source.now(), offset_secs));
            }
        });

        self.restarts += 1;
        tracing::debug!(offset_secs, restarts = self.restarts, "clock started");
        self.running = Some(Running { offset_secs, task });
    }

    fn cancel(&mut self) {
        if let Some(prev) = self.running.take() {
            prev.task.abort();
            tracing::trace!(offset_secs = prev.offset_secs, "clock cancelled");
        }
    }
}

impl Drop for ClockSimulator {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Always reports the same instant and counts how often it was asked.
    #[derive(Debug)]
    struct FrozenSource {
        at: DateTime<Utc>,
        calls: AtomicUsize,
    }

    impl FrozenSource {
        fn new_year_noon() -> Arc<Self> {
            Arc::new(Self {
                at: noon(),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TimeSource for FrozenSource {
        fn now(&self) -> DateTime<Utc> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.at
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn formats_long_local_time() {
        assert_eq!(format_local_time(noon(), 0), "Monday, January 1, 2024, 12:00:00 PM");
        assert_eq!(format_local_time(noon(), -5 * 3600), "Monday, January 1, 2024, 07:00:00 AM");
        assert_eq!(format_local_time(noon(), 12 * 3600), "Tuesday, January 2, 2024, 12:00:00 AM");
        assert_eq!(format_local_time(noon(), 19800), "Monday, January 1, 2024, 05:30:00 PM");
    }

    #[tokio::test(start_paused = true)]
    async fn idle_until_started() {
        let source = FrozenSource::new_year_noon();
        let clock = ClockSimulator::with_source(source.clone());

        time::sleep(Duration::from_secs(5)).await;

        assert_eq!(clock.offset(), None);
        assert_eq!(clock.restarts(), 0);
        assert_eq!(clock.current(), "");
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_lands_one_period_after_start() {
        let source = FrozenSource::new_year_noon();
        let mut clock = ClockSimulator::with_source(source.clone());

        clock.start(3600);
        assert_eq!(clock.offset(), Some(3600));

        time::sleep(Duration::from_millis(999)).await;
        assert_eq!(source.calls(), 0);
        assert_eq!(clock.current(), "");

        time::sleep(Duration::from_millis(2)).await;
        assert_eq!(source.calls(), 1);
        assert_eq!(clock.current(), "Monday, January 1, 2024, 01:00:00 PM");
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_second() {
        let source = FrozenSource::new_year_noon();
        let mut clock = ClockSimulator::with_source(source.clone());
        let mut rx = clock.subscribe();

        clock.start(0);
        for expected in 1..=3 {
            rx.changed().await.unwrap();
            assert_eq!(source.calls(), expected);
            assert_eq!(*rx.borrow_and_update(), "Monday, January 1, 2024, 12:00:00 PM");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_running_clock() {
        let source = FrozenSource::new_year_noon();
        let mut clock = ClockSimulator::with_source(source.clone());

        clock.start(0);
        time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(source.calls(), 1);

        clock.start(3600);
        time::sleep(Duration::from_millis(900)).await;
        assert_eq!(source.calls(), 1);

        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(source.calls(), 2);
        assert_eq!(clock.current(), "Monday, January 1, 2024, 01:00:00 PM");
        assert_eq!(clock.offset(), Some(3600));
        assert_eq!(clock.restarts(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn back_to_back_starts_never_double_tick() {
        let source = FrozenSource::new_year_noon();
        let mut clock = ClockSimulator::with_source(source.clone());

        clock.start(0);
        clock.start(0);
        clock.start(0);

        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(source.calls(), 3);
        assert_eq!(clock.restarts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_updates() {
        let source = FrozenSource::new_year_noon();
        let mut clock = ClockSimulator::with_source(source.clone());
        let mut rx = clock.subscribe();

        clock.start(0);
        time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(source.calls(), 1);
        rx.borrow_and_update();

        drop(clock);
        time::sleep(Duration::from_secs(5)).await;

        assert_eq!(source.calls(), 1);
        assert!(!matches!(rx.has_changed(), Ok(true)));
        assert_eq!(*rx.borrow(), "Monday, January 1, 2024, 12:00:00 PM");
    }
}
