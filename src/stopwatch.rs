use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

/// Source of monotonic timestamps for the stopwatch.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Stopped,
    Running { since: Instant },
    Paused,
}

/// Observable state of the stopwatch, without the segment timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Stopped,
    Running,
    Paused,
}

impl PhaseKind {
    pub fn label(self) -> &'static str {
        match self {
            PhaseKind::Stopped => "Stopped",
            PhaseKind::Running => "Running",
            PhaseKind::Paused => "Paused",
        }
    }
}

/// Which of the three action buttons accept input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlStates {
    pub start: bool,
    pub pause: bool,
    pub stop: bool,
}

/// Elapsed-time tracker with start / pause / stop transitions.
///
/// Elapsed time is derived from timestamps taken at each transition, never from
/// counting refresh ticks, so a late or skipped repaint does not drift.
pub struct Stopwatch<C: Clock = SystemClock> {
    clock: C,
    phase: Phase,
    accumulated: Duration,
    started_at: Option<DateTime<Local>>,
}

impl Default for Stopwatch<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> Stopwatch<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            phase: Phase::Stopped,
            accumulated: Duration::ZERO,
            started_at: None,
        }
    }

    /// Begins a new run segment. Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        if let Phase::Running { .. } = self.phase {
            return false;
        }
        self.phase = Phase::Running {
            since: self.clock.now(),
        };
        self.started_at = Some(Local::now());
        true
    }

    /// Banks the current segment. Returns `false` unless running.
    pub fn pause(&mut self) -> bool {
        let Phase::Running { since } = self.phase else {
            return false;
        };
        self.accumulated += self.clock.now().saturating_duration_since(since);
        self.phase = Phase::Paused;
        self.started_at = None;
        true
    }

    /// Discards all banked time. Returns `false` if it was already stopped.
    pub fn stop(&mut self) -> bool {
        let changed = self.phase != Phase::Stopped;
        self.phase = Phase::Stopped;
        self.accumulated = Duration::ZERO;
        self.started_at = None;
        changed
    }

    pub fn elapsed(&self) -> Duration {
        match self.phase {
            Phase::Running { since } => {
                self.accumulated + self.clock.now().saturating_duration_since(since)
            }
            Phase::Stopped | Phase::Paused => self.accumulated,
        }
    }

    /// Time banked from finished segments only.
    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    pub fn phase(&self) -> PhaseKind {
        match self.phase {
            Phase::Stopped => PhaseKind::Stopped,
            Phase::Running { .. } => PhaseKind::Running,
            Phase::Paused => PhaseKind::Paused,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Local wall-clock time the current segment began. Display only.
    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    pub fn controls(&self) -> ControlStates {
        let running = self.is_running();
        ControlStates {
            start: !running,
            pause: running,
            // never disabled, even before the first start
            stop: true,
        }
    }

    pub fn display(&self) -> String {
        format_elapsed(self.elapsed())
    }
}

/// Formats a duration as `HH:MM:SS`, truncating sub-second precision.
/// Hours keep growing past 99.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_sec = elapsed.as_secs();

    let h = total_sec / 3600;
    let m = (total_sec % 3600) / 60;
    let s = total_sec % 60;

    format!("{:02}:{:02}:{:02}", h, m, s)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Clock that only moves when told to.
    #[derive(Clone)]
    pub(crate) struct ManualClock {
        base: Instant,
        offset: Rc<Cell<Duration>>,
    }

    impl ManualClock {
        pub(crate) fn new() -> Self {
            Self {
                base: Instant::now(),
                offset: Rc::new(Cell::new(Duration::ZERO)),
            }
        }

        pub(crate) fn advance(&self, by: Duration) {
            self.offset.set(self.offset.get() + by);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.base + self.offset.get()
        }
    }

    fn stopwatch() -> (Stopwatch<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (Stopwatch::new(clock.clone()), clock)
    }

    #[test]
    fn starts_stopped_at_zero() {
        let (sw, _) = stopwatch();
        assert_eq!(sw.phase(), PhaseKind::Stopped);
        assert_eq!(sw.elapsed(), Duration::ZERO);
        assert_eq!(sw.display(), "00:00:00");
        assert!(sw.started_at().is_none());
    }

    #[test]
    fn running_time_accrues_live() {
        let (mut sw, clock) = stopwatch();
        assert!(sw.start());
        clock.advance(Duration::from_secs(75));
        assert_eq!(sw.elapsed(), Duration::from_secs(75));
        assert_eq!(sw.accumulated(), Duration::ZERO);
        assert_eq!(sw.display(), "00:01:15");
        assert!(sw.started_at().is_some());
    }

    #[test]
    fn pause_banks_segment_and_freezes() {
        let (mut sw, clock) = stopwatch();
        sw.start();
        clock.advance(Duration::from_secs(10));
        assert!(sw.pause());
        clock.advance(Duration::from_secs(500));
        assert_eq!(sw.phase(), PhaseKind::Paused);
        assert_eq!(sw.elapsed(), Duration::from_secs(10));
        assert_eq!(sw.accumulated(), Duration::from_secs(10));
    }

    #[test]
    fn segments_add_up_across_pauses() {
        let (mut sw, clock) = stopwatch();
        sw.start();
        clock.advance(Duration::from_secs(30));
        sw.pause();
        clock.advance(Duration::from_secs(100));
        sw.start();
        clock.advance(Duration::from_secs(45));
        assert_eq!(sw.elapsed(), Duration::from_secs(75));
        sw.pause();
        assert_eq!(sw.accumulated(), Duration::from_secs(75));
    }

    #[test]
    fn start_while_running_is_ignored() {
        let (mut sw, clock) = stopwatch();
        sw.start();
        clock.advance(Duration::from_secs(5));
        assert!(!sw.start());
        clock.advance(Duration::from_secs(5));
        assert_eq!(sw.elapsed(), Duration::from_secs(10));
    }

    #[test]
    fn pause_outside_running_is_ignored() {
        let (mut sw, clock) = stopwatch();
        assert!(!sw.pause());
        sw.start();
        clock.advance(Duration::from_secs(3));
        sw.pause();
        assert!(!sw.pause());
        assert_eq!(sw.accumulated(), Duration::from_secs(3));
    }

    #[test]
    fn stop_resets_from_every_state() {
        let (mut sw, clock) = stopwatch();
        assert!(!sw.stop());
        assert_eq!(sw.display(), "00:00:00");

        sw.start();
        clock.advance(Duration::from_secs(20));
        assert!(sw.stop());
        assert_eq!(sw.phase(), PhaseKind::Stopped);
        assert_eq!(sw.display(), "00:00:00");

        sw.start();
        clock.advance(Duration::from_secs(20));
        sw.pause();
        assert!(sw.stop());
        assert_eq!(sw.display(), "00:00:00");
        assert!(sw.started_at().is_none());
    }

    #[test]
    fn instant_start_pause_is_zero() {
        let (mut sw, _) = stopwatch();
        sw.start();
        sw.pause();
        assert_eq!(sw.elapsed(), Duration::ZERO);
        assert_eq!(sw.display(), "00:00:00");
    }

    #[test]
    fn accumulated_never_decreases_except_on_stop() {
        let (mut sw, clock) = stopwatch();
        let mut last = Duration::ZERO;
        for step in 0..30u64 {
            match step % 5 {
                0 | 3 => {
                    sw.start();
                }
                1 | 4 => {
                    sw.pause();
                }
                _ => {}
            }
            clock.advance(Duration::from_millis(step * 37));
            assert!(sw.accumulated() >= last);
            last = sw.accumulated();
        }
        sw.stop();
        assert_eq!(sw.accumulated(), Duration::ZERO);
    }

    #[test]
    fn controls_follow_phase() {
        let (mut sw, _) = stopwatch();
        let stopped = sw.controls();
        assert!(stopped.start && !stopped.pause && stopped.stop);

        sw.start();
        let running = sw.controls();
        assert!(!running.start && running.pause && running.stop);

        sw.pause();
        let paused = sw.controls();
        assert!(paused.start && !paused.pause && paused.stop);
    }

    #[test]
    fn format_truncates_fractional_seconds() {
        assert_eq!(format_elapsed(Duration::from_secs_f64(3661.7)), "01:01:01");
        assert_eq!(format_elapsed(Duration::from_millis(59_999)), "00:00:59");
    }

    #[test]
    fn format_hours_are_unbounded() {
        assert_eq!(format_elapsed(Duration::from_secs(100 * 3600)), "100:00:00");
        assert_eq!(
            format_elapsed(Duration::from_secs(1234 * 3600 + 5 * 60 + 9)),
            "1234:05:09"
        );
    }
}
