//! Keeps the playout loop at the source's frame rate. See [Pacer].

use std::time::{Duration, Instant};

use media::frame::FrameRate;

use crate::Clock;

/// What a [Pacer] remembers between frames.
///
/// The loop's "start" is the moment the pacer last woke up. Until it has woken
/// up once, the frame being paced is the first frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacingState {
    loop_start: Option<Instant>,
    loop_end: Option<Instant>,
}

impl PacingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no frame has been paced yet.
    pub fn is_first_frame(&self) -> bool {
        self.loop_start.is_none()
    }

    /// When the pacer last woke up.
    pub fn loop_start(&self) -> Option<Instant> {
        self.loop_start
    }

    /// Measure the next frame from `now` instead of from the last wake-up, so
    /// time spent away from the loop isn't counted as processing. Does nothing
    /// before the first frame.
    pub fn resync(&mut self, now: Instant) {
        if self.loop_start.is_some() {
            self.loop_start = Some(now);
        }
    }

    /// When the last frame finished processing (right before the pacer
    /// slept).
    pub fn loop_end(&self) -> Option<Instant> {
        self.loop_end
    }
}

/// The outcome of pacing a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacePlan {
    /// How long the frame took to process. Always zero for the first frame.
    pub elapsed: Duration,
    /// How long to sleep for. Never more than the frame interval.
    pub sleep: Duration,
    /// Processing took the whole frame interval (or more), so the output
    /// can't keep up with the source's frame rate.
    pub shortfall: bool,
}

/// Sleeps away whatever is left of each frame's interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    interval: Duration,
}

impl Pacer {
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// A pacer for frames played at `rate`.
    pub const fn from_rate(rate: FrameRate) -> Self {
        Self::new(rate.interval())
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Work out how long to sleep after a frame that took `elapsed` to
    /// process.
    pub fn plan(&self, elapsed: Duration) -> PacePlan {
        PacePlan {
            elapsed,
            sleep: self.interval.saturating_sub(elapsed),
            shortfall: elapsed >= self.interval,
        }
    }

    /// Pace one frame: measure how long it took since the last wake-up, sleep
    /// the rest of the interval on `clock` and record the new wake-up time.
    pub fn pace<C: Clock>(&self, state: &mut PacingState, clock: &C) -> PacePlan {
        let now = clock.now();
        state.loop_end = Some(now);

        let elapsed = state
            .loop_start
            .map_or(Duration::ZERO, |start| now.saturating_duration_since(start));

        let plan = self.plan(elapsed);
        if !plan.sleep.is_zero() {
            clock.sleep(plan.sleep);
        }

        state.loop_start = Some(clock.now());
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;

    const INTERVAL: Duration = Duration::from_millis(40);

    #[test]
    fn sleeps_the_rest_of_the_interval() {
        let plan = Pacer::new(INTERVAL).plan(Duration::from_millis(15));
        assert_eq!(plan.sleep, Duration::from_millis(25));
        assert!(!plan.shortfall);
    }

    #[test]
    fn never_sleeps_a_negative_amount() {
        let pacer = Pacer::new(INTERVAL);

        let late = pacer.plan(Duration::from_millis(55));
        assert_eq!(late.sleep, Duration::ZERO);
        assert!(late.shortfall);

        let exact = pacer.plan(INTERVAL);
        assert_eq!(exact.sleep, Duration::ZERO);
        assert!(exact.shortfall);
    }

    #[test]
    fn first_frame_is_never_penalised() {
        let clock = ManualClock::new();
        let mut state = PacingState::new();
        assert!(state.is_first_frame());

        // Whatever happened before the first frame doesn't count.
        clock.advance(Duration::from_secs(3));
        let plan = Pacer::new(INTERVAL).pace(&mut state, &clock);

        assert_eq!(plan.elapsed, Duration::ZERO);
        assert_eq!(plan.sleep, INTERVAL);
        assert!(!plan.shortfall);
        assert!(!state.is_first_frame());
    }

    #[test]
    fn measures_from_the_last_wake_up() {
        let clock = ManualClock::new();
        let mut state = PacingState::new();
        let pacer = Pacer::new(INTERVAL);

        pacer.pace(&mut state, &clock);
        let woke_up = clock.now();
        assert_eq!(state.loop_start(), Some(woke_up));

        clock.advance(Duration::from_millis(10));
        let plan = pacer.pace(&mut state, &clock);

        assert_eq!(plan.elapsed, Duration::from_millis(10));
        assert_eq!(plan.sleep, Duration::from_millis(30));
        assert_eq!(state.loop_end(), Some(woke_up + Duration::from_millis(10)));
        assert_eq!(clock.now() - woke_up, INTERVAL);
    }

    #[test]
    fn shortfall_does_not_sleep() {
        let clock = ManualClock::new();
        let mut state = PacingState::new();
        let pacer = Pacer::new(INTERVAL);

        pacer.pace(&mut state, &clock);
        let before = clock.elapsed();

        clock.advance(Duration::from_millis(70));
        let plan = pacer.pace(&mut state, &clock);

        assert!(plan.shortfall);
        assert_eq!(clock.elapsed() - before, Duration::from_millis(70));
    }

    #[test]
    fn interval_comes_from_the_frame_rate() {
        let rate = FrameRate::new(30000, 1001).unwrap();
        assert_eq!(Pacer::from_rate(rate).interval(), Duration::from_micros(33366));
    }

    #[test]
    fn resync_forgets_time_away_from_the_loop() {
        let clock = ManualClock::new();
        let mut state = PacingState::new();
        let pacer = Pacer::new(INTERVAL);

        pacer.pace(&mut state, &clock);

        clock.advance(Duration::from_millis(500));
        state.resync(clock.now());
        clock.advance(Duration::from_millis(10));
        let plan = pacer.pace(&mut state, &clock);

        assert_eq!(plan.elapsed, Duration::from_millis(10));
        assert!(!plan.shortfall);
    }

    #[test]
    fn resync_before_the_first_frame_does_nothing() {
        let clock = ManualClock::new();
        let mut state = PacingState::new();

        state.resync(clock.now());
        assert!(state.is_first_frame());
    }
}
