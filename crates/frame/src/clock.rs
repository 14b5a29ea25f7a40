use std::time::{Duration, Instant};

/// Default per-frame delta cap.
///
/// A backgrounded window reports one huge delta when it resumes; capping it
/// at a 60 Hz frame keeps every time-driven animation from jumping.
pub const DEFAULT_MAX_DELTA: Duration = Duration::from_nanos(16_666_667);

/// One produced frame: the clamped delta and the accumulated elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Delta since the previous frame, capped at the clock's `max_delta`.
    pub delta: Duration,
    /// Sum of all clamped deltas so far. Monotonically non-decreasing.
    pub elapsed: Duration,
}

impl FrameTick {
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

/// Produces clamped per-frame deltas from monotonic timestamps.
///
/// The clock owns the previous-frame timestamp; callers hand it `now` each
/// frame (tests pass synthetic instants, the app passes `Instant::now()`).
#[derive(Debug, Clone)]
pub struct FrameClock {
    max_delta: Duration,
    last: Option<Instant>,
    elapsed: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_max_delta(DEFAULT_MAX_DELTA)
    }

    pub fn with_max_delta(max_delta: Duration) -> Self {
        Self {
            max_delta,
            last: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance the clock to `now` and return the frame's clamped delta.
    ///
    /// The first call after construction (or after `reset`) yields a zero
    /// delta: there is no previous frame to measure against.
    pub fn advance(&mut self, now: Instant) -> FrameTick {
        let raw = match self.last {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.last = Some(now);

        let delta = raw.min(self.max_delta);
        if raw > self.max_delta {
            tracing::trace!(?raw, ?delta, "frame delta clamped");
        }
        self.elapsed += delta;

        FrameTick {
            delta,
            elapsed: self.elapsed,
        }
    }

    /// Accumulated clamped time.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Forget the previous frame so the next delta starts from zero.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Start/stop lifecycle around a [`FrameClock`].
///
/// Mirrors the mount/unmount contract of a continuously scheduled redraw
/// callback: `start()` begins producing frames, `stop()` cancels the loop,
/// and ticking a stopped loop is a no-op rather than an error (the render
/// surface may simply not exist yet).
#[derive(Debug)]
pub struct FrameLoop {
    clock: FrameClock,
    running: bool,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::with_clock(FrameClock::new())
    }

    pub fn with_clock(clock: FrameClock) -> Self {
        Self {
            clock,
            running: false,
        }
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        // Discard the idle gap so the first running frame is not clamped.
        self.clock.reset();
        tracing::debug!("frame loop started");
    }

    /// Stop producing frames. Idempotent; safe to call before `start`.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        tracing::debug!("frame loop stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Produce the next frame, or `None` while the loop is stopped.
    pub fn tick(&mut self, now: Instant) -> Option<FrameTick> {
        if !self.running {
            return None;
        }
        Some(self.clock.advance(now))
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instants(offsets_ms: &[u64]) -> Vec<Instant> {
        let base = Instant::now();
        offsets_ms
            .iter()
            .map(|ms| base + Duration::from_millis(*ms))
            .collect()
    }

    #[test]
    fn first_advance_yields_zero_delta() {
        let mut clock = FrameClock::new();
        let tick = clock.advance(Instant::now());
        assert_eq!(tick.delta, Duration::ZERO);
        assert_eq!(tick.elapsed, Duration::ZERO);
    }

    #[test]
    fn small_deltas_pass_through() {
        let mut clock = FrameClock::new();
        let t = instants(&[0, 10]);
        clock.advance(t[0]);
        let tick = clock.advance(t[1]);
        assert_eq!(tick.delta, Duration::from_millis(10));
    }

    #[test]
    fn large_delta_is_capped() {
        // A 2 s gap (backgrounded tab) must advance time by one max_delta only.
        let mut clock = FrameClock::new();
        let t = instants(&[0, 2000]);
        clock.advance(t[0]);
        let tick = clock.advance(t[1]);
        assert_eq!(tick.delta, DEFAULT_MAX_DELTA);
        assert_eq!(tick.elapsed, DEFAULT_MAX_DELTA);
    }

    #[test]
    fn elapsed_accumulates_clamped_time() {
        let mut clock = FrameClock::with_max_delta(Duration::from_millis(20));
        let t = instants(&[0, 10, 510, 520]);
        for i in &t {
            clock.advance(*i);
        }
        // 0 + 10 + 20 (clamped from 500) + 10
        assert_eq!(clock.elapsed(), Duration::from_millis(40));
    }

    #[test]
    fn elapsed_never_decreases() {
        let mut clock = FrameClock::new();
        let t = instants(&[0, 5, 5, 30]);
        let mut previous = Duration::ZERO;
        for i in &t {
            let tick = clock.advance(*i);
            assert!(tick.elapsed >= previous);
            previous = tick.elapsed;
        }
    }

    #[test]
    fn stopped_loop_produces_no_frames() {
        let mut frame_loop = FrameLoop::new();
        assert!(frame_loop.tick(Instant::now()).is_none());
    }

    #[test]
    fn start_stop_leaves_no_running_loop() {
        // Mount-then-immediate-unmount: nothing may keep ticking.
        let mut frame_loop = FrameLoop::new();
        frame_loop.start();
        frame_loop.stop();
        assert!(!frame_loop.is_running());
        assert!(frame_loop.tick(Instant::now()).is_none());
    }

    #[test]
    fn stop_is_idempotent() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.stop();
        frame_loop.start();
        frame_loop.stop();
        frame_loop.stop();
        assert!(!frame_loop.is_running());
    }

    #[test]
    fn restart_does_not_count_the_idle_gap() {
        let mut frame_loop = FrameLoop::new();
        let t = instants(&[0, 10, 5000, 5010]);
        frame_loop.start();
        frame_loop.tick(t[0]);
        frame_loop.tick(t[1]);
        frame_loop.stop();
        frame_loop.start();
        let tick = frame_loop.tick(t[2]).unwrap();
        assert_eq!(tick.delta, Duration::ZERO);
        let tick = frame_loop.tick(t[3]).unwrap();
        assert_eq!(tick.delta, Duration::from_millis(10));
    }
}
