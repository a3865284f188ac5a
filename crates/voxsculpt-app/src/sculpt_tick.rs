//! Fixed-rate gate for sculpt strokes.
//!
//! Input arrives once per rendered frame, but strokes are applied at a fixed
//! rate so the edit speed does not depend on frame rate. An accumulator
//! collects frame time and releases at most one stroke per frame. A backlog
//! is capped at one interval rather than replayed as a burst of strokes.

use std::time::Instant;

/// Frame times above this are clamped, as after a stall or a debugger pause.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Allows one sculpt stroke per fixed interval.
pub struct SculptTicker {
    interval: f64,
    accumulator: f64,
    previous_time: Option<Instant>,
    strokes: u64,
}

impl SculptTicker {
    /// A ticker firing `rate_hz` times per second. Non-positive or non-finite
    /// rates fire on every frame.
    pub fn new(rate_hz: f64) -> Self {
        let interval = if rate_hz.is_finite() && rate_hz > 0.0 {
            1.0 / rate_hz
        } else {
            0.0
        };
        Self {
            interval,
            accumulator: 0.0,
            previous_time: None,
            strokes: 0,
        }
    }

    /// Measures wall-clock time since the previous call and advances by it.
    /// The first call only starts the clock.
    pub fn poll(&mut self) -> bool {
        let now = Instant::now();
        let frame_time = self
            .previous_time
            .map_or(0.0, |prev| now.duration_since(prev).as_secs_f64());
        self.previous_time = Some(now);
        self.advance(frame_time)
    }

    /// Adds `frame_time` seconds and returns `true` if a stroke may run now.
    pub fn advance(&mut self, frame_time: f64) -> bool {
        let frame_time = if frame_time > MAX_FRAME_TIME {
            tracing::warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            MAX_FRAME_TIME
        } else {
            frame_time.max(0.0)
        };

        self.accumulator += frame_time;
        if self.accumulator < self.interval {
            return false;
        }
        self.accumulator = (self.accumulator - self.interval).min(self.interval);
        self.strokes += 1;
        true
    }

    /// Seconds between strokes.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Number of strokes released so far.
    pub fn strokes(&self) -> u64 {
        self.strokes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT_60: f64 = 1.0 / 60.0;

    #[test]
    fn test_interval_from_rate() {
        assert!((SculptTicker::new(60.0).interval() - DT_60).abs() < 1e-12);
        assert_eq!(SculptTicker::new(0.0).interval(), 0.0);
        assert_eq!(SculptTicker::new(f64::NAN).interval(), 0.0);
    }

    #[test]
    fn test_fast_frames_are_rate_limited() {
        let mut ticker = SculptTicker::new(60.0);
        // 240 fps for one second.
        let fired = (0..240).filter(|_| ticker.advance(1.0 / 240.0)).count();
        assert!((59..=60).contains(&fired), "fired {fired} times");
    }

    #[test]
    fn test_slow_frame_releases_one_stroke() {
        let mut ticker = SculptTicker::new(60.0);
        assert!(ticker.advance(5.0 * DT_60));
        // The backlog is capped at one interval, not replayed.
        assert!(ticker.advance(0.0));
        assert!(!ticker.advance(0.0));
        assert_eq!(ticker.strokes(), 2);
    }

    #[test]
    fn test_huge_frame_is_clamped() {
        let mut ticker = SculptTicker::new(1.0);
        // Clamped to 0.25s, below the one-second interval.
        assert!(!ticker.advance(10.0));
        assert!(!ticker.advance(0.5));
        assert!(ticker.advance(0.25));
    }

    #[test]
    fn test_zero_rate_fires_every_frame() {
        let mut ticker = SculptTicker::new(0.0);
        assert!((0..10).all(|_| ticker.advance(0.0)));
    }

    #[test]
    fn test_first_poll_starts_clock() {
        let mut ticker = SculptTicker::new(1.0);
        assert!(!ticker.poll());
        assert_eq!(ticker.strokes(), 0);
    }
}
