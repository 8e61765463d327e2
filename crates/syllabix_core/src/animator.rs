//! Time-based smoothing of progress percentages.
//!
//! The animator never schedules anything itself. [`ProgressAnimator::retarget`]
//! hands out a generation number; the caller schedules frames tagged with it and
//! feeds them back through [`ProgressAnimator::on_frame`]. Frames carrying an
//! older generation are rejected, so a tick queued before a retarget or a stop
//! can never overwrite the newer animation.

use std::time::{Duration, Instant};

pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(600);

/// Cubic ease-out: fast start, gentle landing.
pub fn ease_out_cubic(ratio: f64) -> f64 {
    let inverse = 1.0 - ratio.clamp(0.0, 1.0);
    1.0 - inverse * inverse * inverse
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Frame belongs to a cancelled or superseded animation; nothing changed.
    Stale,
    /// Displayed value moved; schedule another frame with the same generation.
    Continue,
    /// Displayed value reached the target; schedule nothing.
    Settled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressAnimator {
    duration: Duration,
    displayed: f64,
    start_value: f64,
    target: f64,
    started_at: Option<Instant>,
    generation: u64,
    running: bool,
}

impl Default for ProgressAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_ANIMATION_DURATION)
    }
}

impl ProgressAnimator {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            displayed: 0.0,
            start_value: 0.0,
            target: 0.0,
            started_at: None,
            generation: 0,
            running: false,
        }
    }

    pub fn displayed(&self) -> f64 {
        self.displayed
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Value the current animation started from.
    pub fn start_value(&self) -> f64 {
        self.start_value
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Starts animating from the current displayed value toward `target`
    /// (clamped to 0..=100).
    ///
    /// Returns the generation the caller must tag scheduled frames with, or
    /// `None` when the target did not change. Any earlier generation is stale
    /// from this point on.
    pub fn retarget(&mut self, target: f64, now: Instant) -> Option<u64> {
        let target = target.clamp(0.0, 100.0);
        if (target - self.target).abs() < f64::EPSILON {
            return None;
        }
        self.start_value = self.displayed;
        self.target = target;
        self.started_at = Some(now);
        self.generation += 1;
        self.running = true;
        Some(self.generation)
    }

    pub fn on_frame(&mut self, generation: u64, now: Instant) -> FrameOutcome {
        if !self.running || generation != self.generation {
            return FrameOutcome::Stale;
        }
        let ratio = match self.started_at {
            Some(started_at) if !self.duration.is_zero() => {
                let elapsed = now.saturating_duration_since(started_at);
                (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 1.0,
        };

        if ratio >= 1.0 {
            self.displayed = self.target;
            self.running = false;
            return FrameOutcome::Settled;
        }
        self.displayed = self.start_value + (self.target - self.start_value) * ease_out_cubic(ratio);
        FrameOutcome::Continue
    }

    /// Cancels the running animation, freezing the displayed value. Returns
    /// whether an animation was in flight.
    pub fn stop(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        self.generation += 1;
        was_running
    }
}

/// Page number shown next to the extraction bar.
///
/// Only moves forward within a file so out-of-order page events do not make it
/// flicker. The job runner numbers pages per file, so a new file resets it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageCounter {
    shown: u32,
    file: Option<String>,
}

impl PageCounter {
    pub fn shown(&self) -> u32 {
        self.shown
    }

    /// Returns true when the shown value changed.
    pub fn observe(&mut self, current_page: u32, current_file: Option<&str>) -> bool {
        let mut changed = false;
        if self.file.as_deref() != current_file {
            self.file = current_file.map(ToOwned::to_owned);
            if self.shown != 0 {
                self.shown = 0;
                changed = true;
            }
        }
        if current_page > self.shown {
            self.shown = current_page;
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
        assert_eq!(ease_out_cubic(2.0), 1.0);
    }

    #[test]
    fn zero_duration_settles_on_first_frame() {
        let now = Instant::now();
        let mut animator = ProgressAnimator::new(Duration::ZERO);
        let generation = animator.retarget(40.0, now).unwrap();

        assert_eq!(animator.on_frame(generation, now), FrameOutcome::Settled);
        assert_eq!(animator.displayed(), 40.0);
    }

    #[test]
    fn page_counter_resets_on_new_file() {
        let mut counter = PageCounter::default();
        assert!(counter.observe(3, Some("a.pdf")));
        assert!(counter.observe(1, Some("b.pdf")));
        assert_eq!(counter.shown(), 1);
    }
}
