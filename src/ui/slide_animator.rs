//! Strip offset animator: the host side of a carousel transition.
//!
//! The engine publishes a target offset (percent of the strip width) and a
//! [`TransitionSpec`].  The animator eases from wherever the strip currently
//! is toward that target and reports completion exactly once per
//! transition, which the app forwards to the engine.

use std::time::Duration;

use crate::core::transition::{Easing, TransitionSpec};

/// Offset animator driven by the app clock.
#[derive(Debug, Clone)]
pub struct SlideAnimator {
    /// Offset the current transition started from.
    from: f64,
    /// Offset the current transition ends at.
    to: f64,
    /// Last sampled offset.
    current: f64,
    started: Duration,
    duration: Duration,
    easing: Easing,
    /// A transition is in flight (or an instant one has not been reported).
    running: bool,
}

impl Default for SlideAnimator {
    fn default() -> Self {
        Self {
            from: 0.0,
            to: 0.0,
            current: 0.0,
            started: Duration::ZERO,
            duration: Duration::ZERO,
            easing: Easing::Linear,
            running: false,
        }
    }
}

impl SlideAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start moving toward `target`.  An in-flight transition is
    /// interrupted and the new one starts from the current offset.
    pub fn retarget(&mut self, target: f64, transition: TransitionSpec, now: Duration) {
        self.to = target;
        self.started = now;
        self.running = true;
        match transition {
            TransitionSpec::Instant => {
                self.from = target;
                self.current = target;
                self.duration = Duration::ZERO;
            }
            TransitionSpec::Animated { duration, easing } => {
                self.from = self.current;
                self.duration = duration;
                self.easing = easing;
            }
        }
    }

    /// Sample the clock.  Returns `true` on the tick a transition finishes.
    pub fn tick(&mut self, now: Duration) -> bool {
        if !self.running {
            return false;
        }
        let elapsed = now.saturating_sub(self.started);
        if elapsed >= self.duration {
            self.current = self.to;
            self.running = false;
            return true;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.current = self.from + (self.to - self.from) * self.easing.apply(t);
        false
    }

    /// Current strip offset in percent of the strip width.
    pub fn offset_percent(&self) -> f64 {
        self.current
    }

    /// Offset the animator is heading for.
    pub fn target(&self) -> f64 {
        self.to
    }

    #[cfg(test)]
    pub fn is_animating(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn animated(duration: u64) -> TransitionSpec {
        TransitionSpec::Animated {
            duration: ms(duration),
            easing: Easing::Linear,
        }
    }

    #[test]
    fn animated_transition_eases_and_completes_once() {
        let mut a = SlideAnimator::new();
        a.retarget(-20.0, animated(100), ms(0));

        assert!(!a.tick(ms(50)));
        assert!((a.offset_percent() + 10.0).abs() < 1e-9);
        assert!(a.is_animating());

        assert!(a.tick(ms(100)));
        assert_eq!(a.offset_percent(), -20.0);
        assert!(!a.tick(ms(200)));
    }

    #[test]
    fn instant_transition_jumps_and_reports_on_next_tick() {
        let mut a = SlideAnimator::new();
        a.retarget(-50.0, TransitionSpec::Instant, ms(10));
        assert_eq!(a.offset_percent(), -50.0);
        assert!(a.tick(ms(10)));
        assert!(!a.is_animating());
    }

    #[test]
    fn retarget_mid_flight_starts_from_current_offset() {
        let mut a = SlideAnimator::new();
        a.retarget(-40.0, animated(100), ms(0));
        a.tick(ms(50));

        a.retarget(0.0, animated(100), ms(50));
        a.tick(ms(100));
        assert!((a.offset_percent() + 10.0).abs() < 1e-9);
    }
}
