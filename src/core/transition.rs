//! Transition profiles handed to the rendering host.

use std::time::Duration;

/// Easing curve for an animated offset change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Cubic ease-out: fast start, gentle settle.
    #[default]
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// How the host should move the strip to a new offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionSpec {
    /// Apply with zero duration.
    Instant,
    Animated { duration: Duration, easing: Easing },
}

impl TransitionSpec {
    pub fn duration(&self) -> Duration {
        match self {
            TransitionSpec::Instant => Duration::ZERO,
            TransitionSpec::Animated { duration, .. } => *duration,
        }
    }

    #[cfg(test)]
    pub fn is_instant(&self) -> bool {
        matches!(self, TransitionSpec::Instant)
    }
}

/// Timing knobs for navigation and autoplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Length of an animated step.  Zero means every step is instant.
    pub transition: Duration,
    pub easing: Easing,
    /// Extra time the transition lock is held past the animation.
    pub lock_guard: Duration,
    pub autoplay_interval: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            transition: Duration::from_millis(500),
            easing: Easing::EaseOut,
            lock_guard: Duration::from_millis(50),
            autoplay_interval: Duration::from_millis(5000),
        }
    }
}

impl Timing {
    /// Transition issued for a normal (non-snap) navigation step.
    pub fn step(&self) -> TransitionSpec {
        if self.transition.is_zero() {
            TransitionSpec::Instant
        } else {
            TransitionSpec::Animated {
                duration: self.transition,
                easing: self.easing,
            }
        }
    }

    /// How long navigation stays locked after issuing `transition`.
    pub fn lock_window(&self, transition: TransitionSpec) -> Duration {
        transition.duration() + self.lock_guard
    }
}
