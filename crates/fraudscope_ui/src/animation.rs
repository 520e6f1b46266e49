//! Tweened values with CSS-style easing.
//!
//! Used for motion the browser would otherwise animate natively, like the
//! smooth anchor scroll.

use serde::{Deserialize, Serialize};

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Cubic ease-out (decelerating).
    EaseOut,
    /// Cubic ease-in-out. Close to what browsers use for smooth scrolling.
    #[default]
    EaseInOut,
    /// Exponential ease-out (sharp snap to target).
    ExponentialOut,
    /// Instant (no animation).
    Instant,
}

impl Easing {
    /// Applies the easing function to a t value (0-1).
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::ExponentialOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f32.powf(-10.0 * t)
                }
            }
            Self::Instant => 1.0,
        }
    }
}

/// A single animated value.
#[derive(Debug, Clone)]
pub struct Animation {
    /// Current value.
    current: f32,
    /// Target value.
    target: f32,
    /// Animation progress (0-1).
    progress: f32,
    /// Animation duration (milliseconds).
    duration_ms: f32,
    /// Easing function.
    easing: Easing,
    /// Start value (for interpolation).
    start: f32,
}

impl Animation {
    /// Default animation duration in milliseconds.
    pub const DEFAULT_DURATION_MS: f32 = 600.0;

    /// Creates a new animation resting at the given value.
    #[must_use]
    pub fn new(value: f32, easing: Easing) -> Self {
        Self {
            current: value,
            target: value,
            progress: 1.0,
            duration_ms: Self::DEFAULT_DURATION_MS,
            easing,
            start: value,
        }
    }

    /// Creates an animation with custom duration.
    #[must_use]
    pub fn with_duration(mut self, duration_ms: f32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.current
    }

    /// Returns the target value.
    #[must_use]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Returns true if the animation is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    /// Sets a new target value, starting animation from current value.
    pub fn set_target(&mut self, target: f32) {
        if (target - self.target).abs() > 0.0001 {
            self.start = self.current;
            self.target = target;
            self.progress = 0.0;
        }
    }

    /// Advances the animation by `dt_ms` milliseconds.
    pub fn update(&mut self, dt_ms: f32) {
        if self.progress >= 1.0 {
            return;
        }

        if self.duration_ms > 0.0 {
            self.progress += dt_ms / self.duration_ms;
        } else {
            self.progress = 1.0;
        }

        self.progress = self.progress.min(1.0);

        let eased = self.easing.apply(self.progress);
        self.current = self.start + (self.target - self.start) * eased;

        // Snap to target when complete
        if self.progress >= 1.0 {
            self.current = self.target;
        }
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(0.0, Easing::default())
    }
}
