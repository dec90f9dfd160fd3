//! Easing curves
//!
//! A [`RateFactor`] reshapes the linear elapsed fraction (0..1) into a
//! perceptually different progress curve. The expected contract is
//! `f(0) = 0` and `f(1) = 1`; it is not enforced, and the driver terminates
//! on the raw fraction, so a curve that undershoots 1 only affects the
//! reported rates, never completion.

use std::sync::Arc;

/// Shared easing function applied to the raw elapsed fraction
pub type RateFactor = Arc<dyn Fn(f32) -> f32 + Send + Sync>;

/// The driver's default curve: `r + (1 - r) * r`, a gentle ease-out
pub fn default_rate_factor(rate: f32) -> f32 {
    rate + (1.0 - rate) * rate
}

/// Stock easing curves
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseIn,
    /// The default curve, `r + (1 - r) * r`
    #[default]
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Evaluate the curve at `t`
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => default_rate_factor(t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }

    /// The curve as a shareable [`RateFactor`]
    pub fn rate_factor(self) -> RateFactor {
        Arc::new(move |t| self.apply(t))
    }
}
