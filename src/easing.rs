//! Alpha easing used to fade confetti out at the end of their life.
use crate::clamp;
use std::fmt;

/// Maps animation progress to a value, usually in `[0, 1]`
pub trait Interpolator {
    fn interpolate(&self, t: f32) -> f32;
}

impl<F> Interpolator for F
where
    F: Fn(f32) -> f32,
{
    fn interpolate(&self, t: f32) -> f32 {
        self(t)
    }
}

/// Keeps full opacity and then linearly fades to transparent
///
/// Value is `1.0` until progress reaches `start`, after which it decreases by
/// `rate` per unit of progress. No clamping is done, progress outside of
/// `[0, 1]` is extrapolated with the same formula.
#[derive(Clone, Copy, PartialEq)]
pub struct FadeOut {
    start: f32,
    rate: f32,
}

impl FadeOut {
    /// Opaque until 90% of the progress, transparent at the end
    pub const DEFAULT: FadeOut = FadeOut {
        start: 0.9,
        rate: 10.0,
    };

    /// Fade that starts at `start` and reaches zero at `1.0`
    ///
    /// `start` must be less than `1.0`, otherwise `None` is returned.
    pub fn new(start: f32) -> Option<Self> {
        (start < 1.0).then(|| Self {
            start,
            rate: 1.0 / (1.0 - start),
        })
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    /// Alpha multiplier converted to 8-bit alpha value
    pub fn alpha_u8(&self, t: f32) -> u8 {
        (clamp(self.interpolate(t), 0.0, 1.0) * 255.0).round() as u8
    }
}

impl Default for FadeOut {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for FadeOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FadeOut start:{} rate:{}", self.start, self.rate)
    }
}

impl Interpolator for FadeOut {
    fn interpolate(&self, t: f32) -> f32 {
        if t >= self.start {
            1.0 - (t - self.start) * self.rate
        } else {
            1.0
        }
    }
}

static FADE_OUT: FadeOut = FadeOut::DEFAULT;

/// Default alpha curve for confetti
///
/// Curve is a constant, so every call returns the very same value and there is
/// no initialization to race on.
pub fn fade_out_curve() -> &'static FadeOut {
    &FADE_OUT
}
