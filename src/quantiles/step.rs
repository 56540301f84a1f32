//! Step growth functions for the Frugal-2U update rule
//!
//! Each time a tracker moves in the same direction twice in a row its step
//! grows by `increment(step)`. The reference algorithm uses the constant
//! function; the other variants trade stability for faster convergence on
//! streams whose scale is far from the initial estimate.

/// Increment applied to the step size on each committed move
///
/// Every variant returns at least 1 and is non-decreasing in `step`.
/// Non-positive steps are treated as 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StepGrowth {
    /// Constant 1: the step grows arithmetically
    #[default]
    Unit,
    /// The step itself: the step doubles per move
    Linear,
    /// `ceil(sqrt(step))`
    Sqrt,
    /// `max(1, ceil(ln(step)))`
    Log,
}

impl StepGrowth {
    /// Compute the increment for the current step size
    #[inline]
    pub fn increment(self, step: i64) -> i64 {
        let step = step.max(1);
        match self {
            StepGrowth::Unit => 1,
            StepGrowth::Linear => step,
            StepGrowth::Sqrt => ((step as f64).sqrt().ceil() as i64).max(1),
            StepGrowth::Log => ((step as f64).ln().ceil() as i64).max(1),
        }
    }
}
