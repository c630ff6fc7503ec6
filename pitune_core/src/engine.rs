//! The PI step engine.
//!
//! One call to [`step`] is one 1-second controller tick. Gains and limits are
//! given per minute, so the integral path divides by [`TICKS_PER_MINUTE`].
//!
//! Anti-windup is applied twice, and both clamps are independent:
//! - the per-tick increment is rate limited to `±imax / 60`;
//! - the accumulated integral is value limited to `±ilimit`.

use crate::error::{Result, TuneError};

/// Controller ticks per minute (1 s tick).
pub const TICKS_PER_MINUTE: f64 = 60.0;

/// Output bias: mid-scale of a 0..100 % actuator.
pub const NEUTRAL_OUTPUT: f64 = 50.0;

/// Sign convention of the loop.
///
/// `Direct` computes `setpoint - feedback`; `Reverse` computes
/// `feedback - setpoint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActingDirection {
    Direct,
    #[default]
    Reverse,
}

impl ActingDirection {
    #[inline]
    pub fn error(self, feedback: f64, setpoint: f64) -> f64 {
        match self {
            ActingDirection::Direct => setpoint - feedback,
            ActingDirection::Reverse => feedback - setpoint,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActingDirection::Direct => "direct",
            ActingDirection::Reverse => "reverse",
        }
    }
}

impl std::fmt::Display for ActingDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The integral carried between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerState {
    integral: f64,
}

impl ControllerState {
    /// Fresh state holding the startup integral.
    pub fn new(istartup: f64) -> Self {
        Self { integral: istartup }
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn reset(&mut self, istartup: f64) {
        self.integral = istartup;
    }
}

/// Inputs of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct StepInputs {
    pub feedback: f64,
    pub setpoint: f64,
    pub kp: f64,
    /// per minute
    pub ki: f64,
    /// per minute, >= 0
    pub imax: f64,
    pub istartup: f64,
    /// >= 0
    pub ilimit: f64,
    pub acting: ActingDirection,
}

impl StepInputs {
    /// Reject non-finite values and negative or NaN limits.
    ///
    /// `imax` and `ilimit` may be `+inf` (no limit).
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("feedback", self.feedback),
            ("setpoint", self.setpoint),
            ("kp", self.kp),
            ("ki", self.ki),
            ("istartup", self.istartup),
        ];
        for (name, v) in finite {
            if !v.is_finite() {
                return Err(TuneError::invalid(format!("{name} must be finite, got {v}")));
            }
        }
        for (name, v) in [("imax", self.imax), ("ilimit", self.ilimit)] {
            if v.is_nan() || v < 0.0 {
                return Err(TuneError::invalid(format!("{name} must be >= 0, got {v}")));
            }
        }
        Ok(())
    }
}

/// Computed values of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub error: f64,
    pub proportional: f64,
    /// Increment actually applied (after rate limiting); 0 when `ki == 0`.
    pub integral_increment: f64,
    /// Integral after this tick, within `±ilimit`.
    pub integral: f64,
    pub output: f64,
}

/// Symmetric clamp to `[-limit, limit]`. Never panics, unlike `f64::clamp`.
#[inline]
fn clamp_sym(v: f64, limit: f64) -> f64 {
    v.max(-limit).min(limit)
}

/// Run one tick, updating `state` in place.
///
/// With `ki == 0` integral action is off: the integral does not accumulate
/// and is held at `istartup` (bounded by `±ilimit`) regardless of `state`.
#[allow(clippy::float_cmp)]
pub fn step(state: &mut ControllerState, inputs: &StepInputs) -> StepResult {
    let error = inputs.acting.error(inputs.feedback, inputs.setpoint);
    let proportional = inputs.kp * error;

    let (integral_increment, integral) = if inputs.ki == 0.0 {
        (0.0, clamp_sym(inputs.istartup, inputs.ilimit))
    } else {
        let raw = inputs.ki * error / TICKS_PER_MINUTE;
        let inc = clamp_sym(raw, inputs.imax / TICKS_PER_MINUTE);
        (inc, clamp_sym(state.integral + inc, inputs.ilimit))
    };
    state.integral = integral;

    let output = proportional + integral + NEUTRAL_OUTPUT;
    tracing::trace!(
        error,
        proportional,
        integral_increment,
        integral,
        output,
        "pi step"
    );
    StepResult {
        error,
        proportional,
        integral_increment,
        integral,
        output,
    }
}
