//! Runtime configuration types for the engine and the advisor replay.
//!
//! These are separate from the TOML-deserialized config in `pitune_config`;
//! see `conversions` for the mapping.

use crate::engine::{ActingDirection, StepInputs};

/// Gains, limits and acting direction of one controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerCfg {
    pub kp: f64,
    /// Integral gain, per minute.
    pub ki: f64,
    /// Integral rate limit, per minute.
    pub imax: f64,
    /// Startup (reset) value of the integral.
    pub istartup: f64,
    /// Integral magnitude clamp.
    pub ilimit: f64,
    pub acting: ActingDirection,
}

impl Default for ControllerCfg {
    fn default() -> Self {
        Self {
            kp: 1.0,
            ki: 0.1,
            imax: 10.0,
            istartup: 0.0,
            ilimit: 100.0,
            acting: ActingDirection::Reverse,
        }
    }
}

impl ControllerCfg {
    /// Step inputs for one feedback/setpoint sample under these settings.
    pub fn inputs(&self, feedback: f64, setpoint: f64) -> StepInputs {
        StepInputs {
            feedback,
            setpoint,
            kp: self.kp,
            ki: self.ki,
            imax: self.imax,
            istartup: self.istartup,
            ilimit: self.ilimit,
            acting: self.acting,
        }
    }
}

/// Limits for replaying the engine over a logged series.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceCfg {
    /// Integral clamp. Default: 100.
    pub ilimit: f64,
    /// Integral rate limit per minute. Default: unbounded.
    pub imax: f64,
}

impl Default for TraceCfg {
    fn default() -> Self {
        Self {
            ilimit: 100.0,
            imax: f64::INFINITY,
        }
    }
}
