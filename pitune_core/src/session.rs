//! A controller session: one persistent integral plus its reset rules.

use crate::engine::{self, ControllerState, StepInputs, StepResult};
use crate::error::{Result, TuneError};

/// Owns the single `ControllerState` of a session.
///
/// The state is reset to the new startup value whenever a step arrives with
/// an `istartup` different from the one the session was started with.
#[derive(Debug, Clone)]
pub struct PiSession {
    state: ControllerState,
    istartup: f64,
    steps: u64,
}

impl PiSession {
    /// New session with `integral = istartup`.
    pub fn new(istartup: f64) -> Self {
        Self {
            state: ControllerState::new(istartup),
            istartup,
            steps: 0,
        }
    }

    /// Resume from a previously reported integral.
    pub fn with_integral(istartup: f64, integral: f64) -> Result<Self> {
        if !integral.is_finite() {
            return Err(TuneError::invalid(format!(
                "integral must be finite, got {integral}"
            )));
        }
        Ok(Self {
            state: ControllerState::new(integral),
            istartup,
            steps: 0,
        })
    }

    /// Validate `inputs`, apply the startup-change reset, then run one tick.
    #[allow(clippy::float_cmp)]
    pub fn step(&mut self, inputs: &StepInputs) -> Result<StepResult> {
        inputs.validate()?;
        if inputs.istartup != self.istartup {
            tracing::warn!(
                from = self.istartup,
                to = inputs.istartup,
                "startup integral changed; resetting integral"
            );
            self.istartup = inputs.istartup;
            self.state.reset(inputs.istartup);
        }
        let result = engine::step(&mut self.state, inputs);
        self.steps += 1;
        tracing::debug!(
            tick = self.steps,
            feedback = inputs.feedback,
            setpoint = inputs.setpoint,
            integral = result.integral,
            output = result.output,
            "session step"
        );
        Ok(result)
    }

    /// Explicit reset request: back to `integral = istartup`.
    pub fn reset(&mut self) {
        self.state.reset(self.istartup);
        self.steps = 0;
    }

    /// Reset with a new startup value, which later steps are compared against.
    pub fn reset_to(&mut self, istartup: f64) {
        self.istartup = istartup;
        self.reset();
    }

    pub fn integral(&self) -> f64 {
        self.state.integral()
    }

    pub fn istartup(&self) -> f64 {
        self.istartup
    }

    /// Ticks run since the session started or was last reset.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }
}
